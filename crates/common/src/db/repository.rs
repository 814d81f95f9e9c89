//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations with proper
//! error handling. Job-record writes are guarded: every update bumps a
//! monotonic version column, and status transitions are expressed as
//! conditional SQL so a racing writer can never move a job backwards or
//! out of a terminal state.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use uuid::Uuid;

/// Fields required to create a legal document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub document_type: DocumentType,
    pub jurisdiction: String,
    pub source: Option<String>,
    pub language: String,
}

/// Fields required to create a prompt-response pair
#[derive(Debug, Clone)]
pub struct NewPair {
    pub prompt: String,
    pub response: String,
    pub pair_type: PairType,
    pub source_document_id: Uuid,
    pub source_document_title: Option<String>,
    pub quality_score: i32,
    pub difficulty: Option<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Document Operations
    // ========================================================================

    /// Create a new legal document
    pub async fn create_document(&self, doc: NewDocument) -> Result<LegalDocument> {
        let now = chrono::Utc::now();
        let word_count = doc.content.split_whitespace().count() as i32;

        let document = LegalDocumentActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(doc.title),
            content: Set(doc.content),
            document_type: Set(doc.document_type.as_str().to_string()),
            jurisdiction: Set(doc.jurisdiction),
            source: Set(doc.source),
            word_count: Set(word_count),
            complexity: Set(Complexity::Medium.as_str().to_string()),
            domains: Set(serde_json::json!([])),
            language: Set(doc.language),
            is_processed: Set(false),
            is_anonymized: Set(false),
            processing_notes: Set(None),
            document_date: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        document.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find document by ID
    pub async fn find_document_by_id(&self, id: Uuid) -> Result<Option<LegalDocument>> {
        LegalDocumentEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find documents by a set of IDs
    pub async fn find_documents_by_ids(&self, ids: &[Uuid]) -> Result<Vec<LegalDocument>> {
        LegalDocumentEntity::find()
            .filter(LegalDocumentColumn::Id.is_in(ids.iter().copied()))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List documents with optional filters, newest first
    pub async fn list_documents(
        &self,
        document_type: Option<DocumentType>,
        jurisdiction: Option<String>,
        is_processed: Option<bool>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<LegalDocument>> {
        let mut query = LegalDocumentEntity::find();

        if let Some(doc_type) = document_type {
            query = query.filter(LegalDocumentColumn::DocumentType.eq(doc_type.as_str()));
        }
        if let Some(jurisdiction) = jurisdiction {
            query = query.filter(LegalDocumentColumn::Jurisdiction.eq(jurisdiction));
        }
        if let Some(processed) = is_processed {
            query = query.filter(LegalDocumentColumn::IsProcessed.eq(processed));
        }

        query
            .order_by_desc(LegalDocumentColumn::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Full scan of all documents, for dataset aggregation
    pub async fn all_documents(&self) -> Result<Vec<LegalDocument>> {
        LegalDocumentEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count documents
    pub async fn count_documents(&self) -> Result<u64> {
        LegalDocumentEntity::find()
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Write redaction + classification results back to a document
    pub async fn apply_processing_results(
        &self,
        document_id: Uuid,
        content: String,
        complexity: Complexity,
        domains: &[String],
        notes: &str,
    ) -> Result<()> {
        let mut doc: LegalDocumentActiveModel = LegalDocumentEntity::find_by_id(document_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::DocumentNotFound {
                id: document_id.to_string(),
            })?
            .into();

        doc.word_count = Set(content.split_whitespace().count() as i32);
        doc.content = Set(content);
        doc.complexity = Set(complexity.as_str().to_string());
        doc.domains = Set(serde_json::json!(domains));
        doc.is_processed = Set(true);
        doc.is_anonymized = Set(true);
        doc.processing_notes = Set(Some(notes.to_string()));
        doc.updated_at = Set(chrono::Utc::now().into());

        doc.update(self.write_conn()).await?;
        Ok(())
    }

    /// Replace a document's content with its redacted form
    pub async fn apply_anonymization(&self, document_id: Uuid, content: String) -> Result<()> {
        let mut doc: LegalDocumentActiveModel = LegalDocumentEntity::find_by_id(document_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::DocumentNotFound {
                id: document_id.to_string(),
            })?
            .into();

        doc.content = Set(content);
        doc.is_anonymized = Set(true);
        doc.updated_at = Set(chrono::Utc::now().into());

        doc.update(self.write_conn()).await?;
        Ok(())
    }

    // ========================================================================
    // Pair Operations
    // ========================================================================

    /// Create a prompt-response pair.
    ///
    /// The source document must exist at creation time.
    pub async fn create_pair(&self, pair: NewPair) -> Result<PromptResponsePair> {
        let exists = LegalDocumentEntity::find_by_id(pair.source_document_id)
            .one(self.read_conn())
            .await?
            .is_some();

        if !exists {
            return Err(AppError::DocumentNotFound {
                id: pair.source_document_id.to_string(),
            });
        }

        let now = chrono::Utc::now();
        let row = PairActiveModel {
            id: Set(Uuid::new_v4()),
            prompt: Set(pair.prompt),
            response: Set(pair.response),
            pair_type: Set(pair.pair_type.as_str().to_string()),
            source_document_id: Set(pair.source_document_id),
            source_document_title: Set(pair.source_document_title),
            quality_score: Set(pair.quality_score),
            is_verified: Set(false),
            reviewed_by: Set(None),
            tags: Set(serde_json::json!(pair.tags)),
            difficulty: Set(pair.difficulty),
            domain: Set(pair.domain),
            used_in_training: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List pairs with optional filters, newest first
    pub async fn list_pairs(
        &self,
        pair_type: Option<PairType>,
        is_verified: Option<bool>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PromptResponsePair>> {
        let mut query = PairEntity::find();

        if let Some(pair_type) = pair_type {
            query = query.filter(PairColumn::PairType.eq(pair_type.as_str()));
        }
        if let Some(verified) = is_verified {
            query = query.filter(PairColumn::IsVerified.eq(verified));
        }

        query
            .order_by_desc(PairColumn::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Full scan of all pairs, for aggregation and export
    pub async fn all_pairs(&self) -> Result<Vec<PromptResponsePair>> {
        PairEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count pairs
    pub async fn count_pairs(&self) -> Result<u64> {
        PairEntity::find()
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Processing Job Operations
    // ========================================================================

    /// Create a data processing job, already in the running state
    pub async fn create_processing_job(
        &self,
        job_type: ProcessingJobType,
        input_documents: &[Uuid],
        total_items: i32,
        config: serde_json::Value,
    ) -> Result<DataProcessingJob> {
        let now = chrono::Utc::now();
        let inputs: Vec<String> = input_documents.iter().map(|id| id.to_string()).collect();

        let job = ProcessingJobActiveModel {
            id: Set(Uuid::new_v4()),
            job_type: Set(job_type.as_str().to_string()),
            status: Set(String::from(ProcessingStatus::Running)),
            input_documents: Set(serde_json::json!(inputs)),
            output_pairs: Set(serde_json::json!([])),
            config: Set(config),
            progress: Set(0.0),
            total_items: Set(total_items),
            processed_items: Set(0),
            failed_items: Set(0),
            results: Set(serde_json::json!({})),
            error_log: Set(None),
            version: Set(0),
            start_time: Set(Some(now.into())),
            end_time: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        job.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find processing job by ID
    pub async fn find_processing_job(&self, id: Uuid) -> Result<Option<DataProcessingJob>> {
        ProcessingJobEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List processing jobs with optional filters, newest first
    pub async fn list_processing_jobs(
        &self,
        job_type: Option<String>,
        status: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<DataProcessingJob>> {
        let mut query = ProcessingJobEntity::find();

        if let Some(job_type) = job_type {
            query = query.filter(ProcessingJobColumn::JobType.eq(job_type));
        }
        if let Some(status) = status {
            query = query.filter(ProcessingJobColumn::Status.eq(status));
        }

        query
            .order_by_desc(ProcessingJobColumn::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Record progress on a running processing job.
    ///
    /// Dropped without effect if the job already reached a terminal state;
    /// returns whether the write landed.
    pub async fn update_processing_progress(
        &self,
        job_id: Uuid,
        progress: f64,
        processed_items: i32,
        failed_items: i32,
    ) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE data_processing_jobs
            SET progress = $1,
                processed_items = $2,
                failed_items = $3,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $4 AND status NOT IN ('completed', 'failed')
            "#,
            vec![
                progress.into(),
                processed_items.into(),
                failed_items.into(),
                job_id.into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a processing job completed with its result payload
    pub async fn complete_processing_job(
        &self,
        job_id: Uuid,
        processed_items: i32,
        failed_items: i32,
        output_pairs: &[Uuid],
        results: serde_json::Value,
    ) -> Result<bool> {
        let outputs: Vec<String> = output_pairs.iter().map(|id| id.to_string()).collect();

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE data_processing_jobs
            SET status = 'completed',
                progress = 100.0,
                processed_items = $1,
                failed_items = $2,
                output_pairs = $3,
                results = $4,
                end_time = NOW(),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $5 AND status NOT IN ('completed', 'failed')
            "#,
            vec![
                processed_items.into(),
                failed_items.into(),
                serde_json::json!(outputs).into(),
                results.into(),
                job_id.into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a processing job failed, appending to its error log
    pub async fn fail_processing_job(&self, job_id: Uuid, error: &str) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE data_processing_jobs
            SET status = 'failed',
                error_log = COALESCE(error_log, '') || $1,
                end_time = NOW(),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $2 AND status NOT IN ('completed', 'failed')
            "#,
            vec![format!("{}\n", error).into(), job_id.into()],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Fine-Tuning Job Operations
    // ========================================================================

    /// Create a fine-tuning job in the preparing state
    pub async fn create_fine_tuning_job(
        &self,
        name: String,
        model_name: String,
        base_model: String,
        config: serde_json::Value,
    ) -> Result<FineTuningJob> {
        let now = chrono::Utc::now();

        let job = FineTuningJobActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            status: Set(TrainingStatus::Preparing.as_str().to_string()),
            model_name: Set(model_name),
            base_model: Set(base_model),
            config: Set(config),
            progress: Set(0.0),
            logs: Set(String::new()),
            model_id: Set(None),
            version: Set(0),
            start_time: Set(now.into()),
            end_time: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        job.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find fine-tuning job by ID
    pub async fn find_fine_tuning_job(&self, id: Uuid) -> Result<Option<FineTuningJob>> {
        FineTuningJobEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List fine-tuning jobs with optional status filter, newest first
    pub async fn list_fine_tuning_jobs(
        &self,
        status: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<FineTuningJob>> {
        let mut query = FineTuningJobEntity::find();

        if let Some(status) = status {
            query = query.filter(FineTuningJobColumn::Status.eq(status));
        }

        query
            .order_by_desc(FineTuningJobColumn::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Full scan of fine-tuning jobs, for analytics
    pub async fn all_fine_tuning_jobs(&self) -> Result<Vec<FineTuningJob>> {
        FineTuningJobEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count fine-tuning jobs
    pub async fn count_fine_tuning_jobs(&self) -> Result<u64> {
        FineTuningJobEntity::find()
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Move a job forward one lifecycle step.
    ///
    /// The transition only lands while the job is still in `from`; a racing
    /// cancel or failure leaves the row untouched. Returns whether it landed.
    pub async fn advance_fine_tuning_status(
        &self,
        job_id: Uuid,
        from: TrainingStatus,
        to: TrainingStatus,
        progress: f64,
    ) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE fine_tuning_jobs
            SET status = $1,
                progress = $2,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $3 AND status = $4
            "#,
            vec![
                to.as_str().into(),
                progress.into(),
                job_id.into(),
                from.as_str().into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record simulated training progress and append a log line.
    ///
    /// Dropped without effect once the job is terminal, which is what makes
    /// cancellation authoritative: a sleeping simulator that lost the race
    /// cannot resurrect a failed job.
    pub async fn record_fine_tuning_progress(
        &self,
        job_id: Uuid,
        progress: f64,
        log_line: &str,
    ) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE fine_tuning_jobs
            SET progress = $1,
                logs = logs || $2,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $3 AND status NOT IN ('completed', 'failed')
            "#,
            vec![
                progress.into(),
                format!("{}\n", log_line).into(),
                job_id.into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Complete a job from the evaluating state
    pub async fn complete_fine_tuning_job(
        &self,
        job_id: Uuid,
        model_id: &str,
        log_line: &str,
    ) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE fine_tuning_jobs
            SET status = 'completed',
                progress = 100.0,
                model_id = $1,
                logs = logs || $2,
                end_time = NOW(),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $3 AND status = 'evaluating'
            "#,
            vec![
                model_id.into(),
                format!("{}\n", log_line).into(),
                job_id.into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail a job from any non-terminal state, appending the error
    pub async fn fail_fine_tuning_job(&self, job_id: Uuid, log_line: &str) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE fine_tuning_jobs
            SET status = 'failed',
                logs = logs || $1,
                end_time = NOW(),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $2 AND status NOT IN ('completed', 'failed')
            "#,
            vec![format!("{}\n", log_line).into(), job_id.into()],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel a job, version-checked against the row the admin saw.
    ///
    /// Only lands while the job is still cancellable; a stale version means
    /// another writer advanced the job in between.
    pub async fn cancel_fine_tuning_job(
        &self,
        job_id: Uuid,
        expected_version: i32,
        log_line: &str,
    ) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE fine_tuning_jobs
            SET status = 'failed',
                logs = logs || $1,
                end_time = NOW(),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $2
              AND version = $3
              AND status IN ('preparing', 'training')
            "#,
            vec![
                format!("{}\n", log_line).into(),
                job_id.into(),
                expected_version.into(),
            ],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Training Metrics Operations
    // ========================================================================

    /// Insert the metrics row for an evaluated job.
    ///
    /// The referenced job must have reached evaluation or later.
    pub async fn insert_training_metrics(
        &self,
        job_id: Uuid,
        scores: TrainingScoreSet,
    ) -> Result<TrainingMetrics> {
        let job = self
            .find_fine_tuning_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobNotFound {
                id: job_id.to_string(),
            })?;

        if job.training_status().rank() < TrainingStatus::Evaluating.rank() {
            return Err(AppError::Internal {
                message: format!(
                    "metrics recorded for job {} before evaluation ({})",
                    job_id, job.status
                ),
            });
        }

        let row = TrainingMetricsActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            accuracy: Set(scores.accuracy),
            relevance: Set(scores.relevance),
            readability: Set(scores.readability),
            coherence: Set(scores.coherence),
            legal_accuracy: Set(scores.legal_accuracy),
            simplification_score: Set(scores.simplification_score),
            clause_explanation_score: Set(scores.clause_explanation_score),
            qa_score: Set(scores.qa_score),
            overall_score: Set(scores.overall_score),
            training_loss: Set(scores.training_loss),
            validation_loss: Set(scores.validation_loss),
            learning_rate: Set(scores.learning_rate),
            created_at: Set(chrono::Utc::now().into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Metrics for a specific job
    pub async fn find_metrics_by_job(&self, job_id: Uuid) -> Result<Option<TrainingMetrics>> {
        TrainingMetricsEntity::find()
            .filter(TrainingMetricsColumn::JobId.eq(job_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Full scan of training metrics, for analytics
    pub async fn all_training_metrics(&self) -> Result<Vec<TrainingMetrics>> {
        TrainingMetricsEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Validation Result Operations
    // ========================================================================

    /// Insert a validation result row
    pub async fn insert_validation_result(
        &self,
        result: ValidationResultActiveModel,
    ) -> Result<ValidationResult> {
        result.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Validation results for a job
    pub async fn find_validation_results(&self, job_id: Uuid) -> Result<Vec<ValidationResult>> {
        ValidationResultEntity::find()
            .filter(ValidationResultColumn::JobId.eq(job_id))
            .order_by_asc(ValidationResultColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Dataset Metrics Operations
    // ========================================================================

    /// Persist a dataset metrics snapshot
    pub async fn insert_dataset_snapshot(
        &self,
        snapshot: DatasetMetricsActiveModel,
    ) -> Result<DatasetMetrics> {
        snapshot.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Most recently created snapshot, if any
    pub async fn latest_dataset_snapshot(&self) -> Result<Option<DatasetMetrics>> {
        DatasetMetricsEntity::find()
            .order_by_desc(DatasetMetricsColumn::CreatedAt)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Deployment Operations
    // ========================================================================

    /// Create a deployment record for a completed job
    pub async fn create_deployment(
        &self,
        job_id: Uuid,
        model_endpoint: String,
    ) -> Result<ModelDeployment> {
        let now = chrono::Utc::now();

        let row = ModelDeploymentActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            model_endpoint: Set(model_endpoint),
            deployment_status: Set("deploying".to_string()),
            total_requests: Set(0),
            average_latency: Set(0.0),
            error_rate: Set(0.0),
            uptime_percentage: Set(0.0),
            deployed_at: Set(now.into()),
            last_health_check: Set(now.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        row.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Update a deployment's status
    pub async fn set_deployment_status(&self, id: Uuid, status: &str) -> Result<()> {
        let mut row: ModelDeploymentActiveModel = ModelDeploymentEntity::find_by_id(id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "model_deployment".to_string(),
                id: id.to_string(),
            })?
            .into();

        row.deployment_status = Set(status.to_string());
        row.updated_at = Set(chrono::Utc::now().into());

        row.update(self.write_conn()).await?;
        Ok(())
    }

    /// Full scan of deployments, for analytics
    pub async fn all_deployments(&self) -> Result<Vec<ModelDeployment>> {
        ModelDeploymentEntity::find()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count deployments currently in a given status
    pub async fn count_deployments_by_status(&self, status: &str) -> Result<u64> {
        ModelDeploymentEntity::find()
            .filter(ModelDeploymentColumn::DeploymentStatus.eq(status))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }
}

/// The eight sub-scores plus overall and loss figures written after
/// evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingScoreSet {
    pub accuracy: f64,
    pub relevance: f64,
    pub readability: f64,
    pub coherence: f64,
    pub legal_accuracy: f64,
    pub simplification_score: f64,
    pub clause_explanation_score: f64,
    pub qa_score: f64,
    pub overall_score: f64,
    pub training_loss: Option<f64>,
    pub validation_loss: Option<f64>,
    pub learning_rate: Option<f64>,
}
