//! Dataset metrics and processing job handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use lexforge_common::{
    auth::AdminContext,
    db::models::{DataProcessingJob, DatasetMetrics},
    errors::{AppError, Result},
};
use lexforge_dataprep::DatasetSnapshot;

#[derive(Serialize)]
pub struct DatasetMetricsResponse {
    pub total_documents: i32,
    pub total_pairs: i32,
    pub verified_pairs: i32,
    pub type_distribution: serde_json::Value,
    pub quality_distribution: serde_json::Value,
    pub language_distribution: serde_json::Value,
    pub domain_distribution: serde_json::Value,
    pub average_prompt_length: f64,
    pub average_response_length: f64,
    pub average_quality_score: f64,
    pub verification_rate: f64,
    pub last_updated: String,
}

impl From<DatasetMetrics> for DatasetMetricsResponse {
    fn from(row: DatasetMetrics) -> Self {
        Self {
            total_documents: row.total_documents,
            total_pairs: row.total_pairs,
            verified_pairs: row.verified_pairs,
            type_distribution: row.type_distribution,
            quality_distribution: row.quality_distribution,
            language_distribution: row.language_distribution,
            domain_distribution: row.domain_distribution,
            average_prompt_length: row.average_prompt_length,
            average_response_length: row.average_response_length,
            average_quality_score: row.average_quality_score,
            verification_rate: row.verification_rate,
            last_updated: row.created_at.to_rfc3339(),
        }
    }
}

impl From<DatasetSnapshot> for DatasetMetricsResponse {
    fn from(snapshot: DatasetSnapshot) -> Self {
        Self {
            total_documents: snapshot.total_documents as i32,
            total_pairs: snapshot.total_pairs as i32,
            verified_pairs: snapshot.verified_pairs as i32,
            type_distribution: serde_json::json!(snapshot.type_distribution),
            quality_distribution: serde_json::json!(snapshot.quality_distribution),
            language_distribution: serde_json::json!(snapshot.language_distribution),
            domain_distribution: serde_json::json!(snapshot.domain_distribution),
            average_prompt_length: snapshot.average_prompt_length,
            average_response_length: snapshot.average_response_length,
            average_quality_score: snapshot.average_quality_score,
            verification_rate: snapshot.verification_rate,
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct RefreshMetricsResponse {
    pub message: String,
    pub metrics: DatasetMetricsResponse,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingJobQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub job_type: Option<String>,
    pub status: Option<String>,
}

fn default_limit() -> u64 {
    50
}

#[derive(Serialize)]
pub struct ProcessingJobResponse {
    pub id: Uuid,
    pub job_type: String,
    pub status: String,
    pub progress: f64,
    pub total_items: i32,
    pub processed_items: i32,
    pub failed_items: i32,
    pub results: serde_json::Value,
    pub error_log: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: String,
}

impl From<DataProcessingJob> for ProcessingJobResponse {
    fn from(job: DataProcessingJob) -> Self {
        Self {
            id: job.id,
            job_type: job.job_type,
            status: job.status,
            progress: job.progress,
            total_items: job.total_items,
            processed_items: job.processed_items,
            failed_items: job.failed_items,
            results: job.results,
            error_log: job.error_log,
            start_time: job.start_time.map(|t| t.to_rfc3339()),
            end_time: job.end_time.map(|t| t.to_rfc3339()),
            created_at: job.created_at.to_rfc3339(),
        }
    }
}

/// Latest dataset metrics snapshot, computed on the fly when none exists
pub async fn get_dataset_metrics(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<DatasetMetricsResponse>> {
    if let Some(row) = state.repo.latest_dataset_snapshot().await? {
        return Ok(Json(row.into()));
    }

    let snapshot = state.dataprep.refresh_dataset_metrics().await?;
    Ok(Json(snapshot.into()))
}

/// Recalculate and persist dataset metrics
pub async fn refresh_dataset_metrics(
    State(state): State<AppState>,
    admin: AdminContext,
) -> Result<Json<RefreshMetricsResponse>> {
    let snapshot = state.dataprep.refresh_dataset_metrics().await?;

    tracing::info!(
        documents = snapshot.total_documents,
        pairs = snapshot.total_pairs,
        admin = %admin.audit_stamp(),
        "dataset metrics refreshed"
    );

    Ok(Json(RefreshMetricsResponse {
        message: "Metrics refreshed successfully".to_string(),
        metrics: snapshot.into(),
    }))
}

/// List data processing jobs
pub async fn list_processing_jobs(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<ProcessingJobQuery>,
) -> Result<Json<Vec<ProcessingJobResponse>>> {
    let jobs = state
        .repo
        .list_processing_jobs(query.job_type, query.status, query.skip, query.limit)
        .await?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// Get one processing job
pub async fn get_processing_job(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ProcessingJobResponse>> {
    let job = state
        .repo
        .find_processing_job(job_id)
        .await?
        .ok_or_else(|| AppError::JobNotFound {
            id: job_id.to_string(),
        })?;

    Ok(Json(job.into()))
}
