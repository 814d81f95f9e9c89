//! Background data preparation jobs
//!
//! The service methods create the job record, hand the work to the shared
//! runner, and return the job id immediately. Workers check the
//! cancellation token between items, never mid-write, and mark their own
//! job record failed on error.

use std::sync::Arc;

use lexforge_common::db::models::{PairType, ProcessingJobType};
use lexforge_common::db::{NewPair, Repository};
use lexforge_common::errors::{AppError, Result};
use lexforge_common::metrics;
use lexforge_common::JobRunner;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::aggregator::DatasetSnapshot;
use crate::export::{export_pairs, ExportArtifact, ExportFilter, ExportFormat};
use crate::redaction::Redactor;
use crate::{classifier, synthesizer};

const PROCESSING_NOTE: &str = "Automatically processed and anonymized";

/// Data preparation service facade
#[derive(Clone)]
pub struct DataPrepService {
    repo: Repository,
    redactor: Arc<Redactor>,
}

impl DataPrepService {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            redactor: Arc::new(Redactor::new()),
        }
    }

    /// Start redaction + classification for a single document.
    ///
    /// Returns the processing job id as soon as the record exists.
    pub async fn start_document_processing(
        &self,
        runner: &JobRunner,
        document_id: Uuid,
    ) -> Result<Uuid> {
        if self.repo.find_document_by_id(document_id).await?.is_none() {
            return Err(AppError::DocumentNotFound {
                id: document_id.to_string(),
            });
        }

        let job = self
            .repo
            .create_processing_job(
                ProcessingJobType::DocumentProcessing,
                &[document_id],
                1,
                serde_json::json!({}),
            )
            .await?;

        let job_id = job.id;
        let repo = self.repo.clone();
        let redactor = Arc::clone(&self.redactor);

        runner.spawn(job_id, "document_processing", move |token| async move {
            let outcome =
                run_document_processing(&repo, &redactor, job_id, document_id, &token).await;
            settle(&repo, job_id, outcome).await
        });

        Ok(job_id)
    }

    /// Start pair generation over a document set.
    ///
    /// Every referenced document must exist up front; total items is
    /// documents times pair types.
    pub async fn start_pair_generation(
        &self,
        runner: &JobRunner,
        document_ids: Vec<Uuid>,
        pair_types: Vec<PairType>,
    ) -> Result<Uuid> {
        if document_ids.is_empty() {
            return Err(AppError::Validation {
                message: "at least one document is required".to_string(),
                field: Some("document_ids".to_string()),
            });
        }
        if pair_types.is_empty() {
            return Err(AppError::Validation {
                message: "at least one pair type is required".to_string(),
                field: Some("pair_types".to_string()),
            });
        }

        let found = self.repo.find_documents_by_ids(&document_ids).await?;
        for id in &document_ids {
            if !found.iter().any(|d| d.id == *id) {
                return Err(AppError::DocumentNotFound { id: id.to_string() });
            }
        }

        let total_items = (document_ids.len() * pair_types.len()) as i32;
        let type_names: Vec<&str> = pair_types.iter().map(|t| t.as_str()).collect();
        let job = self
            .repo
            .create_processing_job(
                ProcessingJobType::PairGeneration,
                &document_ids,
                total_items,
                serde_json::json!({ "pair_types": type_names }),
            )
            .await?;

        let job_id = job.id;
        let repo = self.repo.clone();

        runner.spawn(job_id, "pair_generation", move |token| async move {
            let outcome =
                run_pair_generation(&repo, job_id, &document_ids, &pair_types, &token).await;
            settle(&repo, job_id, outcome).await
        });

        Ok(job_id)
    }

    /// Start batch anonymization over a document set
    pub async fn start_anonymization(
        &self,
        runner: &JobRunner,
        document_ids: Vec<Uuid>,
    ) -> Result<Uuid> {
        if document_ids.is_empty() {
            return Err(AppError::Validation {
                message: "at least one document is required".to_string(),
                field: Some("document_ids".to_string()),
            });
        }

        let job = self
            .repo
            .create_processing_job(
                ProcessingJobType::Anonymization,
                &document_ids,
                document_ids.len() as i32,
                serde_json::json!({}),
            )
            .await?;

        let job_id = job.id;
        let repo = self.repo.clone();
        let redactor = Arc::clone(&self.redactor);

        runner.spawn(job_id, "anonymization", move |token| async move {
            let outcome =
                run_anonymization(&repo, &redactor, job_id, &document_ids, &token).await;
            settle(&repo, job_id, outcome).await
        });

        Ok(job_id)
    }

    /// Recompute and persist the dataset metrics snapshot
    pub async fn refresh_dataset_metrics(&self) -> Result<DatasetSnapshot> {
        let documents = self.repo.all_documents().await?;
        let pairs = self.repo.all_pairs().await?;

        let snapshot = DatasetSnapshot::compute(&documents, &pairs);
        self.repo
            .insert_dataset_snapshot(snapshot.clone().into_active_model())
            .await?;
        Ok(snapshot)
    }

    /// Export the filtered pair set as a download artifact
    pub async fn export_dataset(
        &self,
        filter: &ExportFilter,
        format: ExportFormat,
    ) -> Result<ExportArtifact> {
        let pairs = self.repo.all_pairs().await?;
        export_pairs(&pairs, filter, format)
    }
}

/// Mark the job failed when the worker errored, then propagate
async fn settle(repo: &Repository, job_id: Uuid, outcome: Result<()>) -> Result<()> {
    if let Err(ref error) = outcome {
        repo.fail_processing_job(job_id, &error.to_string()).await?;
    }
    outcome
}

async fn run_document_processing(
    repo: &Repository,
    redactor: &Redactor,
    job_id: Uuid,
    document_id: Uuid,
    token: &CancellationToken,
) -> Result<()> {
    let document = repo
        .find_document_by_id(document_id)
        .await?
        .ok_or_else(|| AppError::DocumentNotFound {
            id: document_id.to_string(),
        })?;

    repo.update_processing_progress(job_id, 25.0, 0, 0).await?;
    check_cancelled(token)?;

    let redacted = redactor.redact(&document.content);
    for (category, count) in &redacted.counts {
        metrics::record_redactions(category, *count as u64);
    }

    repo.update_processing_progress(job_id, 50.0, 0, 0).await?;
    check_cancelled(token)?;

    let complexity = classifier::assess_complexity(&redacted.text);
    let domains = classifier::identify_domains(&redacted.text);

    repo.update_processing_progress(job_id, 75.0, 0, 0).await?;
    check_cancelled(token)?;

    repo.apply_processing_results(
        document_id,
        redacted.text,
        complexity,
        &domains,
        PROCESSING_NOTE,
    )
    .await?;
    metrics::record_documents_processed(1);

    let results = serde_json::json!({
        "anonymized": true,
        "complexity": complexity.as_str(),
        "domains": domains,
    });
    repo.complete_processing_job(job_id, 1, 0, &[], results)
        .await?;

    tracing::info!(job_id = %job_id, document_id = %document_id, "document processing complete");
    Ok(())
}

async fn run_pair_generation(
    repo: &Repository,
    job_id: Uuid,
    document_ids: &[Uuid],
    pair_types: &[PairType],
    token: &CancellationToken,
) -> Result<()> {
    let total_items = (document_ids.len() * pair_types.len()) as f64;
    let mut generated: Vec<Uuid> = Vec::new();
    let mut processed_items = 0;
    let mut failed_items = 0;

    for document_id in document_ids {
        check_cancelled(token)?;

        // Documents deleted mid-run are skipped, not fatal, but every
        // pair type they would have produced counts as failed
        let Some(document) = repo.find_document_by_id(*document_id).await? else {
            tracing::warn!(job_id = %job_id, document_id = %document_id, "document vanished, skipping");
            failed_items += pair_types.len() as i32;
            let progress = progress_pct(processed_items, failed_items, total_items);
            repo.update_processing_progress(job_id, progress, processed_items, failed_items)
                .await?;
            continue;
        };

        let domain = document
            .domain_tags()
            .first()
            .cloned()
            .unwrap_or_else(|| "general".to_string());

        for pair_type in pair_types {
            let drafts = synthesizer::drafts_for(&document, *pair_type);
            let draft_count = drafts.len();

            for draft in drafts {
                let pair = repo
                    .create_pair(NewPair {
                        prompt: draft.prompt,
                        response: draft.response,
                        pair_type: *pair_type,
                        source_document_id: document.id,
                        source_document_title: Some(document.title.clone()),
                        quality_score: draft.quality_score,
                        difficulty: Some(draft.difficulty.to_string()),
                        domain: Some(domain.clone()),
                        tags: draft.tags,
                    })
                    .await?;
                generated.push(pair.id);
            }
            metrics::record_pairs_generated(pair_type.as_str(), draft_count as u64);

            processed_items += 1;
            let progress = progress_pct(processed_items, failed_items, total_items);
            repo.update_processing_progress(job_id, progress, processed_items, failed_items)
                .await?;
        }
    }

    let type_names: Vec<&str> = pair_types.iter().map(|t| t.as_str()).collect();
    let results = serde_json::json!({
        "generated_pairs": generated.len(),
        "pair_types": type_names,
    });
    repo.complete_processing_job(job_id, processed_items, failed_items, &generated, results)
        .await?;

    tracing::info!(job_id = %job_id, pairs = generated.len(), "pair generation complete");
    Ok(())
}

async fn run_anonymization(
    repo: &Repository,
    redactor: &Redactor,
    job_id: Uuid,
    document_ids: &[Uuid],
    token: &CancellationToken,
) -> Result<()> {
    let mut processed = 0;

    for document_id in document_ids {
        check_cancelled(token)?;

        // Already-anonymized and missing documents still count as processed
        if let Some(document) = repo.find_document_by_id(*document_id).await? {
            if !document.is_anonymized {
                let redacted = redactor.redact(&document.content);
                for (category, count) in &redacted.counts {
                    metrics::record_redactions(category, *count as u64);
                }
                repo.apply_anonymization(*document_id, redacted.text).await?;
            }
        }

        processed += 1;
        let progress = processed as f64 / document_ids.len() as f64 * 100.0;
        repo.update_processing_progress(job_id, progress, processed, 0)
            .await?;
    }

    let results = serde_json::json!({ "anonymized_documents": processed });
    repo.complete_processing_job(job_id, processed, 0, &[], results)
        .await?;

    tracing::info!(job_id = %job_id, documents = processed, "anonymization complete");
    Ok(())
}

/// Work items that were skipped still move the bar, so a job with
/// losses ends at 100% rather than stalling short of it.
fn progress_pct(processed_items: i32, failed_items: i32, total_items: f64) -> f64 {
    (processed_items + failed_items) as f64 / total_items * 100.0
}

fn check_cancelled(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        return Err(AppError::Internal {
            message: "job cancelled by administrator".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classifier, redaction::Redactor};
    use lexforge_common::db::models::Complexity;

    #[test]
    fn test_skipped_documents_count_toward_progress() {
        // Two documents, three pair types. The first document vanishes,
        // so all three of its items land in failed_items.
        let total = (2 * 3) as f64;
        let failed = 3;
        assert_eq!(progress_pct(0, failed, total), 50.0);

        // The surviving document's items finish the job at 100%
        assert_eq!(progress_pct(3, failed, total), 100.0);
    }

    #[test]
    fn test_clean_short_document_pipeline() {
        let content = "The parties agree to meet quarterly to review the \
                       schedule. Each review covers the current milestones \
                       and any open items. Notes from the review are shared \
                       with both teams within five working days. Either \
                       side may propose changes to the plan during a review. \
                       Proposed changes take effect once both teams approve \
                       them in writing at the following session.";

        let outcome = Redactor::new().redact(content);
        assert_eq!(outcome.total(), 0);
        assert_eq!(outcome.text, content);

        assert_eq!(classifier::assess_complexity(&outcome.text), Complexity::Low);
        assert_eq!(classifier::identify_domains(&outcome.text), vec!["general"]);
    }
}
