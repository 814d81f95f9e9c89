//! Simulated fine-tuning lifecycle
//!
//! Drives a fine-tuning job through preparing, training, evaluating and a
//! terminal state. Every database write is conditional on the job still
//! being live, so a cancel that lands between stages simply starves the
//! simulator: its next write affects zero rows and it exits.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lexforge_common::config::JobsConfig;
use lexforge_common::db::models::{
    FineTuningJob, TrainingStatus, ValidationResultActiveModel,
};
use lexforge_common::db::Repository;
use lexforge_common::errors::{AppError, Result};
use lexforge_common::JobRunner;
use sea_orm::Set;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::scoring::ScoreStrategy;
use crate::validation::{mock_response, VALIDATION_QUERIES};

const TRAINING_STAGES: [&str; 8] = [
    "Preparing training data...",
    "Initializing model...",
    "Training epoch 1/3...",
    "Training epoch 2/3...",
    "Training epoch 3/3...",
    "Evaluating model performance...",
    "Running validation tests...",
    "Finalizing model...",
];

/// Progress as reported to the admin UI
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressReport {
    pub job_id: Uuid,
    pub status: String,
    pub progress: f64,
    pub current_stage: &'static str,
    pub start_time: chrono::DateTime<chrono::FixedOffset>,
    pub estimated_completion: String,
    /// Last ten log lines, oldest first
    pub logs: Vec<String>,
}

/// Fine-tuning simulation service
#[derive(Clone)]
pub struct TrainerService {
    repo: Repository,
    jobs_config: JobsConfig,
    scores: Arc<dyn ScoreStrategy>,
}

impl TrainerService {
    pub fn new(repo: Repository, jobs_config: JobsConfig, scores: Arc<dyn ScoreStrategy>) -> Self {
        Self {
            repo,
            jobs_config,
            scores,
        }
    }

    /// Create a job and start its simulation on the shared runner
    pub async fn start_training(
        &self,
        runner: &JobRunner,
        name: String,
        model_name: String,
        base_model: String,
        config: serde_json::Value,
    ) -> Result<FineTuningJob> {
        let job = self
            .repo
            .create_fine_tuning_job(name, model_name, base_model, config)
            .await?;

        let job_id = job.id;
        let service = self.clone();

        runner.spawn(job_id, "fine_tuning", move |token| async move {
            if let Err(error) = service.run_simulation(job_id, &token).await {
                let line = log_line(&format!("Training failed: {}", error));
                service.repo.fail_fine_tuning_job(job_id, &line).await?;
                return Err(error);
            }
            Ok(())
        });

        Ok(job)
    }

    /// Cancel a job.
    ///
    /// The database flip is authoritative; the token only wakes a sleeping
    /// simulator. The update is version-checked against the row read here,
    /// so a simulator write racing the cancel turns it into a conflict
    /// instead of a silent lost update.
    pub async fn cancel_training(
        &self,
        runner: &JobRunner,
        job_id: Uuid,
        cancelled_by: &str,
    ) -> Result<FineTuningJob> {
        let job = self
            .repo
            .find_fine_tuning_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobNotFound {
                id: job_id.to_string(),
            })?;

        if !job.training_status().is_cancellable() {
            return Err(AppError::InvalidJobState {
                id: job_id.to_string(),
                action: "cancelled".to_string(),
                status: job.status.clone(),
            });
        }

        let line = log_line(&format!("Training cancelled by {}", cancelled_by));
        let landed = self
            .repo
            .cancel_fine_tuning_job(job_id, job.version, &line)
            .await?;
        if !landed {
            return Err(AppError::StaleVersion {
                message: format!("job {} changed while cancelling", job_id),
            });
        }

        runner.cancel(job_id);

        self.repo
            .find_fine_tuning_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobNotFound {
                id: job_id.to_string(),
            })
    }

    /// Progress report with stage, ETA, and the log tail
    pub fn progress_report(&self, job: &FineTuningJob) -> ProgressReport {
        ProgressReport {
            job_id: job.id,
            status: job.status.clone(),
            progress: job.progress,
            current_stage: current_stage(job.progress),
            start_time: job.start_time,
            estimated_completion: estimate_completion(job),
            logs: job.tail_logs(10),
        }
    }

    async fn run_simulation(&self, job_id: Uuid, token: &CancellationToken) -> Result<()> {
        if !self
            .repo
            .advance_fine_tuning_status(job_id, TrainingStatus::Preparing, TrainingStatus::Training, 0.0)
            .await?
        {
            tracing::info!(job_id = %job_id, "job no longer preparing, simulator exiting");
            return Ok(());
        }

        let stage_delay = Duration::from_millis(self.jobs_config.training_stage_delay_ms);
        for (i, stage) in TRAINING_STAGES.iter().enumerate() {
            let progress = i as f64 / TRAINING_STAGES.len() as f64 * 80.0;
            if !self
                .repo
                .record_fine_tuning_progress(job_id, progress, &log_line(stage))
                .await?
            {
                tracing::info!(job_id = %job_id, "job reached a terminal state, simulator exiting");
                return Ok(());
            }

            if sleep_or_cancelled(stage_delay, token).await {
                tracing::info!(job_id = %job_id, "cancellation token fired during training");
                return Ok(());
            }
        }

        if !self
            .repo
            .advance_fine_tuning_status(job_id, TrainingStatus::Training, TrainingStatus::Evaluating, 80.0)
            .await?
        {
            tracing::info!(job_id = %job_id, "job left training early, simulator exiting");
            return Ok(());
        }

        self.evaluate(job_id, token).await?;
        self.run_validation_battery(job_id, token).await?;

        let model_id = model_identifier(job_id);
        let completed = self
            .repo
            .complete_fine_tuning_job(
                job_id,
                &model_id,
                &log_line("Training completed successfully"),
            )
            .await?;

        if completed {
            tracing::info!(job_id = %job_id, model_id = %model_id, "fine-tuning simulation complete");
        }
        Ok(())
    }

    async fn evaluate(&self, job_id: Uuid, token: &CancellationToken) -> Result<()> {
        let delay = Duration::from_millis(self.jobs_config.evaluation_delay_ms);
        if sleep_or_cancelled(delay, token).await {
            return Ok(());
        }

        let scores = self.scores.training_scores(job_id);
        self.repo.insert_training_metrics(job_id, scores).await?;
        Ok(())
    }

    async fn run_validation_battery(&self, job_id: Uuid, token: &CancellationToken) -> Result<()> {
        let delay = Duration::from_millis(self.jobs_config.validation_delay_ms);

        for test in VALIDATION_QUERIES {
            if sleep_or_cancelled(delay, token).await {
                return Ok(());
            }

            let (accuracy, relevance, readability) = self.scores.validation_scores(test.query);
            let row = ValidationResultActiveModel {
                id: Set(Uuid::new_v4()),
                job_id: Set(job_id),
                query: Set(test.query.to_string()),
                expected_response: Set(test.expected.to_string()),
                actual_response: Set(mock_response(test.query)),
                accuracy_score: Set(accuracy),
                relevance_score: Set(relevance),
                readability_score: Set(readability),
                test_category: Set(Some(test.category.to_string())),
                difficulty: Set(Some(test.difficulty.to_string())),
                created_at: Set(Utc::now().into()),
            };
            self.repo.insert_validation_result(row).await?;
        }
        Ok(())
    }
}

/// Stats over the whole job set, for the dashboard
pub fn job_statistics(jobs: &[FineTuningJob]) -> serde_json::Value {
    let total = jobs.len();
    let by_status = |status: &str| jobs.iter().filter(|j| j.status == status).count();

    json!({
        "total_jobs": total,
        "completed": by_status("completed"),
        "failed": by_status("failed"),
        "training": by_status("training"),
        "evaluating": by_status("evaluating"),
        "preparing": by_status("preparing"),
    })
}

fn model_identifier(job_id: Uuid) -> String {
    let id = job_id.to_string();
    format!("legal-model-{}", &id[..8])
}

fn log_line(message: &str) -> String {
    format!("{}: {}", Utc::now(), message)
}

/// Sleep, returning true if the token fired first
async fn sleep_or_cancelled(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}

/// Human-readable stage for a progress value
fn current_stage(progress: f64) -> &'static str {
    if progress < 10.0 {
        "Preparing training data..."
    } else if progress < 20.0 {
        "Initializing model..."
    } else if progress < 50.0 {
        "Training in progress..."
    } else if progress < 80.0 {
        "Finalizing training..."
    } else if progress < 90.0 {
        "Evaluating model..."
    } else if progress < 100.0 {
        "Running validation tests..."
    } else {
        "Training completed"
    }
}

/// Naive remaining-time estimate from elapsed time and progress
fn estimate_completion(job: &FineTuningJob) -> String {
    if job.training_status() == TrainingStatus::Completed {
        return "Completed".to_string();
    }
    if job.progress <= 0.0 {
        return "Estimating...".to_string();
    }

    let elapsed = (Utc::now() - job.start_time.with_timezone(&Utc)).num_seconds() as f64;
    let estimated_total = elapsed / (job.progress / 100.0);
    let remaining = (estimated_total - elapsed).max(0.0);

    if remaining < 60.0 {
        format!("{} seconds", remaining as i64)
    } else if remaining < 3600.0 {
        format!("{} minutes", (remaining / 60.0) as i64)
    } else {
        format!("{} hours", (remaining / 3600.0) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with(status: &str, progress: f64) -> FineTuningJob {
        let now = Utc::now();
        FineTuningJob {
            id: Uuid::new_v4(),
            name: "test job".to_string(),
            status: status.to_string(),
            model_name: "legal-assistant".to_string(),
            base_model: "gemini-1.5-flash".to_string(),
            config: json!({}),
            progress,
            logs: String::new(),
            model_id: None,
            version: 0,
            start_time: now.into(),
            end_time: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(current_stage(0.0), "Preparing training data...");
        assert_eq!(current_stage(10.0), "Initializing model...");
        assert_eq!(current_stage(30.0), "Training in progress...");
        assert_eq!(current_stage(79.9), "Finalizing training...");
        assert_eq!(current_stage(80.0), "Evaluating model...");
        assert_eq!(current_stage(95.0), "Running validation tests...");
        assert_eq!(current_stage(100.0), "Training completed");
    }

    #[test]
    fn test_training_progress_values() {
        // Stage i maps to (i / 8) * 80 percent
        let expected = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        for (i, want) in expected.iter().enumerate() {
            let got = i as f64 / TRAINING_STAGES.len() as f64 * 80.0;
            assert_eq!(got, *want);
        }
    }

    #[test]
    fn test_model_identifier_uses_id_prefix() {
        let id = Uuid::new_v4();
        let model_id = model_identifier(id);
        assert!(model_id.starts_with("legal-model-"));
        assert_eq!(model_id.len(), "legal-model-".len() + 8);
        assert!(id.to_string().starts_with(&model_id["legal-model-".len()..]));
    }

    #[test]
    fn test_estimate_for_completed_job() {
        let job = job_with("completed", 100.0);
        assert_eq!(estimate_completion(&job), "Completed");
    }

    #[test]
    fn test_estimate_before_first_progress() {
        let job = job_with("preparing", 0.0);
        assert_eq!(estimate_completion(&job), "Estimating...");
    }

    #[test]
    fn test_job_statistics() {
        let jobs = vec![
            job_with("completed", 100.0),
            job_with("completed", 100.0),
            job_with("failed", 40.0),
            job_with("training", 30.0),
        ];
        let stats = job_statistics(&jobs);
        assert_eq!(stats["total_jobs"], 4);
        assert_eq!(stats["completed"], 2);
        assert_eq!(stats["failed"], 1);
        assert_eq!(stats["training"], 1);
        assert_eq!(stats["preparing"], 0);
    }

    #[test]
    fn test_progress_report_tails_logs() {
        let repo_free_job = {
            let mut job = job_with("training", 30.0);
            job.logs = (0..15)
                .map(|i| format!("line {}", i))
                .collect::<Vec<_>>()
                .join("\n");
            job
        };
        let tail = repo_free_job.tail_logs(10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0], "line 5");
        assert_eq!(tail[9], "line 14");
    }
}
