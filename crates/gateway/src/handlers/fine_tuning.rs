//! Fine-tuning job handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use lexforge_common::{
    auth::AdminContext,
    db::models::{FineTuningJob, TrainingMetrics, TrainingStatus, ValidationResult},
    errors::{AppError, Result},
};
use lexforge_trainer::{job_statistics, ProgressReport};

const DEPLOYMENT_SCORE_FLOOR: f64 = 0.7;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub status: Option<String>,
}

fn default_limit() -> u64 {
    100
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub model_name: String,

    #[serde(default = "default_base_model")]
    pub base_model: String,

    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_base_model() -> String {
    lexforge_common::DEFAULT_BASE_MODEL.to_string()
}

#[derive(Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub model_name: String,
    pub base_model: String,
    pub progress: f64,
    pub model_id: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub created_at: String,
}

impl From<FineTuningJob> for JobResponse {
    fn from(job: FineTuningJob) -> Self {
        Self {
            id: job.id,
            name: job.name,
            status: job.status,
            model_name: job.model_name,
            base_model: job.base_model,
            progress: job.progress,
            model_id: job.model_id,
            start_time: job.start_time.to_rfc3339(),
            end_time: job.end_time.map(|t| t.to_rfc3339()),
            created_at: job.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub accuracy: f64,
    pub relevance: f64,
    pub readability: f64,
    pub coherence: f64,
    pub legal_accuracy: f64,
    pub simplification_score: f64,
    pub clause_explanation_score: f64,
    pub qa_score: f64,
    pub overall_score: f64,
}

impl From<TrainingMetrics> for MetricsResponse {
    fn from(m: TrainingMetrics) -> Self {
        Self {
            accuracy: m.accuracy,
            relevance: m.relevance,
            readability: m.readability,
            coherence: m.coherence,
            legal_accuracy: m.legal_accuracy,
            simplification_score: m.simplification_score,
            clause_explanation_score: m.clause_explanation_score,
            qa_score: m.qa_score,
            overall_score: m.overall_score,
        }
    }
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub query: String,
    pub expected_response: String,
    pub actual_response: String,
    pub accuracy_score: f64,
    pub relevance_score: f64,
    pub readability_score: f64,
    pub test_category: Option<String>,
    pub difficulty: Option<String>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(r: ValidationResult) -> Self {
        Self {
            query: r.query,
            expected_response: r.expected_response,
            actual_response: r.actual_response,
            accuracy_score: r.accuracy_score,
            relevance_score: r.relevance_score,
            readability_score: r.readability_score,
            test_category: r.test_category,
            difficulty: r.difficulty,
        }
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub running_jobs: usize,
    pub failed_jobs: usize,
    pub average_completion_time: Option<f64>,
    pub success_rate: f64,
}

#[derive(Serialize)]
pub struct DeployResponse {
    pub message: String,
    pub endpoint: String,
    pub deployment_id: Uuid,
}

/// List fine-tuning jobs with optional status filtering
pub async fn list_jobs(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<JobResponse>>> {
    if let Some(ref status) = query.status {
        if TrainingStatus::parse(status).is_none() {
            return Err(AppError::Validation {
                message: format!("unknown status '{}'", status),
                field: Some("status".to_string()),
            });
        }
    }

    let jobs = state
        .repo
        .list_fine_tuning_jobs(query.status, query.skip, query.limit)
        .await?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// Get one fine-tuning job
pub async fn get_job(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>> {
    let job = find_job(&state, job_id).await?;
    Ok(Json(job.into()))
}

/// Create a fine-tuning job and start its simulation
pub async fn create_job(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let job = state
        .trainer
        .start_training(
            &state.runner,
            request.name,
            request.model_name,
            request.base_model,
            request.config,
        )
        .await?;

    tracing::info!(
        job_id = %job.id,
        name = %job.name,
        admin = %admin.audit_stamp(),
        "fine-tuning job created"
    );

    Ok((StatusCode::ACCEPTED, Json(job.into())))
}

/// Training metrics for a job
pub async fn get_job_metrics(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MetricsResponse>> {
    find_job(&state, job_id).await?;

    let metrics = state
        .repo
        .find_metrics_by_job(job_id)
        .await?
        .ok_or_else(|| AppError::MetricsNotFound {
            job_id: job_id.to_string(),
        })?;

    Ok(Json(metrics.into()))
}

/// Validation results for a job
pub async fn get_job_validation(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ValidationResponse>>> {
    find_job(&state, job_id).await?;

    let results = state.repo.find_validation_results(job_id).await?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Live progress report for a job
pub async fn get_job_progress(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ProgressReport>> {
    let job = find_job(&state, job_id).await?;
    Ok(Json(state.trainer.progress_report(&job)))
}

/// Cancel a preparing or training job
pub async fn cancel_job(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state
        .trainer
        .cancel_training(&state.runner, job_id, &admin.audit_stamp())
        .await?;

    tracing::info!(job_id = %job_id, admin = %admin.audit_stamp(), "fine-tuning job cancelled");

    Ok(Json(serde_json::json!({
        "message": "Job cancelled successfully"
    })))
}

/// Aggregate statistics over all fine-tuning jobs
pub async fn get_stats(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<StatsResponse>> {
    let jobs = state.repo.all_fine_tuning_jobs().await?;
    let stats = job_statistics(&jobs);

    let completed_with_times: Vec<&FineTuningJob> = jobs
        .iter()
        .filter(|j| j.training_status() == TrainingStatus::Completed && j.end_time.is_some())
        .collect();

    let average_completion_time = if completed_with_times.is_empty() {
        None
    } else {
        let total: i64 = completed_with_times
            .iter()
            .filter_map(|j| j.end_time.map(|end| (end - j.start_time).num_seconds()))
            .sum();
        Some(total as f64 / completed_with_times.len() as f64)
    };

    let total_jobs = jobs.len();
    let completed = stats["completed"].as_u64().unwrap_or(0) as usize;
    let running = jobs
        .iter()
        .filter(|j| !j.training_status().is_terminal())
        .count();
    let failed = stats["failed"].as_u64().unwrap_or(0) as usize;
    let success_rate = if total_jobs > 0 {
        completed as f64 / total_jobs as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(StatsResponse {
        total_jobs,
        completed_jobs: completed,
        running_jobs: running,
        failed_jobs: failed,
        average_completion_time,
        success_rate,
    }))
}

/// Deploy a completed model that clears the quality floor
pub async fn deploy_model(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(job_id): Path<Uuid>,
) -> Result<Json<DeployResponse>> {
    let job = find_job(&state, job_id).await?;

    if job.training_status() != TrainingStatus::Completed {
        return Err(AppError::InvalidJobState {
            id: job_id.to_string(),
            action: "deployed".to_string(),
            status: job.status.clone(),
        });
    }

    let metrics = state
        .repo
        .find_metrics_by_job(job_id)
        .await?
        .ok_or_else(|| AppError::MetricsNotFound {
            job_id: job_id.to_string(),
        })?;

    if metrics.overall_score < DEPLOYMENT_SCORE_FLOOR {
        return Err(AppError::Validation {
            message: format!(
                "model quality too low for deployment: {:.2} < {:.2}",
                metrics.overall_score, DEPLOYMENT_SCORE_FLOOR
            ),
            field: None,
        });
    }

    let model_ref = job.model_id.clone().unwrap_or_else(|| job_id.to_string());
    let endpoint = format!("https://api.lexforge.dev/models/{}", model_ref);

    let deployment = state.repo.create_deployment(job_id, endpoint.clone()).await?;
    state.repo.set_deployment_status(deployment.id, "active").await?;

    tracing::info!(
        job_id = %job_id,
        deployment_id = %deployment.id,
        admin = %admin.audit_stamp(),
        "model deployed"
    );

    Ok(Json(DeployResponse {
        message: "Model deployed successfully".to_string(),
        endpoint,
        deployment_id: deployment.id,
    }))
}

async fn find_job(state: &AppState, job_id: Uuid) -> Result<FineTuningJob> {
    state
        .repo
        .find_fine_tuning_job(job_id)
        .await?
        .ok_or_else(|| AppError::JobNotFound {
            id: job_id.to_string(),
        })
}
