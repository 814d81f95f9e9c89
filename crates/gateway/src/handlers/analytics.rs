//! Dashboard analytics handlers
//!
//! Aggregations are computed in the handler from full-table reads. The
//! tables involved stay small on an admin platform; revisit with SQL-side
//! aggregation if that stops being true.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use lexforge_common::{
    auth::AdminContext,
    db::models::{FineTuningJob, TrainingMetrics, TrainingStatus},
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct OverviewStats {
    pub total_documents: u64,
    pub total_training_pairs: u64,
    pub total_fine_tuning_jobs: u64,
    pub active_deployments: u64,
    pub success_rate: f64,
    pub average_model_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    30
}

#[derive(Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub jobs_started: usize,
    pub jobs_completed: usize,
    pub average_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    #[serde(default = "default_performance_limit")]
    pub limit: usize,
}

fn default_performance_limit() -> usize {
    10
}

#[derive(Serialize)]
pub struct ModelPerformance {
    pub model_id: String,
    pub model_name: String,
    pub overall_score: f64,
    pub accuracy: f64,
    pub readability: f64,
    pub legal_accuracy: f64,
    pub deployment_status: Option<String>,
}

#[derive(Serialize)]
pub struct DataQuality {
    pub total_pairs: usize,
    pub verified_pairs: usize,
    pub average_quality: f64,
    pub quality_distribution: HashMap<String, u64>,
    pub type_distribution: HashMap<String, u64>,
}

#[derive(Serialize)]
pub struct SystemHealth {
    pub active_jobs: usize,
    pub failed_jobs_24h: usize,
    pub average_processing_time: f64,
    pub storage_usage: serde_json::Value,
    pub error_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    /// Comma-separated job ids
    pub model_ids: String,
}

/// High-level overview statistics
pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<OverviewStats>> {
    let total_documents = state.repo.count_documents().await?;
    let total_training_pairs = state.repo.count_pairs().await?;
    let total_fine_tuning_jobs = state.repo.count_fine_tuning_jobs().await?;
    let active_deployments = state.repo.count_deployments_by_status("active").await?;

    let jobs = state.repo.all_fine_tuning_jobs().await?;
    let completed = jobs
        .iter()
        .filter(|j| j.training_status() == TrainingStatus::Completed)
        .count();
    let success_rate = if jobs.is_empty() {
        0.0
    } else {
        completed as f64 / jobs.len() as f64 * 100.0
    };

    let metrics = state.repo.all_training_metrics().await?;
    let average_model_score = if metrics.is_empty() {
        0.0
    } else {
        metrics.iter().map(|m| m.overall_score).sum::<f64>() / metrics.len() as f64
    };

    Ok(Json(OverviewStats {
        total_documents,
        total_training_pairs,
        total_fine_tuning_jobs,
        active_deployments,
        success_rate,
        average_model_score,
    }))
}

/// Per-day training activity over the requested window
pub async fn training_trends(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Vec<TrendPoint>>> {
    let jobs = state.repo.all_fine_tuning_jobs().await?;
    let metrics = state.repo.all_training_metrics().await?;
    let metrics_by_job: HashMap<Uuid, &TrainingMetrics> =
        metrics.iter().map(|m| (m.job_id, m)).collect();

    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::days(query.days as i64);

    let mut trends = Vec::with_capacity(query.days as usize);
    for offset in 0..query.days {
        let date = start_date + Duration::days(offset as i64);
        trends.push(trend_for_day(date, &jobs, &metrics_by_job));
    }

    Ok(Json(trends))
}

fn trend_for_day(
    date: NaiveDate,
    jobs: &[FineTuningJob],
    metrics_by_job: &HashMap<Uuid, &TrainingMetrics>,
) -> TrendPoint {
    let jobs_started = jobs
        .iter()
        .filter(|j| j.start_time.date_naive() == date)
        .count();

    let completed_today: Vec<&FineTuningJob> = jobs
        .iter()
        .filter(|j| {
            j.training_status() == TrainingStatus::Completed
                && j.end_time.map(|t| t.date_naive()) == Some(date)
        })
        .collect();

    let scores: Vec<f64> = completed_today
        .iter()
        .filter_map(|j| metrics_by_job.get(&j.id).map(|m| m.overall_score))
        .collect();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    TrendPoint {
        date: date.format("%Y-%m-%d").to_string(),
        jobs_started,
        jobs_completed: completed_today.len(),
        average_score,
    }
}

/// Top performing models, highest overall score first
pub async fn model_performance(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<Vec<ModelPerformance>>> {
    let jobs = state.repo.all_fine_tuning_jobs().await?;
    let metrics = state.repo.all_training_metrics().await?;
    let deployments = state.repo.all_deployments().await?;

    let metrics_by_job: HashMap<Uuid, &TrainingMetrics> =
        metrics.iter().map(|m| (m.job_id, m)).collect();
    let deployment_by_job: HashMap<Uuid, &str> = deployments
        .iter()
        .map(|d| (d.job_id, d.deployment_status.as_str()))
        .collect();

    let mut models: Vec<ModelPerformance> = jobs
        .iter()
        .filter(|j| j.training_status() == TrainingStatus::Completed)
        .filter_map(|job| {
            metrics_by_job.get(&job.id).map(|m| ModelPerformance {
                model_id: job.model_id.clone().unwrap_or_else(|| job.id.to_string()),
                model_name: job.name.clone(),
                overall_score: m.overall_score,
                accuracy: m.accuracy,
                readability: m.readability,
                legal_accuracy: m.legal_accuracy,
                deployment_status: deployment_by_job.get(&job.id).map(|s| s.to_string()),
            })
        })
        .collect();

    models.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
    models.truncate(query.limit);

    Ok(Json(models))
}

/// Quality metrics for the pair set
pub async fn data_quality(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<DataQuality>> {
    let pairs = state.repo.all_pairs().await?;

    let total_pairs = pairs.len();
    let verified_pairs = pairs.iter().filter(|p| p.is_verified).count();
    let average_quality = if total_pairs > 0 {
        pairs.iter().map(|p| p.quality_score as f64).sum::<f64>() / total_pairs as f64
    } else {
        0.0
    };

    let mut quality_distribution: HashMap<String, u64> = HashMap::new();
    let mut type_distribution: HashMap<String, u64> = HashMap::new();
    for pair in &pairs {
        *quality_distribution
            .entry(pair.quality_score.to_string())
            .or_insert(0) += 1;
        *type_distribution.entry(pair.pair_type.clone()).or_insert(0) += 1;
    }

    Ok(Json(DataQuality {
        total_pairs,
        verified_pairs,
        average_quality,
        quality_distribution,
        type_distribution,
    }))
}

/// Training system health indicators
pub async fn system_health(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<SystemHealth>> {
    let jobs = state.repo.all_fine_tuning_jobs().await?;
    let yesterday = Utc::now() - Duration::days(1);

    let active_jobs = jobs
        .iter()
        .filter(|j| !j.training_status().is_terminal())
        .count();

    let failed_jobs_24h = jobs
        .iter()
        .filter(|j| {
            j.training_status() == TrainingStatus::Failed && j.updated_at >= yesterday
        })
        .count();

    let completed: Vec<&FineTuningJob> = jobs
        .iter()
        .filter(|j| j.training_status() == TrainingStatus::Completed && j.end_time.is_some())
        .collect();
    let average_processing_time = if completed.is_empty() {
        0.0
    } else {
        let total: i64 = completed
            .iter()
            .filter_map(|j| j.end_time.map(|end| (end - j.start_time).num_seconds()))
            .sum();
        total as f64 / completed.len() as f64
    };

    let total_jobs_24h = jobs.iter().filter(|j| j.created_at >= yesterday).count();
    let error_rate = if total_jobs_24h > 0 {
        failed_jobs_24h as f64 / total_jobs_24h as f64 * 100.0
    } else {
        0.0
    };

    // Placeholder figures until storage accounting exists
    let storage_usage = serde_json::json!({
        "documents": "2.5 GB",
        "models": "15.2 GB",
        "logs": "500 MB",
        "total": "18.2 GB",
    });

    Ok(Json(SystemHealth {
        active_jobs,
        failed_jobs_24h,
        average_processing_time,
        storage_usage,
        error_rate,
    }))
}

/// Side-by-side metric comparison for selected jobs
pub async fn performance_comparison(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<ComparisonQuery>,
) -> Result<Json<serde_json::Value>> {
    let job_ids: Vec<Uuid> = query
        .model_ids
        .split(',')
        .map(|raw| {
            raw.trim().parse::<Uuid>().map_err(|_| AppError::Validation {
                message: format!("invalid job id '{}'", raw),
                field: Some("model_ids".to_string()),
            })
        })
        .collect::<Result<_>>()?;

    let metrics = state.repo.all_training_metrics().await?;
    let metrics_by_job: HashMap<Uuid, &TrainingMetrics> =
        metrics.iter().map(|m| (m.job_id, m)).collect();

    let mut comparison = Vec::new();
    for job_id in job_ids {
        let Some(job) = state.repo.find_fine_tuning_job(job_id).await? else {
            continue;
        };
        let Some(m) = metrics_by_job.get(&job.id) else {
            continue;
        };

        comparison.push(serde_json::json!({
            "model_id": job.id,
            "model_name": job.name,
            "metrics": {
                "overall_score": m.overall_score,
                "accuracy": m.accuracy,
                "relevance": m.relevance,
                "readability": m.readability,
                "legal_accuracy": m.legal_accuracy,
                "simplification_score": m.simplification_score,
                "clause_explanation_score": m.clause_explanation_score,
                "qa_score": m.qa_score,
            },
            "training_config": job.config,
        }));
    }

    Ok(Json(serde_json::json!({
        "models": comparison,
        "comparison_date": Utc::now().to_rfc3339(),
    })))
}
