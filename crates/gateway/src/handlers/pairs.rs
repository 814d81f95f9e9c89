//! Prompt-response pair handlers

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use lexforge_common::{
    auth::AdminContext,
    db::models::{PairType, PromptResponsePair},
    errors::{AppError, Result},
};
use lexforge_dataprep::{ExportFilter, ExportFormat};

#[derive(Debug, Deserialize)]
pub struct PairListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub pair_type: Option<String>,
    pub is_verified: Option<bool>,
    pub min_quality: Option<i32>,
}

fn default_limit() -> u64 {
    100
}

#[derive(Serialize)]
pub struct PairResponse {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub pair_type: String,
    pub quality_score: i32,
    pub is_verified: bool,
    pub domain: Option<String>,
    pub difficulty: Option<String>,
    pub created_at: String,
}

impl From<PromptResponsePair> for PairResponse {
    fn from(pair: PromptResponsePair) -> Self {
        Self {
            id: pair.id,
            prompt: pair.prompt,
            response: pair.response,
            pair_type: pair.pair_type,
            quality_score: pair.quality_score,
            is_verified: pair.is_verified,
            domain: pair.domain,
            difficulty: pair.difficulty,
            created_at: pair.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneratePairsRequest {
    pub document_ids: Vec<Uuid>,
    #[serde(default = "default_pair_types")]
    pub pair_types: Vec<String>,
}

fn default_pair_types() -> Vec<String> {
    vec![
        "summarization".to_string(),
        "clause_explanation".to_string(),
        "qa".to_string(),
    ]
}

#[derive(Serialize)]
pub struct GeneratePairsResponse {
    pub message: String,
    pub job_id: Uuid,
    pub documents_count: usize,
    pub pair_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default = "default_format")]
    pub format: String,
    pub pair_types: Option<Vec<String>>,
    #[serde(default = "default_min_quality")]
    pub min_quality: i32,
    #[serde(default)]
    pub verified_only: bool,
}

fn default_format() -> String {
    "jsonl".to_string()
}

fn default_min_quality() -> i32 {
    3
}

fn parse_pair_type(raw: &str) -> Result<PairType> {
    PairType::parse(raw).ok_or_else(|| AppError::Validation {
        message: format!("unknown pair type '{}'", raw),
        field: Some("pair_types".to_string()),
    })
}

/// List pairs with optional filtering.
///
/// The quality filter applies after pagination, to the returned page.
pub async fn list_pairs(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<PairListQuery>,
) -> Result<Json<Vec<PairResponse>>> {
    let pair_type = match query.pair_type.as_deref() {
        Some(raw) => Some(parse_pair_type(raw)?),
        None => None,
    };

    let pairs = state
        .repo
        .list_pairs(pair_type, query.is_verified, query.skip, query.limit)
        .await?;

    let min_quality = query.min_quality.unwrap_or(i32::MIN);
    Ok(Json(
        pairs
            .into_iter()
            .filter(|p| p.quality_score >= min_quality)
            .map(Into::into)
            .collect(),
    ))
}

/// Start pair generation over a document set
pub async fn generate_pairs(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(request): Json<GeneratePairsRequest>,
) -> Result<(StatusCode, Json<GeneratePairsResponse>)> {
    let pair_types: Vec<PairType> = request
        .pair_types
        .iter()
        .map(|raw| parse_pair_type(raw))
        .collect::<Result<_>>()?;

    let documents_count = request.document_ids.len();
    let job_id = state
        .dataprep
        .start_pair_generation(&state.runner, request.document_ids, pair_types)
        .await?;

    tracing::info!(
        job_id = %job_id,
        documents = documents_count,
        admin = %admin.audit_stamp(),
        "pair generation started"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(GeneratePairsResponse {
            message: "Pair generation started".to_string(),
            job_id,
            documents_count,
            pair_types: request.pair_types,
        }),
    ))
}

/// Export the training dataset as a downloadable artifact
pub async fn export_dataset(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(request): Json<ExportRequest>,
) -> Result<Response> {
    let format = ExportFormat::parse(&request.format).ok_or_else(|| AppError::Validation {
        message: "format must be 'jsonl' or 'csv'".to_string(),
        field: Some("format".to_string()),
    })?;

    let pair_types = match request.pair_types {
        Some(raw_types) => Some(
            raw_types
                .iter()
                .map(|raw| parse_pair_type(raw))
                .collect::<Result<Vec<_>>>()?,
        ),
        None => None,
    };

    let filter = ExportFilter {
        pair_types,
        min_quality: Some(request.min_quality),
        verified_only: request.verified_only,
    };

    let artifact = state.dataprep.export_dataset(&filter, format).await?;

    tracing::info!(
        format = %request.format,
        pairs = artifact.pair_count,
        bytes = artifact.body.len(),
        admin = %admin.audit_stamp(),
        "dataset exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.body,
    )
        .into_response())
}
