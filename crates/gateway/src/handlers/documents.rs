//! Legal document handlers

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use lexforge_common::{
    auth::AdminContext,
    db::models::{DocumentType, LegalDocument},
    db::NewDocument,
    errors::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct DocumentListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub document_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub is_processed: Option<bool>,
}

fn default_limit() -> u64 {
    100
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub document_type: String,
    pub jurisdiction: String,
    pub word_count: i32,
    pub complexity: String,
    pub domains: Vec<String>,
    pub language: String,
    pub is_processed: bool,
    pub is_anonymized: bool,
    pub created_at: String,
}

impl From<LegalDocument> for DocumentResponse {
    fn from(doc: LegalDocument) -> Self {
        let domains = doc.domain_tags();
        Self {
            id: doc.id,
            title: doc.title,
            document_type: doc.document_type,
            jurisdiction: doc.jurisdiction,
            word_count: doc.word_count,
            complexity: doc.complexity,
            domains,
            language: doc.language,
            is_processed: doc.is_processed,
            is_anonymized: doc.is_anonymized,
            created_at: doc.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: Uuid,
    pub processing_job_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AnonymizeRequest {
    pub document_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct AnonymizeResponse {
    pub message: String,
    pub job_id: Uuid,
    pub document_count: usize,
}

/// List legal documents with optional filtering
pub async fn list_documents(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<Vec<DocumentResponse>>> {
    let document_type = match query.document_type.as_deref() {
        Some(raw) => Some(DocumentType::parse(raw).ok_or_else(|| AppError::Validation {
            message: format!("unknown document type '{}'", raw),
            field: Some("document_type".to_string()),
        })?),
        None => None,
    };

    let documents = state
        .repo
        .list_documents(
            document_type,
            query.jurisdiction,
            query.is_processed,
            query.skip,
            query.limit,
        )
        .await?;

    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

/// Upload a legal document and start its processing job
pub async fn upload_document(
    State(state): State<AppState>,
    admin: AdminContext,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut filename: Option<String> = None;
    let mut content: Option<String> = None;
    let mut document_type = DocumentType::Contract;
    let mut jurisdiction = "US".to_string();

    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Validation {
        message: format!("invalid multipart payload: {}", e),
        field: None,
    })? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(String::from);
                content = Some(field.text().await.map_err(|e| AppError::Validation {
                    message: format!("file must be valid UTF-8 text: {}", e),
                    field: Some("file".to_string()),
                })?);
            }
            Some("document_type") => {
                let raw = field.text().await.map_err(|e| AppError::Validation {
                    message: e.to_string(),
                    field: Some("document_type".to_string()),
                })?;
                document_type =
                    DocumentType::parse(&raw).ok_or_else(|| AppError::Validation {
                        message: format!("unknown document type '{}'", raw),
                        field: Some("document_type".to_string()),
                    })?;
            }
            Some("jurisdiction") => {
                jurisdiction = field.text().await.map_err(|e| AppError::Validation {
                    message: e.to_string(),
                    field: Some("jurisdiction".to_string()),
                })?;
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| AppError::MissingField {
        field: "file".to_string(),
    })?;
    if content.trim().is_empty() {
        return Err(AppError::Validation {
            message: "uploaded file is empty".to_string(),
            field: Some("file".to_string()),
        });
    }

    let title = filename.unwrap_or_else(|| "untitled".to_string());
    let document = state
        .repo
        .create_document(NewDocument {
            title,
            content,
            document_type,
            jurisdiction,
            source: Some("upload".to_string()),
            language: "en".to_string(),
        })
        .await?;

    let job_id = state
        .dataprep
        .start_document_processing(&state.runner, document.id)
        .await?;

    tracing::info!(
        document_id = %document.id,
        job_id = %job_id,
        admin = %admin.audit_stamp(),
        "document uploaded, processing started"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            message: "Document uploaded successfully".to_string(),
            document_id: document.id,
            processing_job_id: job_id,
        }),
    ))
}

/// Start batch anonymization over a document set
pub async fn anonymize_documents(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(request): Json<AnonymizeRequest>,
) -> Result<(StatusCode, Json<AnonymizeResponse>)> {
    let document_count = request.document_ids.len();
    let job_id = state
        .dataprep
        .start_anonymization(&state.runner, request.document_ids)
        .await?;

    tracing::info!(
        job_id = %job_id,
        documents = document_count,
        admin = %admin.audit_stamp(),
        "anonymization started"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(AnonymizeResponse {
            message: "Anonymization started".to_string(),
            job_id,
            document_count,
        }),
    ))
}
