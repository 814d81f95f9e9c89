//! Data processing job entity
//!
//! Tracks document processing, pair generation, and anonymization runs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Processing job kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingJobType {
    DocumentProcessing,
    PairGeneration,
    Anonymization,
}

impl ProcessingJobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingJobType::DocumentProcessing => "document_processing",
            ProcessingJobType::PairGeneration => "pair_generation",
            ProcessingJobType::Anonymization => "anonymization",
        }
    }
}

/// Processing job status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl From<String> for ProcessingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "running" => ProcessingStatus::Running,
            "completed" => ProcessingStatus::Completed,
            "failed" => ProcessingStatus::Failed,
            _ => ProcessingStatus::Pending,
        }
    }
}

impl From<ProcessingStatus> for String {
    fn from(status: ProcessingStatus) -> Self {
        match status {
            ProcessingStatus::Pending => "pending".to_string(),
            ProcessingStatus::Running => "running".to_string(),
            ProcessingStatus::Completed => "completed".to_string(),
            ProcessingStatus::Failed => "failed".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_processing_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub job_type: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    /// JSON array of input document ids
    pub input_documents: Json,

    /// JSON array of produced pair ids
    pub output_pairs: Json,

    pub config: Json,

    #[sea_orm(column_type = "Double")]
    pub progress: f64,

    pub total_items: i32,

    pub processed_items: i32,

    pub failed_items: i32,

    pub results: Json,

    /// Append-only, never truncated
    #[sea_orm(column_type = "Text", nullable)]
    pub error_log: Option<String>,

    /// Optimistic-lock counter, bumped on every write
    pub version: i32,

    pub start_time: Option<DateTimeWithTimeZone>,

    pub end_time: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn processing_status(&self) -> ProcessingStatus {
        ProcessingStatus::from(self.status.clone())
    }

    /// Check if the job is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.processing_status(),
            ProcessingStatus::Completed | ProcessingStatus::Failed
        )
    }

    /// Input document ids as uuids
    pub fn input_document_ids(&self) -> Vec<Uuid> {
        self.input_documents
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().and_then(|s| Uuid::parse_str(s).ok()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
