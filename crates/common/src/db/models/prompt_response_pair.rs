//! Prompt-response training pair entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of a synthesized training example
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairType {
    Summarization,
    ClauseExplanation,
    Qa,
    RiskAnalysis,
}

impl PairType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "summarization" => Some(PairType::Summarization),
            "clause_explanation" => Some(PairType::ClauseExplanation),
            "qa" => Some(PairType::Qa),
            "risk_analysis" => Some(PairType::RiskAnalysis),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PairType::Summarization => "summarization",
            PairType::ClauseExplanation => "clause_explanation",
            PairType::Qa => "qa",
            PairType::RiskAnalysis => "risk_analysis",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prompt_response_pairs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub prompt: String,

    #[sea_orm(column_type = "Text")]
    pub response: String,

    #[sea_orm(column_type = "Text")]
    pub pair_type: String,

    /// Must reference an existing document at creation time
    pub source_document_id: Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub source_document_title: Option<String>,

    /// 1-5
    pub quality_score: i32,

    pub is_verified: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub reviewed_by: Option<String>,

    /// JSON array of free-form tags
    pub tags: Json,

    #[sea_orm(column_type = "Text", nullable)]
    pub difficulty: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub domain: Option<String>,

    /// Soft flag only; pairs are immutable once used in training
    pub used_in_training: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::legal_document::Entity",
        from = "Column::SourceDocumentId",
        to = "super::legal_document::Column::Id"
    )]
    SourceDocument,
}

impl Related<super::legal_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SourceDocument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
