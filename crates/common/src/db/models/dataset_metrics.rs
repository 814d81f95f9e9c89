//! Dataset metrics snapshot entity
//!
//! Immutable point-in-time aggregate record; snapshots accumulate and the
//! "current" one is simply the most recently created.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dataset_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub total_documents: i32,

    pub total_pairs: i32,

    pub verified_pairs: i32,

    /// JSON map: pair type -> count
    pub type_distribution: Json,

    /// JSON map: quality score (string form) -> count
    pub quality_distribution: Json,

    /// JSON map: language -> count
    pub language_distribution: Json,

    /// JSON map: domain tag -> count; a document contributes once per tag
    pub domain_distribution: Json,

    #[sea_orm(column_type = "Double")]
    pub average_prompt_length: f64,

    #[sea_orm(column_type = "Double")]
    pub average_response_length: f64,

    #[sea_orm(column_type = "Double")]
    pub average_quality_score: f64,

    /// Percentage; 0 when no pairs exist
    #[sea_orm(column_type = "Double")]
    pub verification_rate: f64,

    #[sea_orm(column_type = "Text")]
    pub data_version: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
