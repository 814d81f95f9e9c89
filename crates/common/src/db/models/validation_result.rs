//! Validation result entity
//!
//! One row per canned validation query run during a job's evaluation phase.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "validation_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub job_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub query: String,

    #[sea_orm(column_type = "Text")]
    pub expected_response: String,

    #[sea_orm(column_type = "Text")]
    pub actual_response: String,

    #[sea_orm(column_type = "Double")]
    pub accuracy_score: f64,

    #[sea_orm(column_type = "Double")]
    pub relevance_score: f64,

    #[sea_orm(column_type = "Double")]
    pub readability_score: f64,

    #[sea_orm(column_type = "Text", nullable)]
    pub test_category: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub difficulty: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fine_tuning_job::Entity",
        from = "Column::JobId",
        to = "super::fine_tuning_job::Column::Id"
    )]
    Job,
}

impl Related<super::fine_tuning_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
