//! Training metrics entity
//!
//! One row per completed fine-tuning job; immutable once written.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// References a job whose status is completed or later in its lifecycle
    pub job_id: Uuid,

    #[sea_orm(column_type = "Double")]
    pub accuracy: f64,

    #[sea_orm(column_type = "Double")]
    pub relevance: f64,

    #[sea_orm(column_type = "Double")]
    pub readability: f64,

    #[sea_orm(column_type = "Double")]
    pub coherence: f64,

    #[sea_orm(column_type = "Double")]
    pub legal_accuracy: f64,

    #[sea_orm(column_type = "Double")]
    pub simplification_score: f64,

    #[sea_orm(column_type = "Double")]
    pub clause_explanation_score: f64,

    #[sea_orm(column_type = "Double")]
    pub qa_score: f64,

    #[sea_orm(column_type = "Double")]
    pub overall_score: f64,

    #[sea_orm(column_type = "Double", nullable)]
    pub training_loss: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub validation_loss: Option<f64>,

    #[sea_orm(column_type = "Double", nullable)]
    pub learning_rate: Option<f64>,

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
