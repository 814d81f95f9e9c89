//! Model deployment entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "model_deployments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub job_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub model_endpoint: String,

    #[sea_orm(column_type = "Text")]
    pub deployment_status: String,

    pub total_requests: i64,

    #[sea_orm(column_type = "Double")]
    pub average_latency: f64,

    #[sea_orm(column_type = "Double")]
    pub error_rate: f64,

    #[sea_orm(column_type = "Double")]
    pub uptime_percentage: f64,

    pub deployed_at: DateTimeWithTimeZone,

    pub last_health_check: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
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
