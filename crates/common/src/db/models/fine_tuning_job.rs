//! Fine-tuning job entity
//!
//! Status is strictly forward-progressing; terminal states absorb every
//! later write. The rank ordering here backs the guarded updates in the
//! repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fine-tuning job status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Preparing,
    Training,
    Evaluating,
    Completed,
    Failed,
}

impl TrainingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preparing" => Some(TrainingStatus::Preparing),
            "training" => Some(TrainingStatus::Training),
            "evaluating" => Some(TrainingStatus::Evaluating),
            "completed" => Some(TrainingStatus::Completed),
            "failed" => Some(TrainingStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Preparing => "preparing",
            TrainingStatus::Training => "training",
            TrainingStatus::Evaluating => "evaluating",
            TrainingStatus::Completed => "completed",
            TrainingStatus::Failed => "failed",
        }
    }

    /// Position in the forward-only lifecycle. Terminal states share the
    /// top rank so neither can replace the other.
    pub fn rank(&self) -> u8 {
        match self {
            TrainingStatus::Preparing => 0,
            TrainingStatus::Training => 1,
            TrainingStatus::Evaluating => 2,
            TrainingStatus::Completed | TrainingStatus::Failed => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrainingStatus::Completed | TrainingStatus::Failed)
    }

    /// Whether an admin may still cancel a job in this state
    pub fn is_cancellable(&self) -> bool {
        matches!(self, TrainingStatus::Preparing | TrainingStatus::Training)
    }
}

impl From<String> for TrainingStatus {
    fn from(s: String) -> Self {
        TrainingStatus::parse(&s).unwrap_or(TrainingStatus::Preparing)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fine_tuning_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    #[sea_orm(column_type = "Text")]
    pub model_name: String,

    #[sea_orm(column_type = "Text")]
    pub base_model: String,

    pub config: Json,

    #[sea_orm(column_type = "Double")]
    pub progress: f64,

    /// Append-only log text, never truncated
    #[sea_orm(column_type = "Text")]
    pub logs: String,

    /// Synthesized model identifier, set on completion
    #[sea_orm(column_type = "Text", nullable)]
    pub model_id: Option<String>,

    /// Optimistic-lock counter, bumped on every write
    pub version: i32,

    pub start_time: DateTimeWithTimeZone,

    pub end_time: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn training_status(&self) -> TrainingStatus {
        TrainingStatus::from(self.status.clone())
    }

    pub fn is_terminal(&self) -> bool {
        self.training_status().is_terminal()
    }

    /// Last `n` log lines, oldest first
    pub fn tail_logs(&self, n: usize) -> Vec<String> {
        let lines: Vec<&str> = self.logs.lines().filter(|l| !l.is_empty()).collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].iter().map(|s| (*s).to_owned()).collect()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::training_metrics::Entity")]
    Metrics,

    #[sea_orm(has_many = "super::validation_result::Entity")]
    ValidationResults,
}

impl Related<super::training_metrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Metrics.def()
    }
}

impl Related<super::validation_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValidationResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_is_forward_only() {
        assert!(TrainingStatus::Preparing.rank() < TrainingStatus::Training.rank());
        assert!(TrainingStatus::Training.rank() < TrainingStatus::Evaluating.rank());
        assert!(TrainingStatus::Evaluating.rank() < TrainingStatus::Completed.rank());
        // A terminal state can never replace the other terminal state
        assert_eq!(TrainingStatus::Completed.rank(), TrainingStatus::Failed.rank());
    }

    #[test]
    fn test_cancellable_states() {
        assert!(TrainingStatus::Preparing.is_cancellable());
        assert!(TrainingStatus::Training.is_cancellable());
        assert!(!TrainingStatus::Evaluating.is_cancellable());
        assert!(!TrainingStatus::Completed.is_cancellable());
        assert!(!TrainingStatus::Failed.is_cancellable());
    }
}
