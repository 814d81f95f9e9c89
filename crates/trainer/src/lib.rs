//! LexForge Trainer Library
//!
//! Simulated fine-tuning lifecycle: staged training progress, metric
//! evaluation, a validation battery, and progress reporting. No model is
//! ever trained; scores derive deterministically from job identity so the
//! platform behaves consistently end to end.

pub mod scoring;
pub mod simulator;
pub mod validation;

pub use scoring::{DigestScoreStrategy, ScoreStrategy};
pub use simulator::{job_statistics, ProgressReport, TrainerService};
