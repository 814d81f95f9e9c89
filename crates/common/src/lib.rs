//! LexForge Common Library
//!
//! Shared code for all LexForge services including:
//! - Database models and repository patterns
//! - Error types and handling
//! - Configuration management
//! - Admin authentication utilities
//! - Background job runner with cancellation
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod runner;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};
pub use runner::JobRunner;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base model offered for fine-tuning
pub const DEFAULT_BASE_MODEL: &str = "gemini-1.5-flash";
