//! LexForge Data Preparation Library
//!
//! Turns uploaded legal documents into training data:
//! - Redaction of sensitive information (PII, amounts, names)
//! - Complexity and legal-domain classification
//! - Prompt-response pair synthesis
//! - Dataset aggregation and export

pub mod aggregator;
pub mod classifier;
pub mod export;
pub mod jobs;
pub mod redaction;
pub mod synthesizer;

pub use aggregator::DatasetSnapshot;
pub use jobs::DataPrepService;
pub use export::{ExportArtifact, ExportFilter, ExportFormat};
pub use redaction::Redactor;
