//! Request handlers

pub mod admin;
pub mod analytics;
pub mod dataset;
pub mod documents;
pub mod fine_tuning;
pub mod health;
pub mod pairs;
