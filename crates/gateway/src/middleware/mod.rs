//! Gateway middleware

pub mod auth;
pub mod track;
