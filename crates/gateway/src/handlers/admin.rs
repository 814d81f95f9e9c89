//! System administration handlers

use axum::{extract::State, Json};
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde::Serialize;

use crate::AppState;
use lexforge_common::{auth::AdminContext, errors::Result};

#[derive(Serialize)]
pub struct SystemInfo {
    pub version: String,
    pub service_name: String,
    pub database_status: String,
    pub active_background_jobs: usize,
    pub max_concurrent_jobs: usize,
}

#[derive(Serialize)]
pub struct DatabaseStats {
    pub total_tables: i64,
    pub database_size: String,
    pub active_connections: i64,
}

/// Service version and dependency status
pub async fn system_info(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<SystemInfo>> {
    let database_status = match state.db.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(_) => "error".to_string(),
    };

    Ok(Json(SystemInfo {
        version: lexforge_common::VERSION.to_string(),
        service_name: state.config.observability.service_name.clone(),
        database_status,
        active_background_jobs: state.runner.active_jobs(),
        max_concurrent_jobs: state.config.jobs.max_concurrent,
    }))
}

/// Postgres-level statistics for the admin dashboard
pub async fn database_stats(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<DatabaseStats>> {
    let conn = state.db.read();

    let total_tables = scalar_i64(
        conn,
        "SELECT COUNT(*) AS value FROM information_schema.tables WHERE table_schema = 'public'",
    )
    .await?;

    let database_size = conn
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT pg_size_pretty(pg_database_size(current_database())) AS value",
        ))
        .await?
        .map(|row| row.try_get::<String>("", "value"))
        .transpose()?
        .unwrap_or_default();

    let active_connections = scalar_i64(
        conn,
        "SELECT COUNT(*) AS value FROM pg_stat_activity WHERE state = 'active'",
    )
    .await?;

    Ok(Json(DatabaseStats {
        total_tables,
        database_size,
        active_connections,
    }))
}

async fn scalar_i64(conn: &sea_orm::DatabaseConnection, sql: &str) -> Result<i64> {
    let value = conn
        .query_one(Statement::from_string(DbBackend::Postgres, sql))
        .await?
        .map(|row| row.try_get::<i64>("", "value"))
        .transpose()?
        .unwrap_or(0);
    Ok(value)
}
