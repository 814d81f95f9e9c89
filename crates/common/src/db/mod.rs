//! Database layer for LexForge
//!
//! SeaORM entity models, the `Repository` data-access facade, and the
//! connection pool it runs on.

pub mod models;
mod repository;

pub use repository::{NewDocument, NewPair, Repository, TrainingScoreSet};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Connection pool with an optional read replica.
///
/// Reads prefer the replica when one is configured; writes always go to
/// the primary.
#[derive(Clone)]
pub struct DbPool {
    primary: DatabaseConnection,
    replica: Option<DatabaseConnection>,
}

impl DbPool {
    /// Open the primary connection, and the replica when configured
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let primary = connect(&config.url, config, "primary").await?;

        let replica = match config.read_url.as_deref() {
            Some(read_url) => Some(connect(read_url, config, "replica").await?),
            None => None,
        };

        Ok(Self { primary, replica })
    }

    /// Connection for reads, falling back to the primary without a replica
    pub fn read(&self) -> &DatabaseConnection {
        self.replica.as_ref().unwrap_or(&self.primary)
    }

    /// Connection for writes
    pub fn write(&self) -> &DatabaseConnection {
        &self.primary
    }

    /// Round-trip a trivial query on every open connection
    pub async fn ping(&self) -> Result<()> {
        ping_conn(&self.primary, "primary").await?;
        if let Some(replica) = &self.replica {
            ping_conn(replica, "replica").await?;
        }
        Ok(())
    }
}

async fn connect(
    url: &str,
    config: &DatabaseConfig,
    role: &'static str,
) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(true);

    let conn = Database::connect(opts)
        .await
        .map_err(|e| AppError::DatabaseConnection {
            message: format!("{} connection failed: {}", role, e),
        })?;

    info!(role, "database connection established");
    Ok(conn)
}

async fn ping_conn(conn: &DatabaseConnection, role: &'static str) -> Result<()> {
    conn.execute_unprepared("SELECT 1")
        .await
        .map_err(|e| AppError::DatabaseConnection {
            message: format!("{} ping failed: {}", role, e),
        })?;
    Ok(())
}
