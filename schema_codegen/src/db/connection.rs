//! Database connection handling
//!
//! This module establishes the MySQL connection the metadata queries run on.

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// Pooled connection to the MySQL server being inspected
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: Pool<MySql>,
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.database.is_empty() {
            return Err(Error::ConfigError("You didn't specify a database".to_string()));
        }

        let pool_size = config.pool_size.unwrap_or(1);
        let timeout_seconds = config.timeout_seconds.unwrap_or(30);

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::DatabaseError(format!("Failed to connect to {}: {}", config.describe(), e))
            })?;

        tracing::info!(host = %config.host, port = config.port, database = %config.database, "Connected");
        Ok(Self { pool })
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &Pool<MySql> {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
