/// Configuration for the media catalog.
///
/// Loads from environment variables.
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{CatalogError, Result};

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

// Default values
fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` is required. The pool size variables are optional
    /// but must parse when set.
    pub fn from_env() -> Result<Self> {
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .map_err(|_| CatalogError::Config("DATABASE_URL not set".to_string()))?,
            max_connections: env_pool_size("DB_MAX_CONNECTIONS", default_max_connections())?,
            min_connections: env_pool_size("DB_MIN_CONNECTIONS", default_min_connections())?,
        };

        Ok(Config { database })
    }
}

/// An optional numeric variable: absent means `default`, present must
/// parse.
fn env_pool_size(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            CatalogError::Config(format!("{} must be a number, got {:?}", name, raw))
        }),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(CatalogError::Config(format!("{} is unreadable: {}", name, e))),
    }
}

impl DatabaseConfig {
    /// Build the connection pool the repositories share.
    pub async fn connect(&self) -> Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect(&self.url)
            .await?;

        tracing::debug!(max = self.max_connections, "database pool ready");
        Ok(pool)
    }
}
