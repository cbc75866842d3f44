//! PostgreSQL connection pool management

use likeable_common::{ConfigError, DatabaseConfig, LikeableConfig};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Pool settings derived from `DatabaseConfig`
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    /// Never above `max_connections`
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolConfig {
    const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
    const MAX_LIFETIME: Duration = Duration::from_secs(1800);

    /// Pool settings from the `DATABASE_*` variables (and `.env`)
    pub fn from_env() -> Result<Self, ConfigError> {
        LikeableConfig::from_env().map(|config| Self::from(&config.database))
    }

    /// Host and database part of the URL, without credentials
    pub fn redacted_url(&self) -> &str {
        self.url
            .rsplit_once('@')
            .map_or(self.url.as_str(), |(_, host)| host)
    }
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections.min(config.max_connections),
            acquire_timeout: config.acquire_timeout(),
            idle_timeout: Self::IDLE_TIMEOUT,
            max_lifetime: Self::MAX_LIFETIME,
        }
    }
}

/// Create a new PostgreSQL connection pool
#[instrument(skip(config), fields(db = %config.redacted_url()))]
pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "PostgreSQL pool ready"
    );
    Ok(pool)
}

/// Create a connection pool from the environment
pub async fn create_pool_from_env() -> Result<PgPool, PoolError> {
    let config = PoolConfig::from_env()?;
    Ok(create_pool(&config).await?)
}

/// Failure to build a pool from the environment
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to connect: {0}")]
    Connect(#[from] sqlx::Error),
}
