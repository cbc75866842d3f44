//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use likeable_core::ReactionType;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main configuration for the likeable service and its tooling
#[derive(Debug, Clone, Deserialize)]
pub struct LikeableConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub cascade: CascadeConfig,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Cascade cleanup when an owner record is deleted
#[derive(Debug, Clone, Deserialize)]
pub struct CascadeConfig {
    /// Default for owner types without an explicit setting
    #[serde(default = "default_cascade_enabled")]
    pub enabled: bool,
    /// Owner types whose reactions survive owner deletion
    #[serde(default)]
    pub keep_on_delete: Vec<String>,
    /// Reaction types removed by the cascade
    #[serde(default = "default_cascade_types")]
    pub reaction_types: Vec<String>,
}

impl CascadeConfig {
    /// Whether deleting an owner of this type removes its reactions
    #[must_use]
    pub fn removes_on_delete(&self, owner_type: &str) -> bool {
        self.enabled && !self.keep_on_delete.iter().any(|t| t == owner_type)
    }

    /// Validated reaction types removed by the cascade
    pub fn parsed_reaction_types(&self) -> Result<Vec<ReactionType>, ConfigError> {
        self.reaction_types
            .iter()
            .map(|t| {
                ReactionType::new(t.as_str()).map_err(|e| {
                    ConfigError::InvalidValue("LIKEABLE_CASCADE_TYPES", e.to_string())
                })
            })
            .collect()
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            enabled: default_cascade_enabled(),
            keep_on_delete: Vec::new(),
            reaction_types: default_cascade_types(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "likeable".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_cascade_enabled() -> bool {
    true
}

fn default_cascade_types() -> Vec<String> {
    vec![
        ReactionType::LIKE.to_string(),
        ReactionType::DISLIKE.to_string(),
    ]
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(key, other.to_string())),
    }
}

impl LikeableConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key, v.clone()))
                })
                .transpose()
        };

        let cascade = CascadeConfig {
            enabled: lookup("LIKEABLE_CASCADE_ON_DELETE")
                .map(|v| parse_bool("LIKEABLE_CASCADE_ON_DELETE", &v))
                .transpose()?
                .unwrap_or_else(default_cascade_enabled),
            keep_on_delete: lookup("LIKEABLE_KEEP_ON_DELETE")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            reaction_types: lookup("LIKEABLE_CASCADE_TYPES")
                .map(|v| split_list(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_cascade_types),
        };
        cascade.parsed_reaction_types()?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS")?
                    .map_or_else(default_max_connections, |v| v as u32),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS")?
                    .map_or_else(default_min_connections, |v| v as u32),
                acquire_timeout_secs: parsed("DATABASE_ACQUIRE_TIMEOUT_SECS")?
                    .unwrap_or_else(default_acquire_timeout_secs),
            },
            cascade,
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::to_lowercase) {
                None => LogFormat::default(),
                Some(v) if v == "pretty" => LogFormat::Pretty,
                Some(v) if v == "json" => LogFormat::Json,
                Some(v) => return Err(ConfigError::InvalidValue("LOG_FORMAT", v)),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
