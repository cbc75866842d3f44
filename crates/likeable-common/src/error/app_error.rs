//! Application error types
//!
//! Unified error handling for binaries and embedding applications.

use likeable_core::DomainError;
use serde::Serialize;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Process exit code for this error (sysexits.h conventions)
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            // EX_USAGE
            Self::Validation(_) => 64,

            // EX_UNAVAILABLE
            Self::Database(_) | Self::Migration(_) => 69,

            // EX_SOFTWARE
            Self::Internal(_) => 70,

            // EX_CONFIG
            Self::Config(_) => 78,

            Self::Domain(e) => {
                if e.is_validation() {
                    64
                } else if e.is_conflict() {
                    65
                } else if e.is_infrastructure() {
                    69
                } else {
                    70
                }
            }
        }
    }

    /// Get error code for structured output
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the caller supplied bad input
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.exit_code(), 64 | 65)
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Error payload for JSON output
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
