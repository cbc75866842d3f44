//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid owner type: {0:?} (owner type tag is required)")]
    InvalidOwnerType(String),

    #[error("Invalid reaction type: {0:?}")]
    InvalidReactionType(String),

    // =========================================================================
    // Identity Errors
    // =========================================================================
    #[error("No actor supplied and none could be resolved")]
    ActorUnresolved,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    DuplicateReaction,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Validation
            Self::InvalidOwnerType(_) => "INVALID_OWNER_TYPE",
            Self::InvalidReactionType(_) => "INVALID_REACTION_TYPE",

            // Identity
            Self::ActorUnresolved => "ACTOR_UNRESOLVED",

            // Conflict
            Self::DuplicateReaction => "DUPLICATE_REACTION",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidOwnerType(_) | Self::InvalidReactionType(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateReaction)
    }

    /// Check if this error originated in the backing store
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}
