//! Owner reference - polymorphic pointer to any likeable record

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Identifies the liked record by its type tag and numeric id.
///
/// Never a live object: callers resolve it against their own store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerRef {
    pub owner_type: String,
    pub owner_id: i64,
}

impl OwnerRef {
    /// Create a new OwnerRef
    pub fn new(owner_type: impl Into<String>, owner_id: i64) -> Self {
        Self {
            owner_type: owner_type.into(),
            owner_id,
        }
    }

    /// Reject references whose type tag is empty or whitespace
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_owner_type(&self.owner_type)
    }
}

/// Owner type tags are a required grouping key for every stored row
pub fn validate_owner_type(owner_type: &str) -> Result<(), DomainError> {
    if owner_type.trim().is_empty() {
        return Err(DomainError::InvalidOwnerType(owner_type.to_string()));
    }
    Ok(())
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner_type, self.owner_id)
    }
}
