//! Reaction type - open string enum with "like" and "dislike" as canonical values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Kind of reaction stored in `reactions.type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReactionType(String);

impl ReactionType {
    pub const LIKE: &'static str = "like";
    pub const DISLIKE: &'static str = "dislike";

    /// Maximum stored length of a reaction type
    pub const MAX_LEN: usize = 64;

    /// Create a validated reaction type
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidReactionType(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn like() -> Self {
        Self(Self::LIKE.to_string())
    }

    pub fn dislike() -> Self {
        Self(Self::DISLIKE.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_like(&self) -> bool {
        self.0 == Self::LIKE
    }

    #[inline]
    pub fn is_dislike(&self) -> bool {
        self.0 == Self::DISLIKE
    }
}

impl Default for ReactionType {
    fn default() -> Self {
        Self::like()
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReactionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReactionType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReactionType> for String {
    fn from(value: ReactionType) -> Self {
        value.0
    }
}

impl std::str::FromStr for ReactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
