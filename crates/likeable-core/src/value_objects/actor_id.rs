//! Actor ID - identifier of the user performing a reaction

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of the acting user (maps to `reactions.user_id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ActorId(i64);

impl ActorId {
    /// Create a new ActorId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, ActorIdParseError> {
        s.trim()
            .parse::<i64>()
            .map(ActorId)
            .map_err(|_| ActorIdParseError::InvalidFormat)
    }
}

/// Error when parsing an ActorId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActorIdParseError {
    #[error("invalid actor id format")]
    InvalidFormat,
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ActorId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ActorId> for i64 {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ActorId {
    type Err = ActorIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActorId::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for ActorId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for ActorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ActorIdVisitor;

        impl<'de> Visitor<'de> for ActorIdVisitor {
            type Value = ActorId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing an actor ID")
            }

            fn visit_i64<E>(self, value: i64) -> Result<ActorId, E>
            where
                E: de::Error,
            {
                Ok(ActorId(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<ActorId, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(ActorId)
                    .map_err(|_| de::Error::custom("actor id out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<ActorId, E>
            where
                E: de::Error,
            {
                ActorId::parse(value).map_err(|_| de::Error::custom("invalid actor id string"))
            }
        }

        deserializer.deserialize_any(ActorIdVisitor)
    }
}
