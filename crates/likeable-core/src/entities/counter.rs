//! Counter entity - denormalized count of live reactions per owner and type

use serde::{Deserialize, Serialize};

use crate::value_objects::{OwnerRef, ReactionType};

/// Reaction counter entity
///
/// A counter whose count reaches zero is deleted rather than kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounter {
    pub id: i64,
    pub owner: OwnerRef,
    pub reaction_type: ReactionType,
    pub count: i64,
}

impl ReactionCounter {
    /// Create a new ReactionCounter
    pub fn new(id: i64, owner: OwnerRef, reaction_type: ReactionType, count: i64) -> Self {
        Self {
            id,
            owner,
            reaction_type,
            count,
        }
    }
}

/// Grouped reaction count for a single owner id (rebuild input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerCount {
    pub owner_id: i64,
    pub count: i64,
}

impl OwnerCount {
    pub fn new(owner_id: i64, count: i64) -> Self {
        Self { owner_id, count }
    }
}
