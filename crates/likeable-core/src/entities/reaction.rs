//! Reaction entity - one user's like/dislike on one owner record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ActorId, OwnerRef, ReactionType};

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: i64,
    pub owner: OwnerRef,
    pub user_id: ActorId,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction with both timestamps set to now
    pub fn new(id: i64, owner: OwnerRef, user_id: ActorId, reaction_type: ReactionType) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner,
            user_id,
            reaction_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this reaction is keyed by the given tuple
    #[inline]
    pub fn matches(&self, owner: &OwnerRef, user_id: ActorId, reaction_type: &ReactionType) -> bool {
        self.owner == *owner && self.user_id == user_id && self.reaction_type == *reaction_type
    }
}
