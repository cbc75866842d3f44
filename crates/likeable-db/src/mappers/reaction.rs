//! Reaction entity <-> model mapper

use likeable_core::{ActorId, DomainError, OwnerRef, Reaction, ReactionType};

use crate::models::ReactionModel;

/// Convert ReactionModel to Reaction entity
impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let reaction_type = ReactionType::new(model.reaction_type).map_err(|e| {
            DomainError::DatabaseError(format!("corrupt reaction row {}: {e}", model.id))
        })?;

        Ok(Reaction {
            id: model.id,
            owner: OwnerRef::new(model.owner_type, model.owner_id),
            user_id: ActorId::new(model.user_id),
            reaction_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Bind values identifying one reaction row
pub struct ReactionKey<'a> {
    pub owner_type: &'a str,
    pub owner_id: i64,
    pub user_id: i64,
    pub reaction_type: &'a str,
}

impl<'a> ReactionKey<'a> {
    pub fn new(owner: &'a OwnerRef, user_id: ActorId, reaction_type: &'a ReactionType) -> Self {
        Self {
            owner_type: &owner.owner_type,
            owner_id: owner.owner_id,
            user_id: user_id.into_inner(),
            reaction_type: reaction_type.as_str(),
        }
    }
}
