//! Value objects - immutable types that represent domain concepts

mod actor_id;
mod owner_ref;
mod reaction_type;

pub use actor_id::{ActorId, ActorIdParseError};
pub use owner_ref::{validate_owner_type, OwnerRef};
pub use reaction_type::ReactionType;
