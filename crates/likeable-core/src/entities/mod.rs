//! Domain entities - reaction rows and their denormalized counters

mod counter;
mod reaction;

pub use counter::{OwnerCount, ReactionCounter};
pub use reaction::Reaction;
