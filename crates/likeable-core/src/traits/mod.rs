//! Traits (ports) implemented by the infrastructure layer

mod identity;
mod repositories;

pub use identity::ActorResolver;
pub use repositories::{
    CounterRepository, LikeableStore, LikeableTransaction, ReactionRepository, RepoResult,
};
