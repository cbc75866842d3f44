//! # likeable-core
//!
//! Domain layer for the likeable capability: reactions, denormalized counters,
//! polymorphic owner references, and the store traits the service layer
//! orchestrates. This crate has zero dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{OwnerCount, Reaction, ReactionCounter};
pub use error::DomainError;
pub use traits::{
    ActorResolver, CounterRepository, LikeableStore, LikeableTransaction, ReactionRepository,
    RepoResult,
};
pub use value_objects::{validate_owner_type, ActorId, ActorIdParseError, OwnerRef, ReactionType};
