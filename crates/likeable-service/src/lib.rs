//! # likeable-service
//!
//! Application layer: the likeable operations, the dependency container
//! they run against, the owner registry and the actor resolvers.

pub mod identity;
pub mod likeable;
pub mod registry;
pub mod services;

pub use identity::{with_actor, AnonymousResolver, FixedActorResolver, ScopedActorResolver};
pub use likeable::{Likeable, LikeableRecord};
pub use registry::{OwnerRegistry, OwnerSettings};
pub use services::{
    LikeableService, RebuildReport, ReactionOutcome, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
