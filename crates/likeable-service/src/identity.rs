//! Actor resolvers
//!
//! Implementations of `ActorResolver` for the common ways a host knows who
//! is acting: nobody, a fixed service account, or an actor bound to the
//! current task.

use std::future::Future;

use likeable_core::{ActorId, ActorResolver};

tokio::task_local! {
    static CURRENT_ACTOR: ActorId;
}

/// Resolver for contexts without a user; every mutation becomes a no-op
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousResolver;

impl ActorResolver for AnonymousResolver {
    fn current_actor_id(&self) -> Option<ActorId> {
        None
    }
}

/// Resolver that always answers with the same actor
#[derive(Debug, Clone, Copy)]
pub struct FixedActorResolver(pub ActorId);

impl ActorResolver for FixedActorResolver {
    fn current_actor_id(&self) -> Option<ActorId> {
        Some(self.0)
    }
}

/// Resolver reading the actor bound by [`with_actor`] on the current task
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedActorResolver;

impl ActorResolver for ScopedActorResolver {
    fn current_actor_id(&self) -> Option<ActorId> {
        CURRENT_ACTOR.try_with(|actor| *actor).ok()
    }
}

/// Run `fut` with `actor` as the current actor for [`ScopedActorResolver`].
///
/// The binding does not cross `tokio::spawn`; spawned tasks must be
/// wrapped again.
pub async fn with_actor<F>(actor: ActorId, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_ACTOR.scope(actor, fut).await
}
