//! Identity resolver port

use crate::value_objects::ActorId;

/// Resolves the acting user when a caller does not pass one explicitly.
///
/// Returning `None` means "anonymous"; the service treats mutations by an
/// anonymous actor as no-ops.
pub trait ActorResolver: Send + Sync {
    fn current_actor_id(&self) -> Option<ActorId>;
}

impl<F> ActorResolver for F
where
    F: Fn() -> Option<ActorId> + Send + Sync,
{
    fn current_actor_id(&self) -> Option<ActorId> {
        self()
    }
}
