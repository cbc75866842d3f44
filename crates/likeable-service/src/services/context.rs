//! Service context - dependency container for services
//!
//! Holds the store, the actor resolver and the owner registry.

use std::sync::Arc;

use likeable_common::{AppError, LikeableConfig};
use likeable_core::{ActorResolver, LikeableStore};
use likeable_db::{PgLikeableStore, PgPool};

use crate::identity::AnonymousResolver;
use crate::registry::OwnerRegistry;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn LikeableStore>,
    actors: Arc<dyn ActorResolver>,
    registry: Arc<OwnerRegistry>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        store: Arc<dyn LikeableStore>,
        actors: Arc<dyn ActorResolver>,
        registry: OwnerRegistry,
    ) -> Self {
        Self {
            store,
            actors,
            registry: Arc::new(registry),
        }
    }

    /// Context backed by PostgreSQL, with the registry taken from `config`
    pub fn postgres(
        pool: PgPool,
        actors: Arc<dyn ActorResolver>,
        config: &LikeableConfig,
    ) -> ServiceResult<Self> {
        let registry = OwnerRegistry::from_config(&config.cascade)
            .map_err(|e| ServiceError::App(AppError::from(e)))?;
        Ok(Self::new(
            Arc::new(PgLikeableStore::new(pool)),
            actors,
            registry,
        ))
    }

    pub fn store(&self) -> &dyn LikeableStore {
        self.store.as_ref()
    }

    pub fn actors(&self) -> &dyn ActorResolver {
        self.actors.as_ref()
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn LikeableStore")
            .field("actors", &"dyn ActorResolver")
            .field("registry", &self.registry)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn LikeableStore>>,
    actors: Option<Arc<dyn ActorResolver>>,
    registry: Option<OwnerRegistry>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            actors: None,
            registry: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn LikeableStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn actors(mut self, actors: Arc<dyn ActorResolver>) -> Self {
        self.actors = Some(actors);
        self
    }

    pub fn registry(mut self, registry: OwnerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the ServiceContext
    ///
    /// The actor resolver defaults to `AnonymousResolver` and the registry
    /// to `OwnerRegistry::new()`.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if no store was supplied
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.actors.unwrap_or_else(|| Arc::new(AnonymousResolver)),
            self.registry.unwrap_or_default(),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likeable_core::ActorId;
    use likeable_db::MemoryLikeableStore;

    #[test]
    fn test_build_requires_store() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_build_defaults() {
        let ctx = ServiceContextBuilder::new()
            .store(Arc::new(MemoryLikeableStore::new()))
            .build()
            .unwrap();
        assert_eq!(ctx.actors().current_actor_id(), None);
        assert!(ctx.registry().removes_on_delete("post"));
    }

    #[test]
    fn test_build_with_closure_resolver() {
        let ctx = ServiceContextBuilder::new()
            .store(Arc::new(MemoryLikeableStore::new()))
            .actors(Arc::new(|| Some(ActorId::new(8))))
            .build()
            .unwrap();
        assert_eq!(ctx.actors().current_actor_id(), Some(ActorId::new(8)));
    }
}
