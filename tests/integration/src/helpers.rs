//! Test helpers for integration tests
//!
//! Builds service contexts over the available stores and checks the
//! counter invariant.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Result};
use likeable_core::{OwnerRef, ReactionType};
use likeable_db::{create_pool_from_env, run_migrations, MemoryLikeableStore, PgLikeableStore};
use likeable_service::{
    LikeableService, OwnerRegistry, ScopedActorResolver, ServiceContext, ServiceContextBuilder,
};

use crate::fixtures::{Comment, Post};

/// Registry knowing both fixture record types
pub fn test_registry() -> OwnerRegistry {
    OwnerRegistry::new()
        .register_likeable::<Post>()
        .register_likeable::<Comment>()
}

/// Context over a fresh in-memory store
pub fn memory_context() -> ServiceContext {
    memory_context_with(test_registry())
}

pub fn memory_context_with(registry: OwnerRegistry) -> ServiceContext {
    ServiceContext::new(
        Arc::new(MemoryLikeableStore::new()),
        Arc::new(ScopedActorResolver),
        registry,
    )
}

/// Check if PostgreSQL tests can run
pub fn check_test_env() -> bool {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Context over PostgreSQL with migrations applied
pub async fn postgres_context() -> Result<ServiceContext> {
    let pool = create_pool_from_env().await?;
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    run_migrations(&pool, dir).await?;

    Ok(ServiceContextBuilder::new()
        .store(Arc::new(PgLikeableStore::new(pool)))
        .actors(Arc::new(ScopedActorResolver))
        .registry(test_registry())
        .build()?)
}

/// Assert that each owner's counter equals its live reaction count.
///
/// All owners must share one owner type.
pub async fn assert_counters_consistent(
    ctx: &ServiceContext,
    owners: &[OwnerRef],
    reaction_type: &ReactionType,
) -> Result<()> {
    let Some(owner_type) = owners.first().map(|o| o.owner_type.as_str()) else {
        return Ok(());
    };

    let live: HashMap<i64, i64> = ctx
        .store()
        .reactions()
        .count_by_owner_type(owner_type, reaction_type)
        .await?
        .into_iter()
        .map(|row| (row.owner_id, row.count))
        .collect();

    let service = LikeableService::new(ctx);
    for owner in owners {
        let expected = live.get(&owner.owner_id).copied().unwrap_or(0);
        let counter = ctx.store().counters().find(owner, reaction_type).await?;
        ensure!(
            service.like_count(owner, reaction_type).await? == expected,
            "counter for {owner} drifted: expected {expected}, found {counter:?}"
        );
        ensure!(
            expected > 0 || counter.is_none(),
            "counter row for {owner} should be absent at zero"
        );
    }
    Ok(())
}
