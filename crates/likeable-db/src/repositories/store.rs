//! PostgreSQL implementation of LikeableStore

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::instrument;

use likeable_core::traits::{
    CounterRepository, LikeableStore, LikeableTransaction, ReactionRepository, RepoResult,
};

use super::connection::SharedTransaction;
use super::counter::PgCounterRepository;
use super::error::{map_db_error, transaction_finished};
use super::reaction::PgReactionRepository;

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgLikeableStore {
    pool: PgPool,
    reactions: PgReactionRepository,
    counters: PgCounterRepository,
}

impl PgLikeableStore {
    /// Create a new PgLikeableStore
    pub fn new(pool: PgPool) -> Self {
        Self {
            reactions: PgReactionRepository::new(pool.clone()),
            counters: PgCounterRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LikeableStore for PgLikeableStore {
    fn reactions(&self) -> &dyn ReactionRepository {
        &self.reactions
    }

    fn counters(&self) -> &dyn CounterRepository {
        &self.counters
    }

    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LikeableTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgLikeableTransaction::new(Arc::new(Mutex::new(
            Some(tx),
        )))))
    }
}

/// A PostgreSQL transaction shared by a reaction and a counter repository.
///
/// Dropped without commit, sqlx rolls the transaction back.
pub struct PgLikeableTransaction {
    tx: SharedTransaction,
    reactions: PgReactionRepository,
    counters: PgCounterRepository,
}

impl PgLikeableTransaction {
    fn new(tx: SharedTransaction) -> Self {
        Self {
            reactions: PgReactionRepository::with_transaction(Arc::clone(&tx)),
            counters: PgCounterRepository::with_transaction(Arc::clone(&tx)),
            tx,
        }
    }
}

#[async_trait]
impl LikeableTransaction for PgLikeableTransaction {
    fn reactions(&self) -> &dyn ReactionRepository {
        &self.reactions
    }

    fn counters(&self) -> &dyn CounterRepository {
        &self.counters
    }

    #[instrument(skip(self))]
    async fn lock_reactions(&self) -> RepoResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(transaction_finished)?;

        // SHARE conflicts with the ROW EXCLUSIVE lock taken by INSERT/DELETE
        sqlx::query("LOCK TABLE reactions IN SHARE MODE")
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn commit(&self) -> RepoResult<()> {
        let tx = self.tx.lock().await.take().ok_or_else(transaction_finished)?;
        tx.commit().await.map_err(map_db_error)
    }

    async fn rollback(&self) -> RepoResult<()> {
        let tx = self.tx.lock().await.take().ok_or_else(transaction_finished)?;
        tx.rollback().await.map_err(map_db_error)
    }
}
