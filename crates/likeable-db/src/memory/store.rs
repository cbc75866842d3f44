//! MemoryLikeableStore - LikeableStore over in-process tables

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::instrument;

use likeable_core::traits::{
    CounterRepository, LikeableStore, LikeableTransaction, ReactionRepository, RepoResult,
};
use likeable_core::{
    validate_owner_type, ActorId, OwnerCount, OwnerRef, Reaction, ReactionCounter, ReactionType,
};

use crate::repositories::error::transaction_finished;

use super::state::MemoryState;

/// Working copy of an open transaction plus the lock on committed state
struct TxState {
    committed: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[derive(Clone)]
enum MemoryConn {
    Shared(Arc<Mutex<MemoryState>>),
    Transaction(Arc<Mutex<Option<TxState>>>),
}

impl MemoryConn {
    async fn with_state<T, F>(&self, f: F) -> RepoResult<T>
    where
        F: FnOnce(&mut MemoryState) -> T + Send,
        T: Send,
    {
        match self {
            Self::Shared(state) => {
                let mut state = state.lock().await;
                Ok(f(&mut state))
            }
            Self::Transaction(tx) => {
                let mut tx = tx.lock().await;
                let tx = tx.as_mut().ok_or_else(transaction_finished)?;
                Ok(f(&mut tx.working))
            }
        }
    }
}

/// In-process store.
///
/// An open transaction blocks every other access to the store until it is
/// committed, rolled back, or dropped, so a task must not read through the
/// store while it holds a transaction of its own.
#[derive(Clone)]
pub struct MemoryLikeableStore {
    state: Arc<Mutex<MemoryState>>,
    reactions: MemoryReactionRepository,
    counters: MemoryCounterRepository,
}

impl MemoryLikeableStore {
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(MemoryState::default()));
        let conn = MemoryConn::Shared(Arc::clone(&state));
        Self {
            state,
            reactions: MemoryReactionRepository { conn: conn.clone() },
            counters: MemoryCounterRepository { conn },
        }
    }
}

impl Default for MemoryLikeableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryLikeableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLikeableStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl LikeableStore for MemoryLikeableStore {
    fn reactions(&self) -> &dyn ReactionRepository {
        &self.reactions
    }

    fn counters(&self) -> &dyn CounterRepository {
        &self.counters
    }

    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LikeableTransaction>> {
        let committed = Arc::clone(&self.state).lock_owned().await;
        let working = MemoryState::clone(&committed);
        let inner = Arc::new(Mutex::new(Some(TxState { committed, working })));
        let conn = MemoryConn::Transaction(Arc::clone(&inner));

        Ok(Box::new(MemoryTransaction {
            inner,
            reactions: MemoryReactionRepository { conn: conn.clone() },
            counters: MemoryCounterRepository { conn },
        }))
    }
}

/// Transaction over a MemoryLikeableStore
pub struct MemoryTransaction {
    inner: Arc<Mutex<Option<TxState>>>,
    reactions: MemoryReactionRepository,
    counters: MemoryCounterRepository,
}

#[async_trait]
impl LikeableTransaction for MemoryTransaction {
    fn reactions(&self) -> &dyn ReactionRepository {
        &self.reactions
    }

    fn counters(&self) -> &dyn CounterRepository {
        &self.counters
    }

    async fn lock_reactions(&self) -> RepoResult<()> {
        // the transaction already holds the store lock
        self.inner
            .lock()
            .await
            .as_ref()
            .map(|_| ())
            .ok_or_else(transaction_finished)
    }

    async fn commit(&self) -> RepoResult<()> {
        let TxState {
            mut committed,
            working,
        } = self.inner.lock().await.take().ok_or_else(transaction_finished)?;
        *committed = working;
        Ok(())
    }

    async fn rollback(&self) -> RepoResult<()> {
        self.inner
            .lock()
            .await
            .take()
            .map(drop)
            .ok_or_else(transaction_finished)
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[derive(Clone)]
struct MemoryReactionRepository {
    conn: MemoryConn,
}

#[async_trait]
impl ReactionRepository for MemoryReactionRepository {
    async fn find(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        self.conn
            .with_state(|state| state.find_reaction(owner, user_id, reaction_type))
            .await
    }

    async fn find_by_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Reaction>> {
        let limit = limit.clamp(1, 100) as usize;
        self.conn
            .with_state(|state| state.reactions_for_owner(owner, reaction_type, limit))
            .await
    }

    async fn create(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        owner.validate()?;
        self.conn
            .with_state(|state| state.insert_reaction(owner, user_id, reaction_type))
            .await
    }

    async fn delete(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<bool> {
        self.conn
            .with_state(|state| state.delete_reaction(owner, user_id, reaction_type))
            .await
    }

    async fn count_by_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<OwnerCount>> {
        self.conn
            .with_state(|state| state.count_by_owner_type(owner_type, reaction_type))
            .await
    }

    async fn delete_for_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<u64> {
        self.conn
            .with_state(|state| state.delete_reactions_for_owner(owner, reaction_type))
            .await
    }

    async fn filter_liked_by(
        &self,
        owner_type: &str,
        owner_ids: &[i64],
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>> {
        let liked = self
            .conn
            .with_state(|state| state.owner_ids_liked_by(owner_type, user_id, reaction_type))
            .await?;
        Ok(liked
            .into_iter()
            .filter(|id| owner_ids.contains(id))
            .collect())
    }

    async fn find_owner_ids_liked_by(
        &self,
        owner_type: &str,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>> {
        self.conn
            .with_state(|state| state.owner_ids_liked_by(owner_type, user_id, reaction_type))
            .await
    }
}

#[derive(Clone)]
struct MemoryCounterRepository {
    conn: MemoryConn,
}

#[async_trait]
impl CounterRepository for MemoryCounterRepository {
    async fn find(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<ReactionCounter>> {
        self.conn
            .with_state(|state| state.find_counter(owner, reaction_type))
            .await
    }

    async fn increment(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64> {
        owner.validate()?;
        self.conn
            .with_state(|state| state.increment_counter(owner, reaction_type))
            .await
    }

    async fn decrement(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64> {
        self.conn
            .with_state(|state| state.decrement_counter(owner, reaction_type))
            .await
    }

    async fn replace_for_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
        rows: &[OwnerCount],
    ) -> RepoResult<u64> {
        validate_owner_type(owner_type)?;
        self.conn
            .with_state(|state| state.replace_counters(owner_type, reaction_type, rows))
            .await
    }

    async fn delete_for_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<u64> {
        self.conn
            .with_state(|state| state.delete_counter(owner, reaction_type))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64) -> OwnerRef {
        OwnerRef::new("post", id)
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryLikeableStore::new();
        let like = ReactionType::like();

        let tx = store.begin().await.unwrap();
        tx.reactions()
            .create(&post(1), ActorId::new(1), &like)
            .await
            .unwrap();
        tx.counters().increment(&post(1), &like).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store
            .reactions()
            .find(&post(1), ActorId::new(1), &like)
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            store.counters().find(&post(1), &like).await.unwrap().unwrap().count,
            1
        );
    }

    #[tokio::test]
    async fn test_rollback_and_drop_discard_writes() {
        let store = MemoryLikeableStore::new();
        let like = ReactionType::like();

        let tx = store.begin().await.unwrap();
        tx.counters().increment(&post(1), &like).await.unwrap();
        tx.rollback().await.unwrap();

        {
            let tx = store.begin().await.unwrap();
            tx.counters().increment(&post(1), &like).await.unwrap();
        }

        assert!(store.counters().find(&post(1), &like).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_finished_transaction_rejects_use() {
        let store = MemoryLikeableStore::new();
        let tx = store.begin().await.unwrap();
        tx.lock_reactions().await.unwrap();
        tx.commit().await.unwrap();

        assert!(tx.commit().await.is_err());
        assert!(tx.lock_reactions().await.is_err());
        assert!(tx
            .counters()
            .increment(&post(1), &ReactionType::like())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_filter_liked_by_respects_candidates() {
        let store = MemoryLikeableStore::new();
        let like = ReactionType::like();
        for id in [1, 2, 3] {
            store
                .reactions()
                .create(&post(id), ActorId::new(9), &like)
                .await
                .unwrap();
        }

        let liked = store
            .reactions()
            .filter_liked_by("post", &[2, 3, 4], ActorId::new(9), &like)
            .await
            .unwrap();
        assert_eq!(liked, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_rejects_empty_owner_type() {
        let store = MemoryLikeableStore::new();
        let err = store
            .counters()
            .replace_for_owner_type("", &ReactionType::like(), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            likeable_core::DomainError::InvalidOwnerType(_)
        ));
    }
}
