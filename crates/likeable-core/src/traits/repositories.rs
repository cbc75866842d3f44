//! Repository traits (ports) - define the interface for data access
//!
//! The reaction and counter repositories are leaf stores. `LikeableStore`
//! hands out both, either bound to autocommit reads or to a transaction
//! that spans a reaction write and its counter write.

use async_trait::async_trait;

use crate::entities::{OwnerCount, Reaction, ReactionCounter};
use crate::error::DomainError;
use crate::value_objects::{ActorId, OwnerRef, ReactionType};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find reaction by owner, user, and type
    async fn find(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>>;

    /// List reactions of a type on an owner, newest first
    async fn find_by_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Reaction>>;

    /// Insert a reaction unless an identical one exists.
    ///
    /// Returns `None` when the (owner, user, type) tuple is already present.
    async fn create(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>>;

    /// Remove a reaction, returning whether a row was deleted
    async fn delete(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<bool>;

    /// Count reactions grouped by owner id for one owner type and reaction type
    async fn count_by_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<OwnerCount>>;

    /// Remove every reaction of a type on an owner
    async fn delete_for_owner(&self, owner: &OwnerRef, reaction_type: &ReactionType)
        -> RepoResult<u64>;

    /// Keep only the candidate owner ids the user reacted to
    async fn filter_liked_by(
        &self,
        owner_type: &str,
        owner_ids: &[i64],
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>>;

    /// All owner ids of a type the user reacted to, ascending
    async fn find_owner_ids_liked_by(
        &self,
        owner_type: &str,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>>;
}

// ============================================================================
// Counter Repository
// ============================================================================

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Find the counter for an owner and type
    async fn find(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<ReactionCounter>>;

    /// Add one to the counter, creating it with count 1 if absent.
    ///
    /// Returns the new count.
    async fn increment(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64>;

    /// Subtract one from the counter, deleting it when it reaches zero.
    ///
    /// No-op when the counter does not exist. Returns the remaining count.
    async fn decrement(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64>;

    /// Delete every counter for an owner type and reaction type, then insert `rows`.
    ///
    /// Returns the number of counters inserted.
    async fn replace_for_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
        rows: &[OwnerCount],
    ) -> RepoResult<u64>;

    /// Remove the counter of a type on an owner
    async fn delete_for_owner(&self, owner: &OwnerRef, reaction_type: &ReactionType)
        -> RepoResult<u64>;
}

// ============================================================================
// Store / Transaction
// ============================================================================

/// A unit of work over both repositories.
///
/// Dropping a transaction without committing rolls it back. Using the
/// repositories after `commit` or `rollback` yields a `DatabaseError`.
#[async_trait]
pub trait LikeableTransaction: Send + Sync {
    fn reactions(&self) -> &dyn ReactionRepository;

    fn counters(&self) -> &dyn CounterRepository;

    /// Block reaction writes from other transactions until this one ends.
    ///
    /// Reads of the reaction log stay allowed.
    async fn lock_reactions(&self) -> RepoResult<()>;

    async fn commit(&self) -> RepoResult<()>;

    async fn rollback(&self) -> RepoResult<()>;
}

/// Entry point to the backing store
#[async_trait]
pub trait LikeableStore: Send + Sync {
    /// Reaction repository outside of any transaction
    fn reactions(&self) -> &dyn ReactionRepository;

    /// Counter repository outside of any transaction
    fn counters(&self) -> &dyn CounterRepository;

    /// Start a transaction spanning reaction and counter writes
    async fn begin(&self) -> RepoResult<Box<dyn LikeableTransaction>>;
}
