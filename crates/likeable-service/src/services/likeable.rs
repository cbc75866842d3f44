//! Likeable service
//!
//! Keeps the reaction log and its denormalized counters in step. Every
//! write opens one store transaction covering the reaction row and the
//! counter row; the store provides all serialization between concurrent
//! callers.

use std::collections::{BTreeMap, HashSet};

use likeable_core::traits::LikeableTransaction;
use likeable_core::{
    validate_owner_type, ActorId, DomainError, OwnerRef, Reaction, ReactionType,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::likeable::{Likeable, LikeableRecord};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What a like/unlike call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOutcome {
    /// The reaction was written and the counter moved
    Applied,
    /// The reaction was already in the requested state
    Unchanged,
    /// No actor could be resolved; nothing was written
    Skipped,
}

impl ReactionOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of a counter rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub owner_type: String,
    pub reaction_type: ReactionType,
    /// Counter rows written
    pub counters: u64,
    /// Live reactions the counters were rebuilt from
    pub reactions: i64,
}

/// Likeable service
pub struct LikeableService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeableService<'a> {
    /// Create a new LikeableService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Operations bound to one likeable record
    pub fn record<T: Likeable>(&self, record: &T) -> LikeableRecord<'a> {
        LikeableRecord::for_record(self.ctx, record)
    }

    /// Operations bound to a raw owner reference
    pub fn owner(&self, owner: OwnerRef) -> LikeableRecord<'a> {
        LikeableRecord::new(self.ctx, owner)
    }

    fn resolve_actor(&self, actor: Option<ActorId>) -> Option<ActorId> {
        actor.or_else(|| self.ctx.actors().current_actor_id())
    }

    /// Resolve the actor or fail with `ActorUnresolved`
    pub fn require_actor(&self, actor: Option<ActorId>) -> ServiceResult<ActorId> {
        self.resolve_actor(actor)
            .ok_or_else(|| DomainError::ActorUnresolved.into())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a reaction of `reaction_type` from the actor.
    ///
    /// Repeating a like is `Unchanged`; an unresolved actor is `Skipped`.
    #[instrument(skip(self))]
    pub async fn like(
        &self,
        owner: &OwnerRef,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<ReactionOutcome> {
        owner.validate()?;

        let Some(user_id) = self.resolve_actor(actor) else {
            debug!(owner = %owner, reaction_type = %reaction_type, "No actor resolved, skipping like");
            return Ok(ReactionOutcome::Skipped);
        };

        let tx = self.ctx.store().begin().await?;

        if tx
            .reactions()
            .create(owner, user_id, reaction_type)
            .await?
            .is_none()
        {
            tx.rollback().await?;
            debug!(owner = %owner, user_id = %user_id, reaction_type = %reaction_type, "Already reacted");
            return Ok(ReactionOutcome::Unchanged);
        }

        let count = tx.counters().increment(owner, reaction_type).await?;
        tx.commit().await?;

        info!(
            owner_type = %owner.owner_type,
            owner_id = owner.owner_id,
            user_id = %user_id,
            reaction_type = %reaction_type,
            count,
            "Reaction added"
        );

        Ok(ReactionOutcome::Applied)
    }

    pub async fn dislike(
        &self,
        owner: &OwnerRef,
        actor: Option<ActorId>,
    ) -> ServiceResult<ReactionOutcome> {
        self.like(owner, actor, &ReactionType::dislike()).await
    }

    /// Remove the actor's reaction of `reaction_type`.
    ///
    /// A missing reaction is `Unchanged` and leaves the counter alone.
    #[instrument(skip(self))]
    pub async fn unlike(
        &self,
        owner: &OwnerRef,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<ReactionOutcome> {
        let Some(user_id) = self.resolve_actor(actor) else {
            debug!(owner = %owner, reaction_type = %reaction_type, "No actor resolved, skipping unlike");
            return Ok(ReactionOutcome::Skipped);
        };

        let tx = self.ctx.store().begin().await?;

        if !tx.reactions().delete(owner, user_id, reaction_type).await? {
            tx.rollback().await?;
            debug!(owner = %owner, user_id = %user_id, reaction_type = %reaction_type, "No reaction to remove");
            return Ok(ReactionOutcome::Unchanged);
        }

        let count = tx.counters().decrement(owner, reaction_type).await?;
        tx.commit().await?;

        info!(
            owner_type = %owner.owner_type,
            owner_id = owner.owner_id,
            user_id = %user_id,
            reaction_type = %reaction_type,
            count,
            "Reaction removed"
        );

        Ok(ReactionOutcome::Applied)
    }

    pub async fn undislike(
        &self,
        owner: &OwnerRef,
        actor: Option<ActorId>,
    ) -> ServiceResult<ReactionOutcome> {
        self.unlike(owner, actor, &ReactionType::dislike()).await
    }

    /// Delete every reaction of `reaction_type` on the owner, and its counter
    #[instrument(skip(self))]
    pub async fn remove_all(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> ServiceResult<u64> {
        owner.validate()?;

        let tx = self.ctx.store().begin().await?;
        let removed = remove_all_in(tx.as_ref(), owner, reaction_type).await?;
        tx.commit().await?;

        info!(
            owner_type = %owner.owner_type,
            owner_id = owner.owner_id,
            reaction_type = %reaction_type,
            removed,
            "Reactions removed"
        );

        Ok(removed)
    }

    /// Owner lifecycle hook, called by the host when an owner is deleted.
    ///
    /// Removes every cascade reaction type in one transaction, unless the
    /// owner type opted out in the registry. Returns the number of
    /// reactions removed.
    pub async fn on_owner_deleted(&self, owner: &OwnerRef) -> ServiceResult<u64> {
        let remove = self.ctx.registry().removes_on_delete(&owner.owner_type);
        self.cascade_delete(owner, remove).await
    }

    /// Owner-deleted hook for a typed record.
    ///
    /// Unregistered record types use their `REMOVE_LIKES_ON_DELETE` flag.
    pub async fn on_record_deleted<T: Likeable>(&self, record: &T) -> ServiceResult<u64> {
        let remove = self.ctx.registry().removes_on_delete_for::<T>();
        self.cascade_delete(&record.owner_ref(), remove).await
    }

    #[instrument(skip(self))]
    pub(crate) async fn cascade_delete(
        &self,
        owner: &OwnerRef,
        remove: bool,
    ) -> ServiceResult<u64> {
        if !remove {
            debug!(owner = %owner, "Owner type keeps reactions on delete");
            return Ok(0);
        }
        owner.validate()?;

        let tx = self.ctx.store().begin().await?;
        let mut removed = 0;
        for reaction_type in self.ctx.registry().cascade_types() {
            removed += remove_all_in(tx.as_ref(), owner, reaction_type).await?;
        }
        tx.commit().await?;

        info!(
            owner_type = %owner.owner_type,
            owner_id = owner.owner_id,
            removed,
            "Owner deleted, reactions removed"
        );

        Ok(removed)
    }

    /// Recompute every counter of `owner_type`/`reaction_type` from the
    /// reaction log.
    ///
    /// Counters for owners without reactions are deleted. Reaction writes
    /// wait until the rebuild commits.
    #[instrument(skip(self))]
    pub async fn rebuild(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
    ) -> ServiceResult<RebuildReport> {
        validate_owner_type(owner_type)?;

        let tx = self.ctx.store().begin().await?;
        tx.lock_reactions().await?;
        let rows = tx
            .reactions()
            .count_by_owner_type(owner_type, reaction_type)
            .await?;
        let counters = tx
            .counters()
            .replace_for_owner_type(owner_type, reaction_type, &rows)
            .await?;
        tx.commit().await?;

        let report = RebuildReport {
            owner_type: owner_type.to_string(),
            reaction_type: reaction_type.clone(),
            counters,
            reactions: rows.iter().map(|row| row.count).sum(),
        };

        info!(
            owner_type = %report.owner_type,
            reaction_type = %report.reaction_type,
            counters = report.counters,
            reactions = report.reactions,
            "Counters rebuilt"
        );

        Ok(report)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether the actor has a reaction of `reaction_type` on the owner
    #[instrument(skip(self))]
    pub async fn liked(
        &self,
        owner: &OwnerRef,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<bool> {
        let Some(user_id) = self.resolve_actor(actor) else {
            return Ok(false);
        };

        Ok(self
            .ctx
            .store()
            .reactions()
            .find(owner, user_id, reaction_type)
            .await?
            .is_some())
    }

    /// Counter value, or 0 when no counter row exists
    #[instrument(skip(self))]
    pub async fn like_count(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> ServiceResult<i64> {
        Ok(self
            .ctx
            .store()
            .counters()
            .find(owner, reaction_type)
            .await?
            .map_or(0, |counter| counter.count))
    }

    pub async fn dislike_count(&self, owner: &OwnerRef) -> ServiceResult<i64> {
        self.like_count(owner, &ReactionType::dislike()).await
    }

    /// Most recent reactions on the owner, newest first
    #[instrument(skip(self))]
    pub async fn reactions(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
        limit: i64,
    ) -> ServiceResult<Vec<Reaction>> {
        Ok(self
            .ctx
            .store()
            .reactions()
            .find_by_owner(owner, reaction_type, limit)
            .await?)
    }

    /// Keep the candidates the actor reacted to, in input order.
    ///
    /// Candidates may mix owner types. An unresolved actor yields nothing.
    #[instrument(skip(self, owners), fields(candidates = owners.len()))]
    pub async fn filter_liked_by(
        &self,
        owners: &[OwnerRef],
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<Vec<OwnerRef>> {
        let Some(user_id) = self.resolve_actor(actor) else {
            return Ok(Vec::new());
        };

        let mut by_type: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        for owner in owners {
            by_type
                .entry(owner.owner_type.as_str())
                .or_default()
                .push(owner.owner_id);
        }

        let mut liked: HashSet<(&str, i64)> = HashSet::new();
        for (owner_type, ids) in by_type {
            let matched = self
                .ctx
                .store()
                .reactions()
                .filter_liked_by(owner_type, &ids, user_id, reaction_type)
                .await?;
            liked.extend(matched.into_iter().map(|id| (owner_type, id)));
        }

        Ok(owners
            .iter()
            .filter(|owner| liked.contains(&(owner.owner_type.as_str(), owner.owner_id)))
            .cloned()
            .collect())
    }

    /// Keep the records the actor reacted to, in input order
    pub async fn filter_records_liked_by<'r, T: Likeable>(
        &self,
        records: &'r [T],
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<Vec<&'r T>> {
        let Some(user_id) = self.resolve_actor(actor) else {
            return Ok(Vec::new());
        };

        let ids: Vec<i64> = records.iter().map(Likeable::likeable_id).collect();
        let liked: HashSet<i64> = self
            .ctx
            .store()
            .reactions()
            .filter_liked_by(T::OWNER_TYPE, &ids, user_id, reaction_type)
            .await?
            .into_iter()
            .collect();

        Ok(records
            .iter()
            .filter(|record| liked.contains(&record.likeable_id()))
            .collect())
    }

    /// Every owner id of `owner_type` the actor reacted to, ascending
    #[instrument(skip(self))]
    pub async fn owner_ids_liked_by(
        &self,
        owner_type: &str,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<Vec<i64>> {
        let Some(user_id) = self.resolve_actor(actor) else {
            return Ok(Vec::new());
        };

        Ok(self
            .ctx
            .store()
            .reactions()
            .find_owner_ids_liked_by(owner_type, user_id, reaction_type)
            .await?)
    }
}

async fn remove_all_in(
    tx: &dyn LikeableTransaction,
    owner: &OwnerRef,
    reaction_type: &ReactionType,
) -> ServiceResult<u64> {
    let removed = tx.reactions().delete_for_owner(owner, reaction_type).await?;
    tx.counters().delete_for_owner(owner, reaction_type).await?;
    Ok(removed)
}
