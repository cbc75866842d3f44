//! Likeable capability
//!
//! Domain records opt in by implementing [`Likeable`]; the service then
//! hands out a [`LikeableRecord`] bound to one record.

use likeable_core::{ActorId, OwnerRef, Reaction, ReactionType};

use crate::services::{LikeableService, ReactionOutcome, ServiceContext, ServiceResult};

/// A record that can be liked.
///
/// ```rust,ignore
/// struct Post { id: i64 }
///
/// impl Likeable for Post {
///     const OWNER_TYPE: &'static str = "post";
///
///     fn likeable_id(&self) -> i64 {
///         self.id
///     }
/// }
/// ```
pub trait Likeable {
    /// Owner type tag stored with every reaction on this record type
    const OWNER_TYPE: &'static str;

    /// Whether deleting a record removes its reactions and counters
    const REMOVE_LIKES_ON_DELETE: bool = true;

    fn likeable_id(&self) -> i64;

    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::new(Self::OWNER_TYPE, self.likeable_id())
    }
}

/// Likeable operations bound to one owner
#[derive(Debug, Clone)]
pub struct LikeableRecord<'a> {
    ctx: &'a ServiceContext,
    owner: OwnerRef,
    /// Cascade decision of the record type; `None` for raw owner refs
    remove_on_delete: Option<bool>,
}

impl<'a> LikeableRecord<'a> {
    pub(crate) fn new(ctx: &'a ServiceContext, owner: OwnerRef) -> Self {
        Self {
            ctx,
            owner,
            remove_on_delete: None,
        }
    }

    pub(crate) fn for_record<T: Likeable>(ctx: &'a ServiceContext, record: &T) -> Self {
        Self {
            ctx,
            owner: record.owner_ref(),
            remove_on_delete: Some(ctx.registry().removes_on_delete_for::<T>()),
        }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    fn service(&self) -> LikeableService<'a> {
        LikeableService::new(self.ctx)
    }

    pub async fn like(&self, actor: Option<ActorId>) -> ServiceResult<ReactionOutcome> {
        self.service()
            .like(&self.owner, actor, &ReactionType::like())
            .await
    }

    pub async fn unlike(&self, actor: Option<ActorId>) -> ServiceResult<ReactionOutcome> {
        self.service()
            .unlike(&self.owner, actor, &ReactionType::like())
            .await
    }

    pub async fn dislike(&self, actor: Option<ActorId>) -> ServiceResult<ReactionOutcome> {
        self.service().dislike(&self.owner, actor).await
    }

    pub async fn undislike(&self, actor: Option<ActorId>) -> ServiceResult<ReactionOutcome> {
        self.service().undislike(&self.owner, actor).await
    }

    /// React with a custom reaction type
    pub async fn react(
        &self,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<ReactionOutcome> {
        self.service().like(&self.owner, actor, reaction_type).await
    }

    pub async fn unreact(
        &self,
        actor: Option<ActorId>,
        reaction_type: &ReactionType,
    ) -> ServiceResult<ReactionOutcome> {
        self.service().unlike(&self.owner, actor, reaction_type).await
    }

    pub async fn liked(&self, actor: Option<ActorId>) -> ServiceResult<bool> {
        self.service()
            .liked(&self.owner, actor, &ReactionType::like())
            .await
    }

    pub async fn like_count(&self) -> ServiceResult<i64> {
        self.service()
            .like_count(&self.owner, &ReactionType::like())
            .await
    }

    pub async fn dislike_count(&self) -> ServiceResult<i64> {
        self.service().dislike_count(&self.owner).await
    }

    /// Most recent likes on this record
    pub async fn likes(&self, limit: i64) -> ServiceResult<Vec<Reaction>> {
        self.service()
            .reactions(&self.owner, &ReactionType::like(), limit)
            .await
    }

    pub async fn dislikes(&self, limit: i64) -> ServiceResult<Vec<Reaction>> {
        self.service()
            .reactions(&self.owner, &ReactionType::dislike(), limit)
            .await
    }

    /// Run the owner-deleted hook for this record
    pub async fn deleted(&self) -> ServiceResult<u64> {
        match self.remove_on_delete {
            Some(remove) => self.service().cascade_delete(&self.owner, remove).await,
            None => self.service().on_owner_deleted(&self.owner).await,
        }
    }
}
