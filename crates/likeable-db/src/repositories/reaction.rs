//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use likeable_core::error::DomainError;
use likeable_core::traits::{ReactionRepository, RepoResult};
use likeable_core::{ActorId, OwnerCount, OwnerRef, Reaction, ReactionType};

use crate::mappers::ReactionKey;
use crate::models::{OwnerCountModel, ReactionModel};

use super::connection::{PgConn, SharedTransaction};
use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    conn: PgConn,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository running on the pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            conn: PgConn::Pool(pool),
        }
    }

    pub(crate) fn with_transaction(tx: SharedTransaction) -> Self {
        Self {
            conn: PgConn::Transaction(tx),
        }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        let key = ReactionKey::new(owner, user_id, reaction_type);
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, owner_type, owner_id, user_id, type AS reaction_type, created_at, updated_at
            FROM reactions
            WHERE owner_type = $1 AND owner_id = $2 AND user_id = $3 AND type = $4
            "#,
        )
        .bind(key.owner_type)
        .bind(key.owner_id)
        .bind(key.user_id)
        .bind(key.reaction_type)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
        limit: i64,
    ) -> RepoResult<Vec<Reaction>> {
        let limit = limit.clamp(1, 100);
        let mut conn = self.conn.acquire().await?;

        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, owner_type, owner_id, user_id, type AS reaction_type, created_at, updated_at
            FROM reactions
            WHERE owner_type = $1 AND owner_id = $2 AND type = $3
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(reaction_type.as_str())
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        let key = ReactionKey::new(owner, user_id, reaction_type);
        let mut conn = self.conn.acquire().await?;

        // The unique key turns a concurrent duplicate into "no row returned"
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            INSERT INTO reactions (owner_type, owner_id, user_id, type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (owner_type, owner_id, user_id, type) DO NOTHING
            RETURNING id, owner_type, owner_id, user_id, type AS reaction_type, created_at, updated_at
            "#,
        )
        .bind(key.owner_type)
        .bind(key.owner_id)
        .bind(key.user_id)
        .bind(key.reaction_type)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateReaction))?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<bool> {
        let key = ReactionKey::new(owner, user_id, reaction_type);
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM reactions
            WHERE owner_type = $1 AND owner_id = $2 AND user_id = $3 AND type = $4
            "#,
        )
        .bind(key.owner_type)
        .bind(key.owner_id)
        .bind(key.user_id)
        .bind(key.reaction_type)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn count_by_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<OwnerCount>> {
        let mut conn = self.conn.acquire().await?;

        let results = sqlx::query_as::<_, OwnerCountModel>(
            r#"
            SELECT owner_id, COUNT(*) AS count
            FROM reactions
            WHERE owner_type = $1 AND type = $2
            GROUP BY owner_id
            ORDER BY owner_id
            "#,
        )
        .bind(owner_type)
        .bind(reaction_type.as_str())
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(OwnerCount::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_for_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<u64> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM reactions WHERE owner_type = $1 AND owner_id = $2 AND type = $3
            "#,
        )
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(reaction_type.as_str())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self, owner_ids), fields(candidates = owner_ids.len()))]
    async fn filter_liked_by(
        &self,
        owner_type: &str,
        owner_ids: &[i64],
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.acquire().await?;

        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT owner_id
            FROM reactions
            WHERE owner_type = $1 AND user_id = $2 AND type = $3 AND owner_id = ANY($4)
            ORDER BY owner_id
            "#,
        )
        .bind(owner_type)
        .bind(user_id.into_inner())
        .bind(reaction_type.as_str())
        .bind(owner_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(results)
    }

    #[instrument(skip(self))]
    async fn find_owner_ids_liked_by(
        &self,
        owner_type: &str,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> RepoResult<Vec<i64>> {
        let mut conn = self.conn.acquire().await?;

        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT owner_id
            FROM reactions
            WHERE owner_type = $1 AND user_id = $2 AND type = $3
            ORDER BY owner_id
            "#,
        )
        .bind(owner_type)
        .bind(user_id.into_inner())
        .bind(reaction_type.as_str())
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(results)
    }
}
