//! PostgreSQL implementation of CounterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use likeable_core::traits::{CounterRepository, RepoResult};
use likeable_core::{validate_owner_type, DomainError, OwnerCount, OwnerRef, ReactionCounter, ReactionType};

use crate::mappers::CounterRows;
use crate::models::CounterModel;

use super::connection::{PgConn, SharedTransaction};
use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of CounterRepository
///
/// Increments and decrements are single SQL expressions on the row, never
/// read-modify-write in Rust.
#[derive(Clone)]
pub struct PgCounterRepository {
    conn: PgConn,
}

impl PgCounterRepository {
    /// Create a new PgCounterRepository running on the pool
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
impl CounterRepository for PgCounterRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> RepoResult<Option<ReactionCounter>> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query_as::<_, CounterModel>(
            r#"
            SELECT id, owner_type, owner_id, type AS reaction_type, count
            FROM reaction_counters
            WHERE owner_type = $1 AND owner_id = $2 AND type = $3
            "#,
        )
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(reaction_type.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionCounter::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn increment(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64> {
        let mut conn = self.conn.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reaction_counters (owner_type, owner_id, type, count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (owner_type, owner_id, type)
            DO UPDATE SET count = reaction_counters.count + 1
            RETURNING count
            "#,
        )
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(reaction_type.as_str())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn decrement(&self, owner: &OwnerRef, reaction_type: &ReactionType) -> RepoResult<i64> {
        let mut conn = self.conn.acquire().await?;

        let remaining = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE reaction_counters
            SET count = count - 1
            WHERE owner_type = $1 AND owner_id = $2 AND type = $3 AND count > 0
            RETURNING count
            "#,
        )
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(reaction_type.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        let Some(remaining) = remaining else {
            return Ok(0);
        };

        if remaining <= 0 {
            // Guarded on the stored value so a concurrent increment survives
            sqlx::query(
                r#"
                DELETE FROM reaction_counters
                WHERE owner_type = $1 AND owner_id = $2 AND type = $3 AND count <= 0
                "#,
            )
            .bind(&owner.owner_type)
            .bind(owner.owner_id)
            .bind(reaction_type.as_str())
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;

            return Ok(0);
        }

        Ok(remaining)
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn replace_for_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
        rows: &[OwnerCount],
    ) -> RepoResult<u64> {
        validate_owner_type(owner_type)?;

        let rows = CounterRows::new(rows);
        let mut conn = self.conn.acquire().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM reaction_counters WHERE owner_type = $1 AND type = $2
            "#,
        )
        .bind(owner_type)
        .bind(reaction_type.as_str())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        debug!(deleted, "Cleared counters before rebuild");

        if rows.is_empty() {
            return Ok(0);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO reaction_counters (owner_type, owner_id, type, count)
            SELECT $1, owner_id, $2, count
            FROM UNNEST($3::BIGINT[], $4::BIGINT[]) AS rows(owner_id, count)
            "#,
        )
        .bind(owner_type)
        .bind(reaction_type.as_str())
        .bind(&rows.owner_ids)
        .bind(&rows.counts)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::InternalError("duplicate owner id in counter rows".to_string())
            })
        })?
        .rows_affected();

        Ok(inserted)
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
            DELETE FROM reaction_counters WHERE owner_type = $1 AND owner_id = $2 AND type = $3
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
}
