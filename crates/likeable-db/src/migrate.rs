//! Schema migrations
//!
//! Migrations are plain SQL files read at runtime from a directory
//! (the workspace ships them under `migrations/`).

use std::fmt::Debug;
use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::{info, instrument};

/// Apply every pending migration found in `dir`
#[instrument(skip(pool))]
pub async fn run_migrations<P>(pool: &PgPool, dir: P) -> Result<(), MigrateError>
where
    P: AsRef<Path> + Debug,
{
    let migrator = Migrator::new(dir.as_ref()).await?;
    migrator.run(pool).await?;
    info!(known = migrator.iter().count(), "Schema migrations applied");
    Ok(())
}
