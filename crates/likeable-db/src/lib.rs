//! # likeable-db
//!
//! Storage layer implementing the likeable store traits.
//!
//! ## Overview
//!
//! - PostgreSQL connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - `PgReactionRepository` / `PgCounterRepository`, usable on the pool or
//!   inside a transaction opened by `PgLikeableStore::begin`
//! - `MemoryLikeableStore`, an in-process store with the same transactional
//!   contract, for tests and embedding
//!
//! ## Usage
//!
//! ```rust,ignore
//! use likeable_db::{create_pool_from_env, PgLikeableStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool_from_env().await?;
//!     likeable_db::run_migrations(&pool, "migrations").await?;
//!     let store = PgLikeableStore::new(pool);
//!     // Hand the store to the service layer...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryLikeableStore;
pub use migrate::run_migrations;
pub use pool::{create_pool, create_pool_from_env, PgPool, PoolConfig, PoolError};
pub use repositories::{
    PgCounterRepository, PgLikeableStore, PgLikeableTransaction, PgReactionRepository,
};
