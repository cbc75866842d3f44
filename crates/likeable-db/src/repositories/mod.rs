//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in likeable-core.
//! Repositories run either on the pool (autocommit) or on a shared
//! transaction handed out by `PgLikeableStore::begin`.

mod connection;
mod counter;
pub(crate) mod error;
mod reaction;
mod store;

pub use counter::PgCounterRepository;
pub use reaction::PgReactionRepository;
pub use store::{PgLikeableStore, PgLikeableTransaction};
