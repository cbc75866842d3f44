//! In-process store with the same transactional contract as PostgreSQL
//!
//! A transaction holds the store lock for its whole lifetime and works on a
//! copy of the state; commit swaps the copy in, rollback (or drop) discards it.

mod state;
mod store;

pub use store::{MemoryLikeableStore, MemoryTransaction};
