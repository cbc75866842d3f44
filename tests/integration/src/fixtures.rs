//! Test fixtures and data generators
//!
//! Provides likeable record types and unique ids for integration tests.

use std::sync::atomic::{AtomicI64, Ordering};

use likeable_core::ActorId;
use likeable_service::Likeable;

/// Counter for unique test data
static COUNTER: AtomicI64 = AtomicI64::new(1);

/// Get a unique id for test data.
///
/// Ids are prefixed with the process id so reruns against a shared
/// database never collide with rows left by earlier runs.
pub fn unique_id() -> i64 {
    (i64::from(std::process::id()) << 24) | COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn actor(id: i64) -> Option<ActorId> {
    Some(ActorId::new(id))
}

/// A record type with the default cascade behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
}

impl Post {
    pub fn unique() -> Self {
        Self { id: unique_id() }
    }
}

impl Likeable for Post {
    const OWNER_TYPE: &'static str = "post";

    fn likeable_id(&self) -> i64 {
        self.id
    }
}

/// A record type whose reactions survive deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
}

impl Comment {
    pub fn unique() -> Self {
        Self { id: unique_id() }
    }
}

impl Likeable for Comment {
    const OWNER_TYPE: &'static str = "comment";
    const REMOVE_LIKES_ON_DELETE: bool = false;

    fn likeable_id(&self) -> i64 {
        self.id
    }
}

/// Deterministic xorshift sequence for operation scripts
#[derive(Debug, Clone)]
pub struct Script {
    state: u64,
}

impl Script {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Next value in `0..bound`
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state % bound
    }
}
