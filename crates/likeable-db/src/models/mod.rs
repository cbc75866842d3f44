//! Database models - SQLx-compatible structs for PostgreSQL tables

mod counter;
mod reaction;

pub use counter::{CounterModel, OwnerCountModel};
pub use reaction::ReactionModel;
