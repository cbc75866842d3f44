//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects,
//!   re-validating the stored reaction type
//! - `*Insert` structs: prepare entity data for database operations

mod counter;
mod reaction;

pub use counter::CounterRows;
pub use reaction::ReactionKey;
