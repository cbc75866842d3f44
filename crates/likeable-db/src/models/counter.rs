//! Reaction counter database model

use sqlx::FromRow;

/// Database model for reaction_counters table
#[derive(Debug, Clone, FromRow)]
pub struct CounterModel {
    pub id: i64,
    pub owner_type: String,
    pub owner_id: i64,
    /// Selected as `type AS reaction_type`
    pub reaction_type: String,
    pub count: i64,
}

/// Aggregated reaction count per owner (from GROUP BY query)
#[derive(Debug, Clone, FromRow)]
pub struct OwnerCountModel {
    pub owner_id: i64,
    pub count: i64,
}
