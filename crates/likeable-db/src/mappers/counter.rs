//! Counter entity <-> model mapper

use likeable_core::{DomainError, OwnerCount, OwnerRef, ReactionCounter, ReactionType};

use crate::models::{CounterModel, OwnerCountModel};

/// Convert CounterModel to ReactionCounter entity
impl TryFrom<CounterModel> for ReactionCounter {
    type Error = DomainError;

    fn try_from(model: CounterModel) -> Result<Self, Self::Error> {
        let reaction_type = ReactionType::new(model.reaction_type).map_err(|e| {
            DomainError::DatabaseError(format!("corrupt counter row {}: {e}", model.id))
        })?;

        Ok(ReactionCounter {
            id: model.id,
            owner: OwnerRef::new(model.owner_type, model.owner_id),
            reaction_type,
            count: model.count,
        })
    }
}

impl From<OwnerCountModel> for OwnerCount {
    fn from(model: OwnerCountModel) -> Self {
        OwnerCount::new(model.owner_id, model.count)
    }
}

/// Column-wise arrays for a bulk `UNNEST` insert of counters.
///
/// Rows with a non-positive count are dropped: a zero counter is never stored.
#[derive(Debug, Default)]
pub struct CounterRows {
    pub owner_ids: Vec<i64>,
    pub counts: Vec<i64>,
}

impl CounterRows {
    pub fn new(rows: &[OwnerCount]) -> Self {
        let (owner_ids, counts) = rows
            .iter()
            .filter(|row| row.count > 0)
            .map(|row| (row.owner_id, row.count))
            .unzip();
        Self { owner_ids, counts }
    }

    pub fn len(&self) -> usize {
        self.owner_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner_ids.is_empty()
    }
}
