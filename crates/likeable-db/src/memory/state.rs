//! Table state and the row-level operations on it

use std::collections::BTreeMap;

use likeable_core::{ActorId, OwnerCount, OwnerRef, Reaction, ReactionCounter, ReactionType};

/// (owner_type, owner_id, user_id, type) - the reactions unique key
type ReactionKey = (String, i64, i64, String);

/// (owner_type, owner_id, type) - the reaction_counters unique key
type CounterKey = (String, i64, String);

fn reaction_key(owner: &OwnerRef, user_id: ActorId, reaction_type: &ReactionType) -> ReactionKey {
    (
        owner.owner_type.clone(),
        owner.owner_id,
        user_id.into_inner(),
        reaction_type.as_str().to_string(),
    )
}

fn counter_key(owner: &OwnerRef, reaction_type: &ReactionType) -> CounterKey {
    (
        owner.owner_type.clone(),
        owner.owner_id,
        reaction_type.as_str().to_string(),
    )
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryState {
    next_reaction_id: i64,
    next_counter_id: i64,
    reactions: BTreeMap<ReactionKey, Reaction>,
    counters: BTreeMap<CounterKey, ReactionCounter>,
}

impl MemoryState {
    // ---------------------------------------------------------------------
    // reactions
    // ---------------------------------------------------------------------

    pub(crate) fn find_reaction(
        &self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> Option<Reaction> {
        self.reactions
            .get(&reaction_key(owner, user_id, reaction_type))
            .cloned()
    }

    pub(crate) fn reactions_for_owner(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
        limit: usize,
    ) -> Vec<Reaction> {
        let mut found: Vec<Reaction> = self
            .reactions
            .values()
            .filter(|r| r.owner == *owner && r.reaction_type == *reaction_type)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        found.truncate(limit);
        found
    }

    pub(crate) fn insert_reaction(
        &mut self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> Option<Reaction> {
        let key = reaction_key(owner, user_id, reaction_type);
        if self.reactions.contains_key(&key) {
            return None;
        }

        self.next_reaction_id += 1;
        let reaction = Reaction::new(
            self.next_reaction_id,
            owner.clone(),
            user_id,
            reaction_type.clone(),
        );
        self.reactions.insert(key, reaction.clone());
        Some(reaction)
    }

    pub(crate) fn delete_reaction(
        &mut self,
        owner: &OwnerRef,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> bool {
        self.reactions
            .remove(&reaction_key(owner, user_id, reaction_type))
            .is_some()
    }

    pub(crate) fn count_by_owner_type(
        &self,
        owner_type: &str,
        reaction_type: &ReactionType,
    ) -> Vec<OwnerCount> {
        let mut grouped: BTreeMap<i64, i64> = BTreeMap::new();
        for reaction in self.reactions.values().filter(|r| {
            r.owner.owner_type == owner_type && r.reaction_type == *reaction_type
        }) {
            *grouped.entry(reaction.owner.owner_id).or_default() += 1;
        }
        grouped
            .into_iter()
            .map(|(owner_id, count)| OwnerCount::new(owner_id, count))
            .collect()
    }

    pub(crate) fn delete_reactions_for_owner(
        &mut self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> u64 {
        let before = self.reactions.len();
        self.reactions
            .retain(|_, r| !(r.owner == *owner && r.reaction_type == *reaction_type));
        (before - self.reactions.len()) as u64
    }

    pub(crate) fn owner_ids_liked_by(
        &self,
        owner_type: &str,
        user_id: ActorId,
        reaction_type: &ReactionType,
    ) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .reactions
            .values()
            .filter(|r| {
                r.owner.owner_type == owner_type
                    && r.user_id == user_id
                    && r.reaction_type == *reaction_type
            })
            .map(|r| r.owner.owner_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // ---------------------------------------------------------------------
    // counters
    // ---------------------------------------------------------------------

    pub(crate) fn find_counter(
        &self,
        owner: &OwnerRef,
        reaction_type: &ReactionType,
    ) -> Option<ReactionCounter> {
        self.counters.get(&counter_key(owner, reaction_type)).cloned()
    }

    pub(crate) fn increment_counter(&mut self, owner: &OwnerRef, reaction_type: &ReactionType) -> i64 {
        let key = counter_key(owner, reaction_type);
        if let Some(counter) = self.counters.get_mut(&key) {
            counter.count += 1;
            return counter.count;
        }

        self.next_counter_id += 1;
        self.counters.insert(
            key,
            ReactionCounter::new(self.next_counter_id, owner.clone(), reaction_type.clone(), 1),
        );
        1
    }

    pub(crate) fn decrement_counter(&mut self, owner: &OwnerRef, reaction_type: &ReactionType) -> i64 {
        let key = counter_key(owner, reaction_type);
        let Some(counter) = self.counters.get_mut(&key) else {
            return 0;
        };

        counter.count -= 1;
        if counter.count > 0 {
            return counter.count;
        }

        self.counters.remove(&key);
        0
    }

    pub(crate) fn replace_counters(
        &mut self,
        owner_type: &str,
        reaction_type: &ReactionType,
        rows: &[OwnerCount],
    ) -> u64 {
        self.counters.retain(|(t, _, kind), _| {
            !(t == owner_type && kind == reaction_type.as_str())
        });

        let mut inserted = 0;
        for row in rows.iter().filter(|row| row.count > 0) {
            let owner = OwnerRef::new(owner_type, row.owner_id);
            self.next_counter_id += 1;
            self.counters.insert(
                counter_key(&owner, reaction_type),
                ReactionCounter::new(
                    self.next_counter_id,
                    owner,
                    reaction_type.clone(),
                    row.count,
                ),
            );
            inserted += 1;
        }
        inserted
    }

    pub(crate) fn delete_counter(&mut self, owner: &OwnerRef, reaction_type: &ReactionType) -> u64 {
        u64::from(self.counters.remove(&counter_key(owner, reaction_type)).is_some())
    }

    #[cfg(test)]
    pub(crate) fn reaction_count(&self) -> usize {
        self.reactions.len()
    }
}
