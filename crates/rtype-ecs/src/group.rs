//! Entity group membership.
//!
//! Systems like `CollisionSystem` only ever need a handful of group pairs
//! (missiles vs enemies, players vs power-ups, ...), so group membership
//! is tracked explicitly rather than derived from a component query every
//! tick.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityGroup {
    Players,
    Enemies,
    Missiles,
    EnemyMissiles,
    PowerUps,
    ForcePods,
    BitDevices,
    WaveCannons,
    Bosses,
}

#[derive(Debug, Default)]
pub struct GroupIndex {
    members: HashMap<EntityGroup, HashSet<EntityId>>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, group: EntityGroup, entity: EntityId) {
        self.members.entry(group).or_default().insert(entity);
    }

    pub fn remove(&mut self, group: EntityGroup, entity: EntityId) {
        if let Some(set) = self.members.get_mut(&group) {
            set.remove(&entity);
        }
    }

    /// Removes `entity` from every group. Called on despawn.
    pub fn remove_from_all(&mut self, entity: EntityId) {
        for set in self.members.values_mut() {
            set.remove(&entity);
        }
    }

    pub fn members(&self, group: EntityGroup) -> impl Iterator<Item = EntityId> + '_ {
        self.members.get(&group).into_iter().flatten().copied()
    }

    pub fn contains(&self, group: EntityGroup, entity: EntityId) -> bool {
        self.members.get(&group).map(|s| s.contains(&entity)).unwrap_or(false)
    }

    pub fn count(&self, group: EntityGroup) -> usize {
        self.members.get(&group).map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityAllocator;

    #[test]
    fn add_and_remove() {
        let mut alloc = EntityAllocator::new();
        let mut groups = GroupIndex::new();
        let e = alloc.allocate();
        groups.add(EntityGroup::Enemies, e);
        assert!(groups.contains(EntityGroup::Enemies, e));
        groups.remove(EntityGroup::Enemies, e);
        assert!(!groups.contains(EntityGroup::Enemies, e));
    }

    #[test]
    fn remove_from_all_clears_every_group() {
        let mut alloc = EntityAllocator::new();
        let mut groups = GroupIndex::new();
        let e = alloc.allocate();
        groups.add(EntityGroup::Enemies, e);
        groups.add(EntityGroup::Bosses, e);
        groups.remove_from_all(e);
        assert!(!groups.contains(EntityGroup::Enemies, e));
        assert!(!groups.contains(EntityGroup::Bosses, e));
    }
}
