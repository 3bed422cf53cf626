//! Entity identifiers and allocation.
//!
//! An [`EntityId`] is a 64-bit handle that packs a *generation* counter in
//! the high 32 bits and an *index* in the low 32 bits. The generation is
//! bumped every time an index is recycled, so stale handles are detected
//! in O(1) instead of silently aliasing a new entity.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A generational entity identifier. Layout: `[generation: u32 | index: u32]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Allocates and recycles [`EntityId`]s with generational tracking.
///
/// Free indices are kept in a FIFO queue so generations spread out evenly
/// across indices instead of concentrating on one hot slot.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_indices: VecDeque<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop_front() {
            self.alive[index as usize] = true;
            EntityId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            EntityId::new(index, 0)
        }
    }

    /// Despawns `id`, bumping the generation for its index. Returns `false`
    /// if the id was already dead or stale.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        let idx = id.index() as usize;
        if idx >= self.generations.len() {
            return false;
        }
        if self.generations[idx] != id.generation() || !self.alive[idx] {
            return false;
        }
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push_back(id.index());
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == id.generation()
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// All currently alive entity ids. Order is allocation order, not
    /// guaranteed stable across despawns/respawns of other entities.
    pub fn alive_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive.iter().enumerate().filter_map(|(idx, &alive)| {
            alive.then(|| EntityId::new(idx as u32, self.generations[idx]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<EntityId> = (0..100).map(|_| alloc.allocate()).collect();
        let mut indices: Vec<u32> = ids.iter().map(|id| id.index()).collect();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), 100);
    }

    #[test]
    fn generation_increments_on_recycle() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.deallocate(e0));
        let e1 = alloc.allocate();
        assert_eq!(e1.index(), e0.index());
        assert_eq!(e1.generation(), e0.generation() + 1);
    }

    #[test]
    fn stale_id_detection() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.is_alive(e0));
        assert!(alloc.deallocate(e0));
        assert!(!alloc.is_alive(e0));
        let _e1 = alloc.allocate();
        assert!(!alloc.is_alive(e0), "stale id still not alive after recycle");
    }

    #[test]
    fn double_deallocate_returns_false() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.deallocate(e));
        assert!(!alloc.deallocate(e));
    }

    #[test]
    fn alive_count_tracks_correctly() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        let _e1 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);
        alloc.deallocate(e0);
        assert_eq!(alloc.alive_count(), 1);
    }

    #[test]
    fn entity_id_roundtrip() {
        let id = EntityId::new(42, 7);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
        assert_eq!(EntityId::from_raw(id.to_raw()), id);
    }
}
