//! The entity-component world: allocator, component pools, and group
//! membership bound together behind one API.

use crate::command::{Command, CommandBuffer};
use crate::component::ComponentStore;
use crate::entity::{EntityAllocator, EntityId};
use crate::error::EcsError;
use crate::group::{EntityGroup, GroupIndex};

#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    components: ComponentStore,
    groups: GroupIndex,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        self.allocator.allocate()
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Immediately removes an entity and every component/group membership
    /// it held. Prefer queuing [`CommandBuffer::despawn`] from inside a
    /// system; this is for world setup and the scheduler's flush step.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.allocator.deallocate(entity) {
            return false;
        }
        self.components.remove_all(entity);
        self.groups.remove_from_all(entity);
        true
    }

    pub fn alive_count(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn alive_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.allocator.alive_ids()
    }

    pub fn insert<T: 'static + Send>(&mut self, entity: EntityId, value: T) {
        self.components.insert(entity, value);
    }

    pub fn get<T: 'static + Send>(&self, entity: EntityId) -> Option<&T> {
        self.components.get(entity)
    }

    pub fn get_mut<T: 'static + Send>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.components.get_mut(entity)
    }

    pub fn try_get<T: 'static + Send>(&self, entity: EntityId) -> Result<&T, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::StaleEntity(entity));
        }
        self.get(entity).ok_or(EcsError::ComponentNotFound(entity))
    }

    pub fn has<T: 'static + Send>(&self, entity: EntityId) -> bool {
        self.components.has::<T>(entity)
    }

    pub fn remove<T: 'static + Send>(&mut self, entity: EntityId) -> Option<T> {
        self.components.remove(entity)
    }

    pub fn query<T: 'static + Send>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.components.iter::<T>()
    }

    pub fn query_mut<T: 'static + Send>(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.components.iter_mut::<T>()
    }

    pub fn count<T: 'static + Send>(&self) -> usize {
        self.components.count::<T>()
    }

    pub fn join_group(&mut self, entity: EntityId, group: EntityGroup) {
        self.groups.add(group, entity);
    }

    pub fn leave_group(&mut self, entity: EntityId, group: EntityGroup) {
        self.groups.remove(group, entity);
    }

    pub fn group_members(&self, group: EntityGroup) -> impl Iterator<Item = EntityId> + '_ {
        self.groups.members(group)
    }

    pub fn in_group(&self, group: EntityGroup, entity: EntityId) -> bool {
        self.groups.contains(group, entity)
    }

    pub fn group_count(&self, group: EntityGroup) -> usize {
        self.groups.count(group)
    }

    /// Applies every queued command in FIFO order, then clears the buffer.
    /// Called by the scheduler after every system invocation.
    pub fn flush(&mut self, buffer: &mut CommandBuffer) {
        for command in buffer.drain() {
            match command {
                Command::Spawn(build) => build(self),
                Command::Despawn(entity) => {
                    self.despawn(entity);
                }
                Command::JoinGroup(entity, group) => self.groups.add(group, entity),
                Command::LeaveGroup(entity, group) => self.groups.remove(group, entity),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn spawn_insert_query() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Marker(7));
        assert_eq!(world.get::<Marker>(e), Some(&Marker(7)));
    }

    #[test]
    fn despawn_clears_components_and_groups() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Marker(1));
        world.join_group(e, EntityGroup::Enemies);
        assert!(world.despawn(e));
        assert!(!world.has::<Marker>(e));
        assert!(!world.in_group(EntityGroup::Enemies, e));
        assert!(!world.is_alive(e));
    }

    #[test]
    fn flush_applies_commands_in_order() {
        let mut world = World::new();
        let mut buf = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, Marker(1));
        buf.despawn(e);
        buf.spawn(|w| {
            let e2 = w.spawn();
            w.insert(e2, Marker(2));
        });
        world.flush(&mut buf);
        assert!(!world.is_alive(e));
        assert_eq!(world.count::<Marker>(), 1);
    }

    #[test]
    fn try_get_reports_stale_entity() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);
        assert_eq!(world.try_get::<Marker>(e), Err(EcsError::StaleEntity(e)));
    }

    #[test]
    fn try_get_reports_missing_component() {
        let mut world = World::new();
        let e = world.spawn();
        assert_eq!(world.try_get::<Marker>(e), Err(EcsError::ComponentNotFound(e)));
    }
}
