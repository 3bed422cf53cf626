//! Deferred entity-set mutations.
//!
//! Systems never spawn or despawn entities directly: doing so mid-iteration
//! would invalidate whatever query produced the entity list they are
//! walking. Instead they push a [`Command`] onto the buffer, and the
//! scheduler flushes it against the world immediately after that system
//! returns — between every system call, not once per tick.

use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::world::World;

/// A deferred mutation. Component-value changes happen directly through
/// mutable queries since those don't invalidate entity lists; only the
/// entity set itself (spawn/despawn, group membership) needs deferral.
pub enum Command {
    /// Spawns a new entity and lets the closure attach its components and
    /// group memberships once the world is free to borrow mutably again.
    Spawn(Box<dyn FnOnce(&mut World)>),
    Despawn(EntityId),
    JoinGroup(EntityId, EntityGroup),
    LeaveGroup(EntityId, EntityGroup),
}

#[derive(Default)]
pub struct CommandBuffer {
    queue: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, build: impl FnOnce(&mut World) + 'static) {
        self.queue.push(Command::Spawn(Box::new(build)));
    }

    pub fn despawn(&mut self, entity: EntityId) {
        self.queue.push(Command::Despawn(entity));
    }

    pub fn join_group(&mut self, entity: EntityId, group: EntityGroup) {
        self.queue.push(Command::JoinGroup(entity, group));
    }

    pub fn leave_group(&mut self, entity: EntityId, group: EntityGroup) {
        self.queue.push(Command::LeaveGroup(entity, group));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drains every queued command in FIFO order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.queue.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mut buf = CommandBuffer::new();
        let e0 = EntityId::from_raw(0);
        let e1 = EntityId::from_raw(1);
        buf.despawn(e0);
        buf.despawn(e1);
        let drained: Vec<EntityId> = buf
            .drain()
            .filter_map(|c| match c {
                Command::Despawn(e) => Some(e),
                _ => None,
            })
            .collect();
        assert_eq!(drained, vec![e0, e1]);
    }
}
