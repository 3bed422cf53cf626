//! Expires timed entities (missiles, wave cannons, power-ups, ...).
//!
//! Grounded on `LifetimeSystem.cpp`: a flat per-tick decrement of
//! `LifetimeComp::remaining`, despawning once it reaches zero.

use crate::command::CommandBuffer;
use crate::components::LifetimeComp;
use crate::scheduler::System;
use crate::world::World;

#[derive(Debug, Default, Clone, Copy)]
pub struct LifetimeSystem;

impl System for LifetimeSystem {
    fn name(&self) -> &'static str {
        "LifetimeSystem"
    }

    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, delta_time: f32) {
        let expired: Vec<_> = world
            .query_mut::<LifetimeComp>()
            .filter_map(|(entity, lifetime)| {
                lifetime.remaining = (lifetime.remaining - delta_time).max(0.0);
                (lifetime.remaining <= 0.0).then_some(entity)
            })
            .collect();
        for entity in expired {
            commands.despawn(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn despawns_when_lifetime_runs_out() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, LifetimeComp { remaining: 0.05, total: 1.0 });
        LifetimeSystem.run(&mut world, &mut commands, 0.1);
        world.flush(&mut commands);
        assert!(!world.is_alive(e));
    }

    #[test]
    fn survives_while_time_remains() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, LifetimeComp { remaining: 1.0, total: 1.0 });
        LifetimeSystem.run(&mut world, &mut commands, 0.1);
        world.flush(&mut commands);
        assert!(world.is_alive(e));
    }
}
