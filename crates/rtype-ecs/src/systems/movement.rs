//! Integrates position from velocity for every moving entity.
//!
//! Grounded on `MovementSystem.cpp`: plain Euler integration, no clamping
//! (players are clamped in `PlayerInputSystem`; everything else that
//! leaves the screen is handled by `CleanupSystem`).

use crate::command::CommandBuffer;
use crate::components::{PositionComp, VelocityComp};
use crate::scheduler::System;
use crate::world::World;

#[derive(Debug, Default, Clone, Copy)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "MovementSystem"
    }

    fn run(&mut self, world: &mut World, _commands: &mut CommandBuffer, delta_time: f32) {
        let velocities: Vec<_> = world.query::<VelocityComp>().map(|(e, v)| (e, *v)).collect();
        for (entity, vel) in velocities {
            if let Some(pos) = world.get_mut::<PositionComp>(entity) {
                pos.x += vel.x * delta_time;
                pos.y += vel.y * delta_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_position_by_velocity() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, PositionComp { x: 0.0, y: 0.0 });
        world.insert(e, VelocityComp { x: 100.0, y: -50.0 });
        MovementSystem.run(&mut world, &mut commands, 2.0);
        let pos = world.get::<PositionComp>(e).unwrap();
        assert_eq!(pos.x, 200.0);
        assert_eq!(pos.y, -100.0);
    }
}
