//! Despawns entities that have drifted fully off-screen.
//!
//! Grounded on `CleanupSystem.cpp`: every positioned, hitboxed entity is a
//! candidate except the ones in an exclusion list (players stay on-screen
//! by construction via `PlayerInputSystem`'s clamp, and never belong
//! here), checked once per call rather than once per group.

use crate::command::CommandBuffer;
use crate::components::{HitboxComp, PositionComp};
use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::scheduler::System;
use crate::world::World;

const EXCLUDED_GROUPS: &[EntityGroup] = &[EntityGroup::Players, EntityGroup::Bosses];

#[derive(Debug, Default, Clone, Copy)]
pub struct CleanupSystem;

impl CleanupSystem {
    fn is_excluded(world: &World, entity: EntityId) -> bool {
        EXCLUDED_GROUPS.iter().any(|&g| world.in_group(g, entity))
    }
}

impl System for CleanupSystem {
    fn name(&self) -> &'static str {
        "CleanupSystem"
    }

    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, _delta_time: f32) {
        let candidates: Vec<(EntityId, PositionComp, HitboxComp)> = world
            .query::<PositionComp>()
            .filter_map(|(entity, pos)| world.get::<HitboxComp>(entity).map(|hb| (entity, *pos, *hb)))
            .collect();

        for (entity, pos, hb) in candidates {
            if Self::is_excluded(world, entity) {
                continue;
            }
            if rtype_domain::prelude::CollisionRule::is_out_of_bounds(pos.x, pos.y, hb.width, hb.height) {
                commands.despawn(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn despawns_entity_far_off_screen() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, PositionComp { x: -1000.0, y: 0.0 });
        world.insert(e, HitboxComp { width: 10.0, height: 10.0, offset_x: 0.0, offset_y: 0.0 });
        CleanupSystem.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);
        assert!(!world.is_alive(e));
    }

    #[test]
    fn players_are_never_cleaned_up() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let e = world.spawn();
        world.insert(e, PositionComp { x: -5000.0, y: -5000.0 });
        world.insert(e, HitboxComp { width: 10.0, height: 10.0, offset_x: 0.0, offset_y: 0.0 });
        world.join_group(e, EntityGroup::Players);
        CleanupSystem.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);
        assert!(world.is_alive(e));
    }
}
