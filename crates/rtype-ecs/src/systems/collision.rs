//! Broad + narrow phase collision detection.
//!
//! Grounded on `CollisionSystem.cpp`: only a handful of group pairs are ever
//! checked (every other pair is gameplay-irrelevant), and overlap itself
//! is reported — not resolved. Resolution (damage, despawn) is
//! `DamageSystem`'s job; the two communicate through a shared queue the
//! same way the original system passes collision pairs downstream.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rtype_domain::prelude::CollisionRule;

use crate::command::CommandBuffer;
use crate::components::{HitboxComp, PositionComp};
use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::scheduler::System;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPairKind {
    MissileVsEnemy,
    WaveCannonVsEnemy,
    PlayerVsEnemyMissile,
    ForcePodVsEnemy,
    BitDeviceVsEnemy,
    PlayerVsPowerUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionPairKind,
    pub a: EntityId,
    pub b: EntityId,
}

/// `Arc<Mutex<_>>` rather than `Rc<RefCell<_>>` since a room's whole
/// `GameWorld` moves across tokio worker threads inside `Arc<Mutex<_>>`.
pub type CollisionEventQueue = Arc<Mutex<VecDeque<CollisionEvent>>>;

const PAIRS: &[(CollisionPairKind, EntityGroup, EntityGroup)] = &[
    (CollisionPairKind::MissileVsEnemy, EntityGroup::Missiles, EntityGroup::Enemies),
    (CollisionPairKind::WaveCannonVsEnemy, EntityGroup::WaveCannons, EntityGroup::Enemies),
    (CollisionPairKind::PlayerVsEnemyMissile, EntityGroup::Players, EntityGroup::EnemyMissiles),
    (CollisionPairKind::ForcePodVsEnemy, EntityGroup::ForcePods, EntityGroup::Enemies),
    (CollisionPairKind::BitDeviceVsEnemy, EntityGroup::BitDevices, EntityGroup::Enemies),
    (CollisionPairKind::PlayerVsPowerUp, EntityGroup::Players, EntityGroup::PowerUps),
];

pub struct CollisionSystem {
    events: CollisionEventQueue,
}

impl CollisionSystem {
    pub fn new(events: CollisionEventQueue) -> Self {
        Self { events }
    }

    fn bounds(world: &World, entity: EntityId) -> Option<(f32, f32, f32, f32)> {
        let pos = world.get::<PositionComp>(entity)?;
        let hb = world.get::<HitboxComp>(entity)?;
        Some((pos.x + hb.offset_x, pos.y + hb.offset_y, hb.width, hb.height))
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "CollisionSystem"
    }

    fn run(&mut self, world: &mut World, _commands: &mut CommandBuffer, _delta_time: f32) {
        let mut events = self.events.lock().expect("collision queue mutex poisoned");
        for &(kind, group_a, group_b) in PAIRS {
            let a_members: Vec<EntityId> = world.group_members(group_a).collect();
            let b_members: Vec<EntityId> = world.group_members(group_b).collect();
            for &a in &a_members {
                let Some((ax, ay, aw, ah)) = Self::bounds(world, a) else { continue };
                for &b in &b_members {
                    let Some((bx, by, bw, bh)) = Self::bounds(world, b) else { continue };
                    if CollisionRule::aabb(ax, ay, aw, ah, bx, by, bw, bh) {
                        events.push_back(CollisionEvent { kind, a, b });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(world: &mut World, group: EntityGroup, x: f32, y: f32) -> EntityId {
        let e = world.spawn();
        world.insert(e, PositionComp { x, y });
        world.insert(
            e,
            HitboxComp {
                width: 20.0,
                height: 20.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        world.join_group(e, group);
        e
    }

    #[test]
    fn detects_overlap_only_for_registered_pairs() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let queue: CollisionEventQueue = Arc::new(Mutex::new(VecDeque::new()));
        let mut sys = CollisionSystem::new(queue.clone());

        let missile = spawn_at(&mut world, EntityGroup::Missiles, 10.0, 10.0);
        let enemy = spawn_at(&mut world, EntityGroup::Enemies, 15.0, 15.0);
        spawn_at(&mut world, EntityGroup::ForcePods, 500.0, 500.0);

        sys.run(&mut world, &mut commands, 1.0 / 60.0);

        let events = queue.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionPairKind::MissileVsEnemy);
        assert_eq!(events[0].a, missile);
        assert_eq!(events[0].b, enemy);
    }
}
