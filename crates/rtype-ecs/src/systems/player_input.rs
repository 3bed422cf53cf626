//! Translates queued client input into player velocity and position.
//!
//! Grounded on `PlayerInputSystem.{hpp,cpp}`: diagonal movement is
//! normalized by the constant `0.7071` (`1/sqrt(2)`) rather than a runtime
//! `sqrt` call, and the player is clamped back onto the screen the same
//! tick its input is applied.

use std::collections::VecDeque;

use rtype_domain::prelude::CollisionRule;

use crate::bridge::DomainBridge;
use crate::command::CommandBuffer;
use crate::components::{HitboxComp, PlayerTag, PositionComp, SpeedLevelComp, VelocityComp};
use crate::scheduler::System;
use crate::world::World;

const DIAGONAL_NORM: f32 = 0.707_106_77;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerInputRequest {
    pub player_id: u32,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Default)]
pub struct PlayerInputSystem {
    pending: VecDeque<PlayerInputRequest>,
    bridge: DomainBridge,
}

impl PlayerInputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, request: PlayerInputRequest) {
        self.pending.push_back(request);
    }

    fn find_player(world: &World, player_id: u32) -> Option<crate::entity::EntityId> {
        world
            .query::<PlayerTag>()
            .find(|(_, tag)| tag.player_id == player_id)
            .map(|(e, _)| e)
    }
}

impl System for PlayerInputSystem {
    fn name(&self) -> &'static str {
        "PlayerInputSystem"
    }

    fn run(&mut self, world: &mut World, _commands: &mut CommandBuffer, delta_time: f32) {
        while let Some(req) = self.pending.pop_front() {
            let Some(entity) = Self::find_player(world, req.player_id) else {
                continue;
            };
            if !world.get::<PlayerTag>(entity).map(|t| t.is_alive).unwrap_or(false) {
                continue;
            }

            let mut dx = 0.0;
            let mut dy = 0.0;
            if req.left {
                dx -= 1.0;
            }
            if req.right {
                dx += 1.0;
            }
            if req.up {
                dy -= 1.0;
            }
            if req.down {
                dy += 1.0;
            }
            if dx != 0.0 && dy != 0.0 {
                dx *= DIAGONAL_NORM;
                dy *= DIAGONAL_NORM;
            }

            let speed_level = world.get::<SpeedLevelComp>(entity).map(|s| s.level).unwrap_or(0);
            let speed = self.bridge.get_player_speed(speed_level);
            let velocity = VelocityComp {
                x: dx * speed,
                y: dy * speed,
            };
            world.insert(entity, velocity);

            let hitbox = world.get::<HitboxComp>(entity).copied().unwrap_or(HitboxComp {
                width: rtype_domain::constants::player::SHIP_WIDTH,
                height: rtype_domain::constants::player::SHIP_HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            });

            if let Some(pos) = world.get_mut::<PositionComp>(entity) {
                pos.x += velocity.x * delta_time;
                pos.y += velocity.y * delta_time;
                CollisionRule::clamp_to_screen(&mut pos.x, &mut pos.y, hitbox.width, hitbox.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::EntityGroup;

    fn spawn_player(world: &mut World, id: u32, x: f32, y: f32) -> crate::entity::EntityId {
        let e = world.spawn();
        world.insert(
            e,
            PlayerTag {
                player_id: id,
                ship_skin: 0,
                is_alive: true,
            },
        );
        world.insert(e, PositionComp { x, y });
        world.insert(e, VelocityComp { x: 0.0, y: 0.0 });
        world.insert(
            e,
            HitboxComp {
                width: 64.0,
                height: 30.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        world.insert(e, SpeedLevelComp { level: 0 });
        world.join_group(e, EntityGroup::Players);
        e
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = PlayerInputSystem::new();
        let e = spawn_player(&mut world, 1, 500.0, 500.0);
        sys.submit(PlayerInputRequest {
            player_id: 1,
            up: true,
            down: false,
            left: true,
            right: false,
        });
        sys.run(&mut world, &mut commands, 1.0);
        let vel = world.get::<VelocityComp>(e).unwrap();
        assert!((vel.x.hypot(vel.y) - 200.0).abs() < 0.1);
    }

    #[test]
    fn dead_player_ignores_input() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = PlayerInputSystem::new();
        let e = spawn_player(&mut world, 1, 500.0, 500.0);
        world.get_mut::<PlayerTag>(e).unwrap().is_alive = false;
        sys.submit(PlayerInputRequest {
            player_id: 1,
            up: false,
            down: true,
            left: false,
            right: false,
        });
        sys.run(&mut world, &mut commands, 1.0);
        assert_eq!(world.get::<PositionComp>(e).unwrap().y, 500.0);
    }

    #[test]
    fn input_clamps_position_to_screen() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = PlayerInputSystem::new();
        let e = spawn_player(&mut world, 1, 2.0, 500.0);
        sys.submit(PlayerInputRequest {
            player_id: 1,
            up: false,
            down: false,
            left: true,
            right: false,
        });
        sys.run(&mut world, &mut commands, 1.0);
        assert!(world.get::<PositionComp>(e).unwrap().x >= 0.0);
    }
}
