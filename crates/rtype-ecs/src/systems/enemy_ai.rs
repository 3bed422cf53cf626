//! Enemy movement integration and enemy-fired missiles.
//!
//! Grounded on `EnemyAISystem.cpp`: targets the nearest player's Y
//! coordinate, falling back to `DEFAULT_TARGET_Y` when no player is
//! alive, and spawns enemy missiles offset by `MISSILE_SPAWN_OFFSET_X`
//! from the shooter.

use rtype_domain::prelude::{EnemyBehavior, ZigzagState};

use crate::bridge::DomainBridge;
use crate::command::CommandBuffer;
use crate::components::{
    EnemyAIComp, EnemyTag, HitboxComp, LifetimeComp, MissileTag, OwnerComp, PlayerTag,
    PositionComp, VelocityComp,
};
use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::scheduler::System;
use crate::world::World;

const DEFAULT_TARGET_Y: f32 = 300.0;
const MISSILE_SPAWN_OFFSET_X: f32 = -30.0;

#[derive(Default)]
pub struct EnemyAISystem {
    bridge: DomainBridge,
}

impl EnemyAISystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn nearest_player_y(world: &World) -> f32 {
        world
            .query::<PlayerTag>()
            .filter(|(_, tag)| tag.is_alive)
            .filter_map(|(e, _)| world.get::<PositionComp>(e).map(|p| p.y))
            .next()
            .unwrap_or(DEFAULT_TARGET_Y)
    }
}

impl System for EnemyAISystem {
    fn name(&self) -> &'static str {
        "EnemyAISystem"
    }

    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, delta_time: f32) {
        let target_y = Self::nearest_player_y(world);

        let enemies: Vec<EntityId> = world.group_members(EntityGroup::Enemies).collect();
        for entity in enemies {
            let Some(tag) = world.get::<EnemyTag>(entity).copied() else {
                continue;
            };
            let Some(pos) = world.get::<PositionComp>(entity).copied() else {
                continue;
            };
            let Some(ai) = world.get::<EnemyAIComp>(entity).copied() else {
                continue;
            };

            let mut zigzag = ZigzagState {
                timer: ai.zigzag_timer,
                going_up: ai.zigzag_going_up,
            };
            let movement = self.bridge.get_enemy_movement(
                tag.enemy_type,
                pos.y,
                ai.base_y,
                ai.alive_time,
                ai.phase_offset,
                delta_time,
                target_y,
                &mut zigzag,
            );

            if let Some(pos) = world.get_mut::<PositionComp>(entity) {
                pos.x += movement.dx;
                pos.y = movement.new_y;
            }

            let shoot_interval = self.bridge.get_enemy_shoot_interval(tag.enemy_type);
            if let Some(ai) = world.get_mut::<EnemyAIComp>(entity) {
                ai.base_y = movement.new_base_y;
                ai.alive_time += delta_time;
                ai.zigzag_timer = zigzag.timer;
                ai.zigzag_going_up = zigzag.going_up;
                ai.shoot_cooldown = (ai.shoot_cooldown - delta_time).max(0.0);
                if ai.shoot_interval <= 0.0 {
                    ai.shoot_interval = shoot_interval;
                }
            }

            let can_shoot = world
                .get::<EnemyAIComp>(entity)
                .map(|ai| self.bridge.can_enemy_shoot(ai.shoot_cooldown))
                .unwrap_or(false);
            if can_shoot {
                let shooter_pos = world.get::<PositionComp>(entity).copied().unwrap();
                if let Some(ai) = world.get_mut::<EnemyAIComp>(entity) {
                    ai.shoot_cooldown = ai.shoot_interval;
                }
                commands.spawn(move |world| {
                    let missile = world.spawn();
                    world.insert(
                        missile,
                        PositionComp {
                            x: shooter_pos.x + MISSILE_SPAWN_OFFSET_X,
                            y: shooter_pos.y,
                        },
                    );
                    world.insert(
                        missile,
                        VelocityComp {
                            x: -300.0,
                            y: 0.0,
                        },
                    );
                    world.insert(
                        missile,
                        HitboxComp {
                            width: rtype_domain::constants::weapon::MISSILE_WIDTH,
                            height: rtype_domain::constants::weapon::MISSILE_HEIGHT,
                            offset_x: 0.0,
                            offset_y: 0.0,
                        },
                    );
                    world.insert(
                        missile,
                        MissileTag {
                            weapon_type: rtype_domain::types::WeaponType::Standard,
                            base_damage: rtype_domain::constants::enemy::ENEMY_MISSILE_DAMAGE,
                            is_homing: false,
                            target_id: None,
                        },
                    );
                    world.insert(
                        missile,
                        OwnerComp {
                            owner_id: entity,
                            is_player_owned: false,
                        },
                    );
                    world.insert(
                        missile,
                        LifetimeComp {
                            remaining: rtype_domain::constants::weapon::MISSILE_LIFETIME,
                            total: rtype_domain::constants::weapon::MISSILE_LIFETIME,
                        },
                    );
                    world.join_group(missile, EntityGroup::EnemyMissiles);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtype_domain::types::EnemyType;

    fn spawn_enemy(world: &mut World) -> EntityId {
        let e = world.spawn();
        world.insert(e, PositionComp { x: 1000.0, y: 300.0 });
        world.insert(
            e,
            EnemyTag {
                enemy_type: EnemyType::Basic,
                points: 100,
            },
        );
        world.insert(
            e,
            EnemyAIComp {
                shoot_cooldown: 0.0,
                shoot_interval: 2.5,
                base_y: 300.0,
                alive_time: 0.0,
                phase_offset: 0.0,
                target_y: 300.0,
                zigzag_timer: 0.0,
                zigzag_going_up: true,
            },
        );
        world.join_group(e, EntityGroup::Enemies);
        e
    }

    #[test]
    fn enemy_moves_left_and_shoots_when_ready() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = EnemyAISystem::new();
        let e = spawn_enemy(&mut world);
        let start_x = world.get::<PositionComp>(e).unwrap().x;
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);
        assert!(world.get::<PositionComp>(e).unwrap().x < start_x);
        assert_eq!(world.count::<MissileTag>(), 1);
    }

    #[test]
    fn falls_back_to_default_target_y_with_no_players() {
        let mut world = World::new();
        assert_eq!(EnemyAISystem::nearest_player_y(&world), DEFAULT_TARGET_Y);
    }
}
