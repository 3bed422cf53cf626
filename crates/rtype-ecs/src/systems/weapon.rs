//! Weapon firing, charging, and weapon-switching.
//!
//! Grounded on `WeaponSystem.hpp`'s four request queues and its
//! `MissileSpawnedEvent` output. The spawn offset used here is
//! `(+50, +0)` relative to the firing entity's position, matching the
//! specification's worked scenarios rather than the reference
//! implementation's `Constants.hpp` offset (see
//! `constants::weapon::LEGACY_SPAWN_OFFSET`).

use std::collections::VecDeque;

use rtype_domain::prelude::GameRule;
use rtype_domain::types::WeaponType;

use crate::bridge::DomainBridge;
use crate::command::CommandBuffer;
use crate::components::{
    HitboxComp, LifetimeComp, MissileTag, OwnerComp, PlayerTag, PositionComp, VelocityComp,
    WaveCannonTag, WeaponComp,
};
use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::scheduler::System;
use crate::world::World;

pub const SPAWN_OFFSET_X: f32 = 50.0;
pub const SPAWN_OFFSET_Y: f32 = 0.0;

pub struct ShootRequest {
    pub shooter: EntityId,
}

pub struct ChargeStartRequest {
    pub shooter: EntityId,
}

pub struct ChargeReleaseRequest {
    pub shooter: EntityId,
}

pub struct SwitchWeaponRequest {
    pub shooter: EntityId,
    pub delta: i8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileSpawnedEvent {
    pub missile_id: EntityId,
    pub owner: EntityId,
    pub weapon_type: WeaponType,
}

pub struct WeaponSystem {
    shoot_queue: VecDeque<ShootRequest>,
    charge_start_queue: VecDeque<ChargeStartRequest>,
    charge_release_queue: VecDeque<ChargeReleaseRequest>,
    switch_queue: VecDeque<SwitchWeaponRequest>,
    spawned: Vec<MissileSpawnedEvent>,
    bridge: DomainBridge,
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self {
            shoot_queue: VecDeque::new(),
            charge_start_queue: VecDeque::new(),
            charge_release_queue: VecDeque::new(),
            switch_queue: VecDeque::new(),
            spawned: Vec::new(),
            bridge: DomainBridge,
        }
    }
}

impl WeaponSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_shoot(&mut self, req: ShootRequest) {
        self.shoot_queue.push_back(req);
    }

    pub fn request_charge_start(&mut self, req: ChargeStartRequest) {
        self.charge_start_queue.push_back(req);
    }

    pub fn request_charge_release(&mut self, req: ChargeReleaseRequest) {
        self.charge_release_queue.push_back(req);
    }

    pub fn request_switch(&mut self, req: SwitchWeaponRequest) {
        self.switch_queue.push_back(req);
    }

    /// Drains this tick's spawned-missile events, for the orchestrator to
    /// broadcast as wire `Spawn` packets.
    pub fn take_spawned(&mut self) -> Vec<MissileSpawnedEvent> {
        std::mem::take(&mut self.spawned)
    }

    fn spawn_missile(
        &mut self,
        commands: &mut CommandBuffer,
        shooter: EntityId,
        shooter_pos: PositionComp,
        weapon_type: WeaponType,
        level: u8,
        is_player_owned: bool,
        id_hint: EntityId,
    ) {
        let damage = GameRule::missile_damage(weapon_type, level);
        let speed = GameRule::missile_speed(weapon_type, level);
        let spawn_pos = PositionComp {
            x: shooter_pos.x + SPAWN_OFFSET_X,
            y: shooter_pos.y + SPAWN_OFFSET_Y,
        };
        let direction = if is_player_owned { 1.0 } else { -1.0 };

        self.spawned.push(MissileSpawnedEvent {
            missile_id: id_hint,
            owner: shooter,
            weapon_type,
        });

        commands.spawn(move |world| {
            let entity = world.spawn();
            world.insert(entity, spawn_pos);
            world.insert(
                entity,
                VelocityComp {
                    x: speed * direction,
                    y: 0.0,
                },
            );
            world.insert(
                entity,
                HitboxComp {
                    width: rtype_domain::constants::weapon::MISSILE_WIDTH,
                    height: rtype_domain::constants::weapon::MISSILE_HEIGHT,
                    offset_x: 0.0,
                    offset_y: 0.0,
                },
            );
            world.insert(
                entity,
                MissileTag {
                    weapon_type,
                    base_damage: damage,
                    is_homing: weapon_type == WeaponType::Homing,
                    target_id: None,
                },
            );
            world.insert(
                entity,
                OwnerComp {
                    owner_id: shooter,
                    is_player_owned,
                },
            );
            world.insert(
                entity,
                LifetimeComp {
                    remaining: rtype_domain::constants::weapon::MISSILE_LIFETIME,
                    total: rtype_domain::constants::weapon::MISSILE_LIFETIME,
                },
            );
            let group = if is_player_owned {
                EntityGroup::Missiles
            } else {
                EntityGroup::EnemyMissiles
            };
            world.join_group(entity, group);
        });
    }
}

impl System for WeaponSystem {
    fn name(&self) -> &'static str {
        "WeaponSystem"
    }

    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, delta_time: f32) {
        for (_, weapon) in world.query_mut::<WeaponComp>() {
            weapon.shoot_cooldown = (weapon.shoot_cooldown - delta_time).max(0.0);
            if weapon.is_charging {
                weapon.charge_time += delta_time;
            }
        }

        while let Some(req) = self.switch_queue.pop_front() {
            if let Some(weapon) = world.get_mut::<WeaponComp>(req.shooter) {
                weapon.current_type = weapon.current_type.cycle(req.delta);
            }
        }

        while let Some(req) = self.charge_start_queue.pop_front() {
            if let Some(weapon) = world.get_mut::<WeaponComp>(req.shooter) {
                if weapon.current_type == WeaponType::Laser {
                    weapon.is_charging = true;
                    weapon.charge_time = 0.0;
                }
            }
        }

        while let Some(req) = self.charge_release_queue.pop_front() {
            let Some(weapon) = world.get::<WeaponComp>(req.shooter).copied() else {
                continue;
            };
            if !weapon.is_charging {
                continue;
            }
            let charge_level = rtype_domain::constants::wavecannon::CHARGE_TIME
                .iter()
                .enumerate()
                .filter(|(_, &t)| weapon.charge_time >= t)
                .map(|(i, _)| i as u8 + 1)
                .max()
                .unwrap_or(1);
            let Some(pos) = world.get::<PositionComp>(req.shooter).copied() else {
                continue;
            };
            if let Some(w) = world.get_mut::<WeaponComp>(req.shooter) {
                w.is_charging = false;
                w.charge_time = 0.0;
            }
            let width = GameRule::wave_cannon_width(charge_level);
            let shooter = req.shooter;
            let missile_id = shooter;
            self.spawned.push(MissileSpawnedEvent {
                missile_id,
                owner: shooter,
                weapon_type: WeaponType::Laser,
            });
            commands.spawn(move |world| {
                let entity = world.spawn();
                world.insert(
                    entity,
                    PositionComp {
                        x: pos.x + SPAWN_OFFSET_X,
                        y: pos.y + SPAWN_OFFSET_Y,
                    },
                );
                world.insert(
                    entity,
                    VelocityComp {
                        x: rtype_domain::constants::wavecannon::SPEED,
                        y: 0.0,
                    },
                );
                world.insert(
                    entity,
                    HitboxComp {
                        width: rtype_domain::constants::wavecannon::LENGTH,
                        height: width,
                        offset_x: 0.0,
                        offset_y: 0.0,
                    },
                );
                world.insert(entity, WaveCannonTag { charge_level, width });
                world.insert(
                    entity,
                    crate::components::HitEnemies(std::collections::HashSet::new()),
                );
                world.insert(
                    entity,
                    OwnerComp {
                        owner_id: shooter,
                        is_player_owned: true,
                    },
                );
                world.insert(
                    entity,
                    LifetimeComp {
                        remaining: rtype_domain::constants::wavecannon::LIFETIME,
                        total: rtype_domain::constants::wavecannon::LIFETIME,
                    },
                );
                world.join_group(entity, EntityGroup::WaveCannons);
            });
        }

        while let Some(req) = self.shoot_queue.pop_front() {
            let shooter = req.shooter;
            let Some(weapon) = world.get::<WeaponComp>(shooter).copied() else {
                continue;
            };
            if weapon.shoot_cooldown > 0.0 || weapon.is_charging {
                continue;
            }
            let Some(pos) = world.get::<PositionComp>(shooter).copied() else {
                continue;
            };
            let is_player_owned = world.has::<PlayerTag>(shooter);
            let level = weapon.current_level();
            let cooldown = self.bridge.get_weapon_cooldown(weapon.current_type, level);
            if let Some(w) = world.get_mut::<WeaponComp>(shooter) {
                w.shoot_cooldown = cooldown;
            }
            self.spawn_missile(commands, shooter, pos, weapon.current_type, level, is_player_owned, shooter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_shooter(world: &mut World) -> EntityId {
        let e = world.spawn();
        world.insert(e, PositionComp { x: 100.0, y: 200.0 });
        world.insert(e, WeaponComp::new());
        world.insert(
            e,
            PlayerTag {
                player_id: 1,
                ship_skin: 0,
                is_alive: true,
            },
        );
        e
    }

    #[test]
    fn shoot_spawns_missile_at_offset_and_starts_cooldown() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = WeaponSystem::new();
        let shooter = spawn_shooter(&mut world);
        sys.request_shoot(ShootRequest { shooter });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);

        assert_eq!(world.count::<MissileTag>(), 1);
        let (_, pos) = world.query::<PositionComp>().find(|(e, _)| *e != shooter).unwrap();
        assert_eq!(pos.x, 150.0);
        assert_eq!(pos.y, 200.0);
        assert!(world.get::<WeaponComp>(shooter).unwrap().shoot_cooldown > 0.0);
    }

    #[test]
    fn shoot_on_cooldown_is_ignored() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = WeaponSystem::new();
        let shooter = spawn_shooter(&mut world);
        world.get_mut::<WeaponComp>(shooter).unwrap().shoot_cooldown = 1.0;
        sys.request_shoot(ShootRequest { shooter });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);
        assert_eq!(world.count::<MissileTag>(), 0);
    }

    #[test]
    fn switch_weapon_cycles_type() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = WeaponSystem::new();
        let shooter = spawn_shooter(&mut world);
        sys.request_switch(SwitchWeaponRequest { shooter, delta: -1 });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        assert_eq!(world.get::<WeaponComp>(shooter).unwrap().current_type, WeaponType::Homing);
    }
}
