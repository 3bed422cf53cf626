//! Resolves collision events into damage, deaths and despawns.
//!
//! Each collision-pair kind has its own branch. Player-vs-enemy contact
//! damage is intentionally absent, matching the original game's logic,
//! which has that branch commented out.

use rtype_domain::constants::{bitdevice, forcepod, powerup, wavecannon};
use rtype_domain::types::{EnemyType, PowerUpType, WeaponType};

use crate::bridge::DomainBridge;
use crate::command::CommandBuffer;
use crate::components::{
    BitDeviceTag, EnemyTag, ForcePodTag, HealthComp, HitCooldowns, HitEnemies, HitboxComp,
    MissileTag, OwnerComp, PlayerTag, PositionComp, PowerUpTag, ScoreComp, SpeedLevelComp,
    VelocityComp, WaveCannonTag, WeaponComp,
};
use crate::entity::EntityId;
use crate::group::EntityGroup;
use crate::scheduler::System;
use crate::systems::collision::{CollisionEventQueue, CollisionPairKind};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillEvent {
    pub enemy: EntityId,
    pub enemy_type: EnemyType,
    pub killer: Option<EntityId>,
    pub weapon_type: Option<WeaponType>,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpCollectedEvent {
    pub player: EntityId,
    pub power_up: EntityId,
    pub power_up_type: rtype_domain::types::PowerUpType,
}

pub struct DamageSystem {
    events: CollisionEventQueue,
    bridge: DomainBridge,
    kills: Vec<KillEvent>,
    pickups: Vec<PowerUpCollectedEvent>,
}

impl DamageSystem {
    pub fn new(events: CollisionEventQueue) -> Self {
        Self {
            events,
            bridge: DomainBridge,
            kills: Vec::new(),
            pickups: Vec::new(),
        }
    }

    pub fn take_kills(&mut self) -> Vec<KillEvent> {
        std::mem::take(&mut self.kills)
    }

    pub fn take_pickups(&mut self) -> Vec<PowerUpCollectedEvent> {
        std::mem::take(&mut self.pickups)
    }

    fn damage_entity(
        &mut self,
        world: &mut World,
        commands: &mut CommandBuffer,
        target: EntityId,
        amount: u16,
        killer: Option<EntityId>,
        weapon_type: Option<WeaponType>,
    ) {
        let Some(health) = world.get::<HealthComp>(target) else {
            return;
        };
        if health.invulnerable {
            return;
        }
        let result = self.bridge.apply_damage(health.current, amount);
        if let Some(health) = world.get_mut::<HealthComp>(target) {
            health.current -= result.actual_damage;
        }
        if !result.died {
            return;
        }
        if let Some(tag) = world.get::<EnemyTag>(target).copied() {
            let pos = world.get::<PositionComp>(target).copied().unwrap_or(PositionComp { x: 0.0, y: 0.0 });
            self.kills.push(KillEvent {
                enemy: target,
                enemy_type: tag.enemy_type,
                killer,
                weapon_type,
                x: pos.x,
                y: pos.y,
            });
            commands.despawn(target);
        } else if world.has::<PlayerTag>(target) {
            if let Some(player_tag) = world.get_mut::<PlayerTag>(target) {
                player_tag.is_alive = false;
            }
            if let Some(score) = world.get_mut::<ScoreComp>(target) {
                score.deaths += 1;
            }
        }
    }
}

impl System for DamageSystem {
    fn name(&self) -> &'static str {
        "DamageSystem"
    }

    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, delta_time: f32) {
        let drained: Vec<_> = self.events.lock().expect("collision queue mutex poisoned").drain(..).collect();
        for event in drained {
            match event.kind {
                CollisionPairKind::MissileVsEnemy => {
                    let missile = event.a;
                    let enemy = event.b;
                    let Some(missile_tag) = world.get::<MissileTag>(missile).copied() else {
                        continue;
                    };
                    let owner = world.get::<OwnerComp>(missile).map(|o| o.owner_id);
                    self.damage_entity(world, commands, enemy, missile_tag.base_damage as u16, owner, Some(missile_tag.weapon_type));
                    commands.despawn(missile);
                }
                CollisionPairKind::WaveCannonVsEnemy => {
                    let wave = event.a;
                    let enemy = event.b;
                    let already_hit = world
                        .get::<HitEnemies>(wave)
                        .map(|h| h.0.contains(&enemy))
                        .unwrap_or(false);
                    if already_hit {
                        continue;
                    }
                    let Some(tag) = world.get::<WaveCannonTag>(wave).copied() else {
                        continue;
                    };
                    let damage = wavecannon::DAMAGE[(tag.charge_level.clamp(1, 3) - 1) as usize];
                    let owner = world.get::<OwnerComp>(wave).map(|o| o.owner_id);
                    self.damage_entity(world, commands, enemy, damage, owner, None);
                    if let Some(hit) = world.get_mut::<HitEnemies>(wave) {
                        hit.0.insert(enemy);
                    }
                }
                CollisionPairKind::PlayerVsEnemyMissile => {
                    let player = event.a;
                    let missile = event.b;
                    let Some(missile_tag) = world.get::<MissileTag>(missile).copied() else {
                        continue;
                    };
                    let already_dead = world.get::<PlayerTag>(player).map(|p| !p.is_alive).unwrap_or(false);
                    if already_dead {
                        commands.despawn(missile);
                        continue;
                    }
                    self.damage_entity(world, commands, player, missile_tag.base_damage as u16, None, None);
                    commands.despawn(missile);
                }
                CollisionPairKind::ForcePodVsEnemy => {
                    let pod = event.a;
                    let enemy = event.b;
                    let ready = world
                        .get::<HitCooldowns>(pod)
                        .map(|hc| hc.is_ready(enemy))
                        .unwrap_or(true);
                    if !ready {
                        continue;
                    }
                    self.damage_entity(world, commands, enemy, forcepod::CONTACT_DAMAGE, None, None);
                    if !world.has::<HitCooldowns>(pod) {
                        world.insert(pod, HitCooldowns::default());
                    }
                    if let Some(hc) = world.get_mut::<HitCooldowns>(pod) {
                        hc.mark_hit(enemy, forcepod::HIT_COOLDOWN);
                    }
                }
                CollisionPairKind::BitDeviceVsEnemy => {
                    let device = event.a;
                    let enemy = event.b;
                    let ready = world
                        .get::<HitCooldowns>(device)
                        .map(|hc| hc.is_ready(enemy))
                        .unwrap_or(true);
                    if !ready {
                        continue;
                    }
                    self.damage_entity(world, commands, enemy, bitdevice::CONTACT_DAMAGE, None, None);
                    if !world.has::<HitCooldowns>(device) {
                        world.insert(device, HitCooldowns::default());
                    }
                    if let Some(hc) = world.get_mut::<HitCooldowns>(device) {
                        hc.mark_hit(enemy, bitdevice::HIT_COOLDOWN);
                    }
                }
                CollisionPairKind::PlayerVsPowerUp => {
                    let player = event.a;
                    let power_up = event.b;
                    let Some(tag) = world.get::<PowerUpTag>(power_up).copied() else {
                        continue;
                    };
                    if !world.has::<PlayerTag>(player) {
                        continue;
                    }
                    apply_power_up_effect(world, commands, player, tag.power_up_type);
                    self.pickups.push(PowerUpCollectedEvent {
                        player,
                        power_up,
                        power_up_type: tag.power_up_type,
                    });
                    commands.despawn(power_up);
                }
            }
        }

        tick_hit_cooldowns(world, delta_time);
    }
}

/// Decays Force Pod / Bit Device contact-damage cooldowns every tick,
/// independent of whether a collision happened this frame.
fn tick_hit_cooldowns(world: &mut World, delta_time: f32) {
    for (_, cooldowns) in world.query_mut::<HitCooldowns>() {
        cooldowns.tick(delta_time);
    }
}

fn apply_power_up_effect(world: &mut World, commands: &mut CommandBuffer, player: EntityId, power_up_type: PowerUpType) {
    match power_up_type {
        PowerUpType::Health => {
            if let Some(health) = world.get_mut::<HealthComp>(player) {
                health.current = (health.current + powerup::HEAL_AMOUNT).min(health.max);
            }
        }
        PowerUpType::SpeedUp => {
            if let Some(speed) = world.get_mut::<SpeedLevelComp>(player) {
                speed.upgrade();
            }
        }
        PowerUpType::WeaponCrystal => {
            if let Some(weapon) = world.get_mut::<WeaponComp>(player) {
                weapon.upgrade_current_weapon();
            }
        }
        PowerUpType::ForcePod => attach_force_pod(world, commands, player),
        PowerUpType::BitDevice => attach_bit_device(world, commands, player),
    }
}

/// A second pickup upgrades the existing pod's level instead of attaching
/// a duplicate, mirroring `WeaponComp::upgrade_current_weapon`'s cap at 3.
fn attach_force_pod(world: &mut World, commands: &mut CommandBuffer, player: EntityId) {
    let existing = world
        .group_members(EntityGroup::ForcePods)
        .find(|&e| world.get::<OwnerComp>(e).map(|o| o.owner_id == player).unwrap_or(false));
    if let Some(pod) = existing {
        if let Some(tag) = world.get_mut::<ForcePodTag>(pod) {
            tag.level = (tag.level + 1).min(3);
        }
        return;
    }
    let Some(pos) = world.get::<PositionComp>(player).copied() else { return };
    commands.spawn(move |world| {
        let pod = world.spawn();
        world.insert(pod, PositionComp { x: pos.x + forcepod::ATTACH_OFFSET_X, y: pos.y });
        world.insert(pod, VelocityComp { x: 0.0, y: 0.0 });
        world.insert(
            pod,
            HitboxComp {
                width: forcepod::WIDTH,
                height: forcepod::HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        world.insert(pod, ForcePodTag { level: 1, shoot_cooldown: 0.0 });
        world.insert(pod, OwnerComp { owner_id: player, is_player_owned: true });
        world.insert(pod, HitCooldowns::default());
        world.join_group(pod, EntityGroup::ForcePods);
    });
}

/// Caps at two devices per owner per the companion's own orbit-slot layout.
fn attach_bit_device(world: &mut World, commands: &mut CommandBuffer, player: EntityId) {
    let count = world
        .group_members(EntityGroup::BitDevices)
        .filter(|&e| world.get::<OwnerComp>(e).map(|o| o.owner_id == player).unwrap_or(false))
        .count();
    if count >= 2 {
        return;
    }
    let slot = count as u8;
    let Some(pos) = world.get::<PositionComp>(player).copied() else { return };
    commands.spawn(move |world| {
        let device = world.spawn();
        world.insert(device, pos);
        world.insert(device, VelocityComp { x: 0.0, y: 0.0 });
        world.insert(
            device,
            HitboxComp {
                width: bitdevice::WIDTH,
                height: bitdevice::HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        world.insert(device, BitDeviceTag { orbit_angle: 0.0, slot, shoot_cooldown: bitdevice::SHOOT_COOLDOWN });
        world.insert(device, OwnerComp { owner_id: player, is_player_owned: true });
        world.insert(device, HitCooldowns::default());
        world.join_group(device, EntityGroup::BitDevices);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{HitboxComp, PositionComp};
    use crate::systems::collision::CollisionEvent;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    fn queue() -> CollisionEventQueue {
        Arc::new(Mutex::new(VecDeque::new()))
    }

    #[test]
    fn missile_kills_enemy_and_emits_kill_event() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let q = queue();
        let mut sys = DamageSystem::new(q.clone());

        let missile = world.spawn();
        world.insert(
            missile,
            MissileTag {
                weapon_type: rtype_domain::types::WeaponType::Standard,
                base_damage: 100,
                is_homing: false,
                target_id: None,
            },
        );
        let enemy = world.spawn();
        world.insert(enemy, HealthComp::full(40));
        world.insert(
            enemy,
            EnemyTag {
                enemy_type: EnemyType::Basic,
                points: 100,
            },
        );

        q.lock().unwrap().push_back(CollisionEvent {
            kind: CollisionPairKind::MissileVsEnemy,
            a: missile,
            b: enemy,
        });

        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);

        let kills = sys.take_kills();
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].enemy_type, EnemyType::Basic);
        assert!(!world.is_alive(enemy));
        assert!(!world.is_alive(missile));
    }

    #[test]
    fn wave_cannon_does_not_double_hit_same_enemy() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let q = queue();
        let mut sys = DamageSystem::new(q.clone());

        let wave = world.spawn();
        world.insert(wave, WaveCannonTag { charge_level: 1, width: 20.0 });
        world.insert(wave, HitEnemies::default());

        let enemy = world.spawn();
        world.insert(enemy, HealthComp::full(10_000));
        world.insert(
            enemy,
            EnemyTag {
                enemy_type: EnemyType::Armored,
                points: 200,
            },
        );

        for _ in 0..2 {
            q.lock().unwrap().push_back(CollisionEvent {
                kind: CollisionPairKind::WaveCannonVsEnemy,
                a: wave,
                b: enemy,
            });
            sys.run(&mut world, &mut commands, 1.0 / 60.0);
            world.flush(&mut commands);
        }

        assert_eq!(world.get::<HealthComp>(enemy).unwrap().current, 10_000 - 50);
    }

    #[test]
    fn force_pod_respects_hit_cooldown() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let q = queue();
        let mut sys = DamageSystem::new(q.clone());

        let pod = world.spawn();
        let enemy = world.spawn();
        world.insert(enemy, HealthComp::full(1000));
        world.insert(
            enemy,
            EnemyTag {
                enemy_type: EnemyType::Basic,
                points: 100,
            },
        );

        q.lock().unwrap().push_back(CollisionEvent {
            kind: CollisionPairKind::ForcePodVsEnemy,
            a: pod,
            b: enemy,
        });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);
        let after_first = world.get::<HealthComp>(enemy).unwrap().current;

        q.lock().unwrap().push_back(CollisionEvent {
            kind: CollisionPairKind::ForcePodVsEnemy,
            a: pod,
            b: enemy,
        });
        sys.run(&mut world, &mut commands, 0.1);
        world.flush(&mut commands);
        assert_eq!(world.get::<HealthComp>(enemy).unwrap().current, after_first);
    }

    #[test]
    fn powerup_pickup_requires_player() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let q = queue();
        let mut sys = DamageSystem::new(q.clone());

        let player = world.spawn();
        world.insert(
            player,
            PlayerTag {
                player_id: 1,
                ship_skin: 0,
                is_alive: true,
            },
        );
        let power_up = world.spawn();
        world.insert(
            power_up,
            PowerUpTag {
                power_up_type: rtype_domain::types::PowerUpType::Health,
            },
        );

        q.lock().unwrap().push_back(CollisionEvent {
            kind: CollisionPairKind::PlayerVsPowerUp,
            a: player,
            b: power_up,
        });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);
        world.flush(&mut commands);

        assert_eq!(sys.take_pickups().len(), 1);
        assert!(!world.is_alive(power_up));
    }
}
