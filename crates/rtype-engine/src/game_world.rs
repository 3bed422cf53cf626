//! Per-room game orchestrator.
//!
//! Owns one [`World`] plus every concrete system instance, and sequences
//! them in a fixed numeric-priority order on every [`GameWorld::tick`].
//! Systems that hand data to a downstream system
//! (`WeaponSystem`'s spawn events, `CollisionSystem`'s pairs into
//! `DamageSystem`, `DamageSystem`'s kills into `ScoreSystem`) are wired
//! directly rather than through the generic [`rtype_ecs::scheduler::Scheduler`],
//! since that hand-off needs each system's concrete type.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use rtype_domain::constants::{
    bitdevice, boss as boss_consts, forcepod, player, powerup, score as score_consts,
};
use rtype_domain::prelude::{CollisionRule, GameRule};
use rtype_domain::types::{EnemyType, PowerUpType, WeaponType};
use rtype_ecs::command::CommandBuffer;
use rtype_ecs::components::{
    BitDeviceTag, EnemyAIComp, EnemyTag, ForcePodTag, HealthComp, HitboxComp, LifetimeComp,
    MissileTag, OwnerComp, PlayerTag, PositionComp, PowerUpTag, ScoreComp, SpeedLevelComp,
    VelocityComp, WaveCannonTag, WeaponComp,
};
use rtype_ecs::entity::EntityId;
use rtype_ecs::group::EntityGroup;
use rtype_ecs::scheduler::System;
use rtype_ecs::systems::collision::CollisionEventQueue;
use rtype_ecs::systems::cleanup::CleanupSystem;
use rtype_ecs::systems::collision::CollisionSystem;
use rtype_ecs::systems::damage::{DamageSystem, KillEvent, PowerUpCollectedEvent};
use rtype_ecs::systems::enemy_ai::EnemyAISystem;
use rtype_ecs::systems::lifetime::LifetimeSystem;
use rtype_ecs::systems::movement::MovementSystem;
use rtype_ecs::systems::player_input::{PlayerInputRequest, PlayerInputSystem};
use rtype_ecs::systems::score::ScoreSystem;
use rtype_ecs::systems::weapon::{
    ChargeReleaseRequest, ChargeStartRequest, MissileSpawnedEvent, ShootRequest,
    SwitchWeaponRequest, WeaponSystem,
};
use rtype_ecs::world::World;

use crate::boss::BossState;
use crate::config::RoomSettings;
use crate::error::RoomError;
use crate::score::PlayerScore;
use crate::wave::WaveSpawner;

/// Wire-agnostic entity kind; `rtype-server` maps this to the protocol's
/// `EntityState::entity_type` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Player,
    Enemy,
    PlayerMissile,
    EnemyMissile,
    PowerUp,
    WaveCannon,
    ForcePod,
    BitDevice,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub entity: EntityId,
    pub kind: SnapshotKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: u16,
    pub max_health: u16,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossSnapshot {
    pub x: f32,
    pub y: f32,
    pub health: u32,
    pub max_health: u32,
    pub phase: rtype_domain::types::BossPhase,
}

#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub entities: Vec<EntitySnapshot>,
    pub boss: Option<BossSnapshot>,
}

pub struct GameWorld {
    pub room_code: String,
    world: World,
    player_entities: HashMap<u32, EntityId>,
    player_last_input_seq: HashMap<u32, u32>,
    scores: HashMap<u32, PlayerScore>,
    max_players: u8,

    rng: Pcg32,
    wave_spawner: WaveSpawner,
    boss: Option<BossState>,
    boss_defeat_count: u16,
    elapsed: f32,
    wave_in_progress: bool,
    powerup_spawn_timer: f32,

    game_speed_multiplier: f32,
    player_last_activity: HashMap<u32, f32>,
    player_timeout_secs: f32,

    player_input: PlayerInputSystem,
    enemy_ai: EnemyAISystem,
    weapon: WeaponSystem,
    movement: MovementSystem,
    collision: CollisionSystem,
    damage: DamageSystem,
    lifetime: LifetimeSystem,
    cleanup: CleanupSystem,
    score_system: ScoreSystem,
    collision_events: CollisionEventQueue,

    pending_spawns: Vec<MissileSpawnedEvent>,
    pending_kills: Vec<KillEvent>,
    pending_pickups: Vec<PowerUpCollectedEvent>,
    boss_wave_cannon_hits: HashSet<EntityId>,
}

impl GameWorld {
    pub fn new(room_code: impl Into<String>, max_players: u8, seed: u64, settings: RoomSettings) -> Self {
        let collision_events: CollisionEventQueue = Arc::new(Mutex::new(VecDeque::new()));
        Self {
            room_code: room_code.into(),
            world: World::new(),
            player_entities: HashMap::new(),
            player_last_input_seq: HashMap::new(),
            scores: HashMap::new(),
            max_players,
            rng: Pcg32::seed_from_u64(seed),
            wave_spawner: WaveSpawner::new(settings.boss_spawn_wave),
            boss: None,
            boss_defeat_count: 0,
            elapsed: 0.0,
            wave_in_progress: false,
            powerup_spawn_timer: 0.0,
            game_speed_multiplier: settings.game_speed_percent as f32 / 100.0,
            player_last_activity: HashMap::new(),
            player_timeout_secs: settings.player_timeout_secs,
            player_input: PlayerInputSystem::new(),
            enemy_ai: EnemyAISystem::new(),
            weapon: WeaponSystem::new(),
            movement: MovementSystem,
            collision: CollisionSystem::new(collision_events.clone()),
            damage: DamageSystem::new(collision_events.clone()),
            lifetime: LifetimeSystem,
            cleanup: CleanupSystem,
            score_system: ScoreSystem::new(),
            collision_events,
            pending_spawns: Vec::new(),
            pending_kills: Vec::new(),
            pending_pickups: Vec::new(),
            boss_wave_cannon_hits: HashSet::new(),
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_entities.len()
    }

    pub fn add_player(&mut self, player_id: u32) -> Result<EntityId, RoomError> {
        if self.player_entities.len() >= self.max_players as usize {
            return Err(RoomError::RoomFull(self.room_code.clone()));
        }
        let entity = self.world.spawn();
        self.world.insert(
            entity,
            PlayerTag {
                player_id,
                ship_skin: 0,
                is_alive: true,
            },
        );
        self.world.insert(
            entity,
            PositionComp {
                x: 100.0,
                y: 100.0 + (player_id as f32 - 1.0) * 100.0,
            },
        );
        self.world.insert(entity, VelocityComp { x: 0.0, y: 0.0 });
        self.world.insert(
            entity,
            HitboxComp {
                width: player::SHIP_WIDTH,
                height: player::SHIP_HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        self.world.insert(entity, HealthComp::full(player::DEFAULT_HEALTH));
        self.world.insert(entity, SpeedLevelComp { level: 0 });
        self.world.insert(entity, WeaponComp::new());
        self.world.insert(entity, ScoreComp::default());
        self.world.join_group(entity, EntityGroup::Players);

        self.player_entities.insert(player_id, entity);
        self.scores.insert(player_id, PlayerScore::new(player_id));
        self.player_last_activity.insert(player_id, self.elapsed);
        Ok(entity)
    }

    pub fn remove_player(&mut self, player_id: u32) {
        if let Some(entity) = self.player_entities.remove(&player_id) {
            self.world.despawn(entity);
        }
        self.player_last_input_seq.remove(&player_id);
        self.player_last_activity.remove(&player_id);
    }

    pub fn player_entity(&self, player_id: u32) -> Option<EntityId> {
        self.player_entities.get(&player_id).copied()
    }

    pub fn get_player_last_input_seq(&self, player_id: u32) -> Option<u32> {
        self.player_last_input_seq.get(&player_id).copied()
    }

    /// Applies a movement input. `seq` is the client-assigned sequence
    /// number; out-of-order (older than the last seen) inputs are
    /// dropped silently.
    pub fn apply_player_input(
        &mut self,
        player_id: u32,
        seq: u32,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    ) {
        self.player_last_activity.insert(player_id, self.elapsed);
        if let Some(&last) = self.player_last_input_seq.get(&player_id) {
            if seq <= last {
                return;
            }
        }
        self.player_last_input_seq.insert(player_id, seq);
        self.player_input.submit(PlayerInputRequest {
            player_id,
            up,
            down,
            left,
            right,
        });
    }

    pub fn request_shoot(&mut self, player_id: u32) {
        if let Some(&shooter) = self.player_entities.get(&player_id) {
            self.weapon.request_shoot(ShootRequest { shooter });
        }
    }

    pub fn request_charge_start(&mut self, player_id: u32) {
        if let Some(&shooter) = self.player_entities.get(&player_id) {
            self.weapon.request_charge_start(ChargeStartRequest { shooter });
        }
    }

    pub fn request_charge_release(&mut self, player_id: u32) {
        if let Some(&shooter) = self.player_entities.get(&player_id) {
            self.weapon.request_charge_release(ChargeReleaseRequest { shooter });
        }
    }

    pub fn request_switch_weapon(&mut self, player_id: u32, delta: i8) {
        if let Some(&shooter) = self.player_entities.get(&player_id) {
            self.weapon.request_switch(SwitchWeaponRequest { shooter, delta });
        }
    }

    /// Admin/debug hook, never dispatched from normal client input; kept
    /// public for the same reason the original header keeps it alongside
    /// the other player-management methods while marking it "Hidden".
    pub fn set_player_god_mode(&mut self, player_id: u32, enabled: bool) {
        if let Some(&entity) = self.player_entities.get(&player_id) {
            if let Some(health) = self.world.get_mut::<HealthComp>(entity) {
                health.invulnerable = enabled;
            }
        }
    }

    /// Scales every system's `delta_time` this tick onward. Clamped to
    /// 50%-200%; outside that range the sim either stalls or desyncs the
    /// companion cooldown timers against the wall clock used for timeouts.
    pub fn set_game_speed_percent(&mut self, percent: u8) {
        self.game_speed_multiplier = percent.clamp(50, 200) as f32 / 100.0;
    }

    pub fn spawn_power_up(&mut self, power_up_type: PowerUpType, x: f32, y: f32) -> EntityId {
        let entity = self.world.spawn();
        self.world.insert(entity, PositionComp { x, y });
        self.world.insert(
            entity,
            VelocityComp {
                x: powerup::DRIFT_SPEED,
                y: 0.0,
            },
        );
        self.world.insert(
            entity,
            HitboxComp {
                width: powerup::WIDTH,
                height: powerup::HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        self.world.insert(entity, PowerUpTag { power_up_type });
        self.world.insert(
            entity,
            LifetimeComp {
                remaining: powerup::MAX_LIFETIME,
                total: powerup::MAX_LIFETIME,
            },
        );
        self.world.join_group(entity, EntityGroup::PowerUps);
        entity
    }

    pub fn spawn_random_power_up(&mut self, x: f32, y: f32) -> EntityId {
        let idx = self.rng.gen_range_ext(PowerUpType::ALL.len());
        self.spawn_power_up(PowerUpType::ALL[idx], x, y)
    }

    /// Shared by the Force Pod's on-fire co-shot and the Bit Device's
    /// independent auto-fire; both spawn a plain player-owned missile at a
    /// companion's current position rather than the player's weapon slot.
    fn spawn_companion_missile(&mut self, owner: EntityId, pos: PositionComp, damage: u8) {
        let entity = self.world.spawn();
        self.world.insert(entity, pos);
        self.world.insert(
            entity,
            VelocityComp {
                x: rtype_domain::constants::weapon::SPEED0[WeaponType::Standard as usize],
                y: 0.0,
            },
        );
        self.world.insert(
            entity,
            HitboxComp {
                width: rtype_domain::constants::weapon::MISSILE_WIDTH,
                height: rtype_domain::constants::weapon::MISSILE_HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        self.world.insert(
            entity,
            MissileTag {
                weapon_type: WeaponType::Standard,
                base_damage: damage,
                is_homing: false,
                target_id: None,
            },
        );
        self.world.insert(entity, OwnerComp { owner_id: owner, is_player_owned: true });
        self.world.insert(
            entity,
            LifetimeComp {
                remaining: rtype_domain::constants::weapon::MISSILE_LIFETIME,
                total: rtype_domain::constants::weapon::MISSILE_LIFETIME,
            },
        );
        self.world.join_group(entity, EntityGroup::Missiles);
    }

    /// Co-fires a Force Pod missile alongside its owning player, matching
    /// the companion's own cadence rather than the player's weapon cooldown.
    fn fire_force_pod_if_ready(&mut self, owner: EntityId) {
        let pod = self
            .world
            .group_members(EntityGroup::ForcePods)
            .find(|&e| self.world.get::<OwnerComp>(e).map(|o| o.owner_id == owner).unwrap_or(false));
        let Some(pod) = pod else { return };
        let Some(tag) = self.world.get::<ForcePodTag>(pod).copied() else { return };
        if tag.shoot_cooldown > 0.0 {
            return;
        }
        let Some(pos) = self.world.get::<PositionComp>(pod).copied() else { return };
        let damage = forcepod::CONTACT_DAMAGE as u8 + tag.level.saturating_sub(1) * 10;
        if let Some(tag) = self.world.get_mut::<ForcePodTag>(pod) {
            tag.shoot_cooldown = forcepod::SHOOT_COOLDOWN;
        }
        self.spawn_companion_missile(owner, pos, damage);
    }

    /// Follows its owner and decays both companions' shoot cooldowns every
    /// tick; Bit Devices additionally orbit and auto-fire independently of
    /// player input.
    fn step_companions(&mut self, delta_time: f32) {
        for pod in self.world.group_members(EntityGroup::ForcePods).collect::<Vec<_>>() {
            let Some(owner) = self.world.get::<OwnerComp>(pod).map(|o| o.owner_id) else { continue };
            let Some(owner_pos) = self.world.get::<PositionComp>(owner).copied() else {
                self.world.despawn(pod);
                continue;
            };
            if let Some(pos) = self.world.get_mut::<PositionComp>(pod) {
                pos.x = owner_pos.x + forcepod::ATTACH_OFFSET_X;
                pos.y = owner_pos.y;
            }
            if let Some(tag) = self.world.get_mut::<ForcePodTag>(pod) {
                tag.shoot_cooldown = (tag.shoot_cooldown - delta_time).max(0.0);
            }
        }

        for device in self.world.group_members(EntityGroup::BitDevices).collect::<Vec<_>>() {
            let Some(owner) = self.world.get::<OwnerComp>(device).map(|o| o.owner_id) else { continue };
            let Some(owner_pos) = self.world.get::<PositionComp>(owner).copied() else {
                self.world.despawn(device);
                continue;
            };
            let Some(tag) = self.world.get::<BitDeviceTag>(device).copied() else { continue };

            let angle = (tag.orbit_angle + bitdevice::ORBIT_SPEED * delta_time) % std::f32::consts::TAU;
            let fire_angle = angle + tag.slot as f32 * std::f32::consts::PI;
            let new_pos = PositionComp {
                x: owner_pos.x + fire_angle.cos() * bitdevice::ORBIT_RADIUS,
                y: owner_pos.y + fire_angle.sin() * bitdevice::ORBIT_RADIUS,
            };
            let mut cooldown = (tag.shoot_cooldown - delta_time).max(0.0);
            let should_fire = cooldown <= 0.0;
            if should_fire {
                cooldown = bitdevice::SHOOT_COOLDOWN;
            }

            if let Some(tag) = self.world.get_mut::<BitDeviceTag>(device) {
                tag.orbit_angle = angle;
                tag.shoot_cooldown = cooldown;
            }
            if let Some(pos) = self.world.get_mut::<PositionComp>(device) {
                *pos = new_pos;
            }
            if should_fire {
                self.spawn_companion_missile(owner, new_pos, bitdevice::CONTACT_DAMAGE as u8);
            }
        }
    }

    fn spawn_enemy(&mut self, enemy_type: EnemyType, x: f32, y: f32) {
        let entity = self.world.spawn();
        self.world.insert(entity, PositionComp { x, y });
        self.world.insert(entity, VelocityComp { x: 0.0, y: 0.0 });
        self.world.insert(
            entity,
            HitboxComp {
                width: rtype_domain::constants::enemy::WIDTH,
                height: rtype_domain::constants::enemy::HEIGHT,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        );
        self.world.insert(
            entity,
            EnemyTag {
                enemy_type,
                points: rtype_domain::prelude::GameRule::enemy_point_value(enemy_type),
            },
        );
        self.world.insert(
            entity,
            HealthComp::full(rtype_domain::prelude::GameRule::enemy_health(enemy_type)),
        );
        self.world.insert(
            entity,
            EnemyAIComp {
                shoot_cooldown: 0.0,
                shoot_interval: 0.0,
                base_y: y,
                alive_time: 0.0,
                phase_offset: 0.0,
                target_y: y,
                zigzag_timer: 0.0,
                zigzag_going_up: true,
            },
        );
        self.world.join_group(entity, EntityGroup::Enemies);
    }

    /// Advances the room's simulation by one fixed timestep. `delta_time`
    /// is real (wall-clock) time; `game_speed_multiplier` scales it for
    /// every gameplay system, while timeouts and `game_duration_secs`
    /// stay keyed to the unscaled clock.
    pub fn tick(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
        let scaled_dt = delta_time * self.game_speed_multiplier;
        self.step(scaled_dt);
        self.step_companions(scaled_dt);
        self.tick_powerup_spawn_timer(scaled_dt);
        self.check_wave_cleared();
        self.spawn_waves(scaled_dt);
        self.check_boss_collisions();
        self.step_boss(scaled_dt);
        self.check_player_timeouts();
        self.sync_scores();
    }

    fn step(&mut self, delta_time: f32) {
        let mut commands = CommandBuffer::new();

        self.player_input.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.enemy_ai.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.weapon.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);
        let spawned = self.weapon.take_spawned();
        for spawn in &spawned {
            self.fire_force_pod_if_ready(spawn.owner);
        }
        self.pending_spawns.extend(spawned);

        self.movement.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.collision.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.damage.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);
        for kill in self.damage.take_kills() {
            self.score_system.submit_kill(kill);
            self.roll_powerup_drop(kill.enemy_type, kill.x, kill.y);
            self.attribute_kill(&kill);
            self.pending_kills.push(kill);
        }
        self.pending_pickups.extend(self.damage.take_pickups());

        self.lifetime.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.cleanup.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);

        self.score_system.run(&mut self.world, &mut commands, delta_time);
        self.world.flush(&mut commands);
    }

    /// Attributes a kill to the scoring player's [`PlayerScore`] as it
    /// happens, independent of whether `rtype-server` has drained this
    /// tick's `pending_kills` yet.
    fn attribute_kill(&mut self, kill: &KillEvent) {
        let Some(killer) = kill.killer else { return };
        let Some((&player_id, _)) = self.player_entities.iter().find(|&(_, &e)| e == killer) else {
            return;
        };
        if let Some(score) = self.scores.get_mut(&player_id) {
            let points = GameRule::enemy_point_value(kill.enemy_type);
            score.record_kill(kill.enemy_type, kill.weapon_type.unwrap_or(WeaponType::Standard), points as u32);
        }
    }

    /// Rolls the per-kill power-up drop chance; Armored enemies use the
    /// higher chance, everyone else the base one.
    fn roll_powerup_drop(&mut self, enemy_type: EnemyType, x: f32, y: f32) {
        let chance = if enemy_type == EnemyType::Armored {
            powerup::ARMORED_DROP_CHANCE_PCT
        } else {
            powerup::DROP_CHANCE_PCT
        };
        if self.rng.gen_range(0..100) < chance as u32 {
            self.spawn_random_power_up(x, y);
        }
    }

    /// Drops an Armored-grade power-up at a random point on the field
    /// every [`powerup::ARMORED_SPAWN_INTERVAL`] seconds, independent of
    /// kills.
    fn tick_powerup_spawn_timer(&mut self, delta_time: f32) {
        self.powerup_spawn_timer += delta_time;
        if self.powerup_spawn_timer < powerup::ARMORED_SPAWN_INTERVAL {
            return;
        }
        self.powerup_spawn_timer = 0.0;
        let x = self.rng.gen_range(200.0..rtype_domain::constants::world::SCREEN_WIDTH - 200.0);
        let y = self.rng.gen_range(100.0..rtype_domain::constants::world::SCREEN_HEIGHT - 100.0);
        self.spawn_random_power_up(x, y);
    }

    /// Detects the enemies-present -> enemies-empty transition (with no
    /// boss active) and credits every living player with a wave clear.
    fn check_wave_cleared(&mut self) {
        let enemies_present = self.world.group_count(EntityGroup::Enemies) > 0;
        if self.boss.is_some() {
            self.wave_in_progress = enemies_present;
            return;
        }
        if enemies_present {
            self.wave_in_progress = true;
            return;
        }
        if !self.wave_in_progress {
            return;
        }
        self.wave_in_progress = false;
        for (&player_id, &entity) in &self.player_entities {
            let took_no_damage = self
                .world
                .get::<HealthComp>(entity)
                .map(|h| h.current == h.max)
                .unwrap_or(false);
            if let Some(score) = self.scores.get_mut(&player_id) {
                score.record_wave_cleared(took_no_damage);
            }
        }
    }

    /// Disconnects players who haven't sent input within `player_timeout_secs`.
    fn check_player_timeouts(&mut self) {
        let elapsed = self.elapsed;
        let cutoff = self.player_timeout_secs;
        let timed_out: Vec<u32> = self
            .player_last_activity
            .iter()
            .filter(|&(_, &last)| elapsed - last > cutoff)
            .map(|(&id, _)| id)
            .collect();
        for player_id in timed_out {
            tracing::info!(room_code = %self.room_code, player_id, "player inactive past timeout, removing");
            self.remove_player(player_id);
        }
    }

    fn spawn_waves(&mut self, delta_time: f32) {
        if self.boss.is_some() {
            return;
        }
        if let Some(points) = self.wave_spawner.tick(delta_time, &mut self.rng) {
            if self.wave_spawner.is_boss_wave() {
                self.boss = Some(BossState::new(self.player_count().max(1) as u8, self.boss_defeat_count));
                self.boss_wave_cannon_hits.clear();
            } else {
                for p in points {
                    self.spawn_enemy(p.enemy_type, p.x, p.y);
                }
            }
        }
    }

    /// Boss combat runs outside the generic `CollisionSystem`, since the
    /// boss is orchestrator state rather than an ECS entity: one AABB
    /// check per player-owned missile/wave-cannon against its bounds.
    fn check_boss_collisions(&mut self) {
        let Some(boss) = self.boss.as_ref() else { return };
        let (bx, by, bw, bh) = (
            boss.x - boss_consts::WIDTH / 2.0,
            boss.y - boss_consts::HEIGHT / 2.0,
            boss_consts::WIDTH,
            boss_consts::HEIGHT,
        );

        let mut missile_damage = 0u32;
        let mut spent_missiles = Vec::new();
        for missile in self.world.group_members(EntityGroup::Missiles).collect::<Vec<_>>() {
            let Some(pos) = self.world.get::<PositionComp>(missile).copied() else { continue };
            let Some(hb) = self.world.get::<HitboxComp>(missile).copied() else { continue };
            let Some(tag) = self.world.get::<MissileTag>(missile).copied() else { continue };
            if !CollisionRule::aabb(pos.x + hb.offset_x, pos.y + hb.offset_y, hb.width, hb.height, bx, by, bw, bh) {
                continue;
            }
            missile_damage += tag.base_damage as u32;
            spent_missiles.push(missile);
        }
        for missile in spent_missiles {
            self.world.despawn(missile);
        }

        let mut cannon_damage = 0u32;
        for cannon in self.world.group_members(EntityGroup::WaveCannons).collect::<Vec<_>>() {
            if self.boss_wave_cannon_hits.contains(&cannon) {
                continue;
            }
            let Some(pos) = self.world.get::<PositionComp>(cannon).copied() else { continue };
            let Some(hb) = self.world.get::<HitboxComp>(cannon).copied() else { continue };
            let Some(tag) = self.world.get::<WaveCannonTag>(cannon).copied() else { continue };
            if !CollisionRule::aabb(pos.x + hb.offset_x, pos.y + hb.offset_y, hb.width, hb.height, bx, by, bw, bh) {
                continue;
            }
            cannon_damage += rtype_domain::prelude::GameRule::wave_cannon_damage(tag.charge_level) as u32;
            self.boss_wave_cannon_hits.insert(cannon);
        }

        let total_damage = missile_damage + cannon_damage;
        if total_damage > 0 {
            self.boss.as_mut().expect("boss checked above").apply_damage(total_damage);
        }
    }

    fn step_boss(&mut self, delta_time: f32) {
        let Some(boss) = self.boss.as_mut() else { return };
        boss.tick(delta_time);
        if boss.is_defeated() {
            self.boss_defeat_count += 1;
            let bonus = score_consts::POINTS_BOSS as u32 + score_consts::POINTS_WAVE_BONUS as u32;
            for &entity in self.player_entities.values() {
                if let Some(score) = self.world.get_mut::<ScoreComp>(entity) {
                    score.total += bonus;
                }
            }
            self.boss = None;
        }
    }

    /// Mirrors aggregates the ECS `ScoreSystem`/`DamageSystem` already own
    /// (combo-weighted totals, death count) into the richer per-player
    /// [`PlayerScore`]. Per-kill attribution (enemy type, weapon, streak)
    /// happens immediately in [`Self::attribute_kill`] instead, since by
    /// the time this runs the individual kill events carry no weapon
    /// context any more, only the summed totals do.
    fn sync_scores(&mut self) {
        for (player_id, score) in &mut self.scores {
            if let Some(&entity) = self.player_entities.get(player_id) {
                if let Some(ecs_score) = self.world.get::<ScoreComp>(entity) {
                    score.game_duration_secs = self.elapsed;
                    score.total_points = ecs_score.total;
                    score.kills = ecs_score.kills;
                    let death_diff = ecs_score.deaths.saturating_sub(score.deaths);
                    for _ in 0..death_diff {
                        score.record_death();
                    }
                }
            }
        }
    }

    pub fn take_spawned_missiles(&mut self) -> Vec<MissileSpawnedEvent> {
        std::mem::take(&mut self.pending_spawns)
    }

    /// Drains this tick's kills, for `rtype-server` to translate into
    /// `Event::EnemyKilled` broadcasts.
    pub fn take_kill_events(&mut self) -> Vec<KillEvent> {
        std::mem::take(&mut self.pending_kills)
    }

    /// Drains this tick's power-up pickups, for `rtype-server` to translate
    /// into `Event::PowerUpCollected` broadcasts.
    pub fn take_pickup_events(&mut self) -> Vec<PowerUpCollectedEvent> {
        std::mem::take(&mut self.pending_pickups)
    }

    pub fn boss_phase(&self) -> Option<rtype_domain::types::BossPhase> {
        self.boss.as_ref().map(|b| b.phase)
    }

    const SNAPSHOT_GROUPS: &'static [(EntityGroup, SnapshotKind)] = &[
        (EntityGroup::Players, SnapshotKind::Player),
        (EntityGroup::Enemies, SnapshotKind::Enemy),
        (EntityGroup::Missiles, SnapshotKind::PlayerMissile),
        (EntityGroup::EnemyMissiles, SnapshotKind::EnemyMissile),
        (EntityGroup::PowerUps, SnapshotKind::PowerUp),
        (EntityGroup::WaveCannons, SnapshotKind::WaveCannon),
        (EntityGroup::ForcePods, SnapshotKind::ForcePod),
        (EntityGroup::BitDevices, SnapshotKind::BitDevice),
    ];

    pub fn get_snapshot(&self) -> WorldSnapshot {
        let mut entities = Vec::new();
        for &(group, kind) in Self::SNAPSHOT_GROUPS {
            for entity in self.world.group_members(group) {
                let Some(pos) = self.world.get::<PositionComp>(entity) else { continue };
                let vel = self.world.get::<VelocityComp>(entity).copied().unwrap_or(VelocityComp { x: 0.0, y: 0.0 });
                let (health, max_health, invulnerable) = self
                    .world
                    .get::<HealthComp>(entity)
                    .map(|h| (h.current, h.max, h.invulnerable))
                    .unwrap_or((0, 0, false));
                entities.push(EntitySnapshot {
                    entity,
                    kind,
                    x: pos.x,
                    y: pos.y,
                    vx: vel.x,
                    vy: vel.y,
                    health,
                    max_health,
                    invulnerable,
                });
            }
        }
        let boss = self.boss.as_ref().map(|b| BossSnapshot {
            x: b.x,
            y: b.y,
            health: b.health,
            max_health: b.max_health,
            phase: b.phase,
        });
        WorldSnapshot { entities, boss }
    }

    pub fn player_score(&self, player_id: u32) -> Option<&PlayerScore> {
        self.scores.get(&player_id)
    }
}

/// `Rng::gen_range` needs a `Range`, not a bare length; this keeps call
/// sites that just want "a random index into a slice of this length"
/// terse.
trait RngExt {
    fn gen_range_ext(&mut self, len: usize) -> usize;
}

impl<R: rand::Rng> RngExt for R {
    fn gen_range_ext(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_player_respects_room_capacity() {
        let mut world = GameWorld::new("room1", 1, 1, RoomSettings::default());
        assert!(world.add_player(1).is_ok());
        assert_eq!(world.add_player(2), Err(RoomError::RoomFull("room1".to_string())));
    }

    #[test]
    fn stale_input_sequence_is_ignored() {
        let mut world = GameWorld::new("room1", 4, 1, RoomSettings::default());
        world.add_player(1).unwrap();
        world.apply_player_input(1, 5, true, false, false, false);
        world.apply_player_input(1, 3, false, true, false, false);
        assert_eq!(world.get_player_last_input_seq(1), Some(5));
    }

    #[test]
    fn tick_moves_player_after_input() {
        let mut world = GameWorld::new("room1", 4, 1, RoomSettings::default());
        let entity = world.add_player(1).unwrap();
        world.apply_player_input(1, 1, false, false, false, true);
        let before = world.world.get::<PositionComp>(entity).unwrap().x;
        world.tick(1.0 / 60.0);
        let after = world.world.get::<PositionComp>(entity).unwrap().x;
        assert!(after > before);
    }

    #[test]
    fn boss_spawns_on_tenth_wave() {
        let mut world = GameWorld::new("room1", 4, 7, RoomSettings::default());
        for _ in 0..2000 {
            world.wave_spawner.force_next_tick();
            world.tick(0.001);
            if world.boss.is_some() {
                break;
            }
        }
        assert!(world.boss.is_some());
    }

    #[test]
    fn missile_overlapping_boss_deals_damage_and_is_consumed() {
        let mut world = GameWorld::new("room1", 4, 1, RoomSettings::default());
        world.boss = Some(BossState::new(1, 0));
        let boss_pos = (world.boss.as_ref().unwrap().x, world.boss.as_ref().unwrap().y);
        let health_before = world.boss.as_ref().unwrap().health;

        let missile = world.world.spawn();
        world.world.insert(missile, PositionComp { x: boss_pos.0, y: boss_pos.1 });
        world.world.insert(
            missile,
            HitboxComp { width: 16.0, height: 8.0, offset_x: 0.0, offset_y: 0.0 },
        );
        world.world.insert(
            missile,
            MissileTag {
                weapon_type: WeaponType::Standard,
                base_damage: 25,
                is_homing: false,
                target_id: None,
            },
        );
        world.world.join_group(missile, EntityGroup::Missiles);

        world.check_boss_collisions();

        assert_eq!(world.boss.as_ref().unwrap().health, health_before - 25);
        assert!(!world.world.is_alive(missile));
    }

    #[test]
    fn snapshot_includes_player_and_boss() {
        let mut world = GameWorld::new("room1", 4, 1, RoomSettings::default());
        world.add_player(1).unwrap();
        world.boss = Some(BossState::new(1, 0));
        let snapshot = world.get_snapshot();
        assert!(snapshot.entities.iter().any(|e| e.kind == SnapshotKind::Player));
        assert!(snapshot.boss.is_some());
    }
}
