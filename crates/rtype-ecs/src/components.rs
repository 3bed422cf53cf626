//! Plain-data gameplay components.
//!
//! One struct per component type, one-to-one with the original component
//! headers. No behavior lives here; systems read and mutate these through
//! [`crate::world::World`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rtype_domain::types::{EnemyType, PowerUpType, WeaponType};

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionComp {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityComp {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxComp {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthComp {
    pub current: u16,
    pub max: u16,
    pub invulnerable: bool,
}

impl HealthComp {
    pub fn full(max: u16) -> Self {
        Self {
            current: max,
            max,
            invulnerable: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTag {
    pub player_id: u32,
    pub ship_skin: u8,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTag {
    pub enemy_type: EnemyType,
    pub points: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyAIComp {
    pub shoot_cooldown: f32,
    pub shoot_interval: f32,
    pub base_y: f32,
    pub alive_time: f32,
    pub phase_offset: f32,
    pub target_y: f32,
    pub zigzag_timer: f32,
    pub zigzag_going_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileTag {
    pub weapon_type: WeaponType,
    pub base_damage: u8,
    pub is_homing: bool,
    pub target_id: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnerComp {
    pub owner_id: EntityId,
    pub is_player_owned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifetimeComp {
    pub remaining: f32,
    pub total: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTag {
    pub power_up_type: PowerUpType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLevelComp {
    pub level: u8,
}

impl SpeedLevelComp {
    pub fn is_max_level(&self) -> bool {
        self.level >= 3
    }

    pub fn upgrade(&mut self) {
        if !self.is_max_level() {
            self.level += 1;
        }
    }
}

/// Per-weapon upgrade level, indexed by `WeaponType as usize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponComp {
    pub current_type: WeaponType,
    pub shoot_cooldown: f32,
    pub is_charging: bool,
    pub charge_time: f32,
    pub weapon_levels: [u8; 4],
}

impl WeaponComp {
    pub fn new() -> Self {
        Self {
            current_type: WeaponType::Standard,
            shoot_cooldown: 0.0,
            is_charging: false,
            charge_time: 0.0,
            weapon_levels: [0; 4],
        }
    }

    pub fn current_level(&self) -> u8 {
        self.weapon_levels[self.current_type as usize]
    }

    pub fn upgrade_current_weapon(&mut self) {
        let slot = &mut self.weapon_levels[self.current_type as usize];
        *slot = (*slot + 1).min(3);
    }
}

impl Default for WeaponComp {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveCannonTag {
    pub charge_level: u8,
    pub width: f32,
}

/// Entities a piercing wave-cannon beam has already damaged, so repeated
/// overlap in later ticks does not double-hit the same enemy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitEnemies(pub std::collections::HashSet<EntityId>);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComp {
    pub total: u32,
    pub kills: u32,
    pub combo_multiplier: f32,
    pub combo_timer: f32,
    pub max_combo: f32,
    pub deaths: u32,
}

impl Default for ScoreComp {
    fn default() -> Self {
        Self {
            total: 0,
            kills: 0,
            combo_multiplier: 1.0,
            combo_timer: 0.0,
            max_combo: 1.0,
            deaths: 0,
        }
    }
}

/// Per-target hit cooldowns for contact-damage companions (Force Pod, Bit
/// Device), bounding how often the same enemy can be hit per second.
#[derive(Debug, Clone, Default)]
pub struct HitCooldowns(pub HashMap<EntityId, f32>);

impl HitCooldowns {
    pub fn tick(&mut self, delta_time: f32) {
        for v in self.0.values_mut() {
            *v = (*v - delta_time).max(0.0);
        }
        self.0.retain(|_, v| *v > 0.0);
    }

    pub fn is_ready(&self, target: EntityId) -> bool {
        !self.0.contains_key(&target)
    }

    pub fn mark_hit(&mut self, target: EntityId, cooldown: f32) {
        self.0.insert(target, cooldown);
    }
}

/// Force Pod companion satellite, attached at a fixed offset from its owner.
/// `level` tracks stacked pickups (caps at 3, mirrors `WeaponComp`'s cap);
/// `shoot_cooldown` gates its own companion-missile cadence, independent of
/// the owning player's weapon cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcePodTag {
    pub level: u8,
    pub shoot_cooldown: f32,
}

/// Bit Device companion, orbiting its owner at `orbit_angle` radians.
/// `slot` (0 or 1, one owner has at most two) offsets the orbit so the pair
/// sits on opposite sides; `shoot_cooldown` gates its own auto-fire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitDeviceTag {
    pub orbit_angle: f32,
    pub slot: u8,
    pub shoot_cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossTag;
