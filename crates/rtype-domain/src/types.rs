//! Shared enums used by the domain services and, transitively, by every
//! layer above them.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Values double as indices into the per-type constant
/// tables in [`crate::constants::enemy`] and [`crate::constants::score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyType {
    Basic = 0,
    Tracker = 1,
    Zigzag = 2,
    Fast = 3,
    Bomber = 4,
    Armored = 5,
}

impl EnemyType {
    pub const ALL: [EnemyType; 6] = [
        EnemyType::Basic,
        EnemyType::Tracker,
        EnemyType::Zigzag,
        EnemyType::Fast,
        EnemyType::Bomber,
        EnemyType::Armored,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(EnemyType::Basic),
            1 => Some(EnemyType::Tracker),
            2 => Some(EnemyType::Zigzag),
            3 => Some(EnemyType::Fast),
            4 => Some(EnemyType::Bomber),
            5 => Some(EnemyType::Armored),
            _ => None,
        }
    }
}

/// Player weapon type. Values double as indices into
/// [`crate::constants::weapon`] tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeaponType {
    Standard = 0,
    Spread = 1,
    Laser = 2,
    Homing = 3,
}

impl WeaponType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(WeaponType::Standard),
            1 => Some(WeaponType::Spread),
            2 => Some(WeaponType::Laser),
            3 => Some(WeaponType::Homing),
            _ => None,
        }
    }

    /// `(current + delta) mod 4`, wrapping both directions.
    pub fn cycle(self, delta: i8) -> Self {
        let len = 4i8;
        let idx = ((self as i8 + delta) % len + len) % len;
        WeaponType::from_u8(idx as u8).expect("cycle stays within 0..4")
    }
}

/// Power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpType {
    Health = 0,
    SpeedUp = 1,
    WeaponCrystal = 2,
    ForcePod = 3,
    BitDevice = 4,
}

impl PowerUpType {
    pub const ALL: [PowerUpType; 5] = [
        PowerUpType::Health,
        PowerUpType::SpeedUp,
        PowerUpType::WeaponCrystal,
        PowerUpType::ForcePod,
        PowerUpType::BitDevice,
    ];
}

/// Boss encounter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BossPhase {
    One = 0,
    Two = 1,
    Three = 2,
}

/// Boss attack pattern, rotated through by `attack_pattern_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAttack {
    Idle,
    LinearShot,
    SpreadShot,
    LaserWarn,
    LaserFire,
    Dash,
    SpawnMinions,
    Teleport,
    HomingSwarm,
}

/// Boss movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMovement {
    Hover,
    Dashing,
    Teleporting,
}
