//! Game balance constants.
//!
//! Mirrors the namespace layout of the original domain constants table:
//! one module per gameplay subsystem, grouped the same way a designer
//! would tune them.

/// Screen / world bounds (game-space, not a rendering resolution).
pub mod world {
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;
}

/// Player ship movement and defaults.
pub mod player {
    pub const MOVE_SPEED: f32 = 200.0;
    pub const SHIP_WIDTH: f32 = 64.0;
    pub const SHIP_HEIGHT: f32 = 30.0;
    pub const DEFAULT_HEALTH: u16 = 100;

    /// Indexed by speed level 0..=3.
    pub const SPEED_MULT: [f32; 4] = [1.0, 1.3, 1.6, 1.9];
}

/// Score, kills and combo arithmetic.
pub mod score {
    /// Indexed by `EnemyType as usize` (Basic, Tracker, Zigzag, Fast, Bomber, Armored).
    pub const POINTS: [u16; 6] = [100, 150, 120, 180, 250, 200];
    pub const POINTS_BOSS: u16 = 5000;
    pub const POINTS_WAVE_BONUS: u16 = 500;

    pub const COMBO_GRACE_TIME: f32 = 3.0;
    pub const COMBO_DECAY_RATE: f32 = 0.5;
    pub const COMBO_INCREMENT: f32 = 0.1;
    pub const COMBO_MAX: f32 = 3.0;
}

/// Weapon base stats and per-level multipliers.
///
/// The spawn offset used by `WeaponSystem` is `(50.0, 0.0)`, not the
/// `(64.0, 15.0)` offset below. The constants are kept here for
/// traceability to the source balance table; see `WeaponSystem::spawn_missile`.
pub mod weapon {
    pub const MISSILE_WIDTH: f32 = 16.0;
    pub const MISSILE_HEIGHT: f32 = 8.0;
    /// Historical spawn offset from the reference implementation; superseded
    /// by the scenario-derived `(50.0, 0.0)` offset actually used at runtime.
    pub const LEGACY_SPAWN_OFFSET: (f32, f32) = (64.0, 15.0);

    /// Indexed by `WeaponType as usize` (Standard, Spread, Laser, Homing).
    pub const SPEED0: [f32; 4] = [600.0, 550.0, 900.0, 350.0];
    pub const DAMAGE0: [u8; 4] = [20, 8, 12, 50];
    pub const COOLDOWN0: [f32; 4] = [0.3, 0.4, 0.18, 0.7];

    /// Indexed by weapon level 0..=3, percent.
    pub const DAMAGE_MULT_PCT: [u16; 4] = [100, 115, 130, 150];
    pub const COOLDOWN_MULT_PCT: [u16; 4] = [100, 95, 90, 85];
    pub const SPEED_MULT_PCT: [u16; 4] = [100, 100, 100, 110];

    pub const MISSILE_LIFETIME: f32 = 10.0;
    pub const SPREAD_ANGLE_DEG: f32 = 15.0;
}

/// Enemy archetypes.
pub mod enemy {
    pub const WIDTH: f32 = 40.0;
    pub const HEIGHT: f32 = 40.0;

    /// Indexed by `EnemyType as usize`.
    pub const SPEED_X: [f32; 6] = [-120.0, -100.0, -140.0, -220.0, -80.0, -90.0];
    pub const SHOOT_INTERVAL: [f32; 6] = [2.5, 2.0, 3.0, 1.5, 1.0, 4.0];
    pub const HEALTH: [u16; 6] = [40, 35, 30, 25, 80, 60];

    pub const AMPLITUDE: f32 = 80.0;
    pub const FREQUENCY: f32 = 1.8;
    pub const ZIGZAG_SPEED_Y: f32 = 300.0;
    pub const ZIGZAG_INTERVAL: f32 = 0.8;
    pub const TRACKER_SPEED_Y: f32 = 150.0;

    pub const ENEMY_MISSILE_DAMAGE: u8 = 15;
    pub const MISSILE_SPAWN_OFFSET_X: f32 = -30.0;
}

/// Boss fight tuning.
pub mod boss {
    pub const SPAWN_WAVE: u16 = 10;
    pub const MAX_HEALTH: u16 = 1500;
    pub const HP_PER_DEFEAT: u16 = 500;
    pub const HP_PER_EXTRA_PLAYER: u16 = 1000;

    pub const PHASE2_THRESHOLD: f32 = 0.65;
    pub const PHASE3_THRESHOLD: f32 = 0.30;

    pub const WIDTH: f32 = 150.0;
    pub const HEIGHT: f32 = 120.0;
    pub const MOVE_SPEED: f32 = 150.0;
    pub const DASH_SPEED: f32 = 800.0;

    pub const CHARGE_TIME: f32 = 1.5;
    pub const LASER_WARN_TIME: f32 = 1.0;
    pub const LASER_DURATION: f32 = 2.0;
    /// Indexed by phase 0..=2 (P1, P2, P3).
    pub const ATTACK_INTERVAL: [f32; 3] = [2.0, 1.5, 1.0];

    pub const MAX_MINIONS_P2: u8 = 4;
    pub const MAX_MINIONS_P3: u8 = 8;
    pub const MINION_SPAWN_INTERVAL: f32 = 5.0;
}

/// Wave Cannon (charged beam) stats.
pub mod wavecannon {
    pub const SPEED: f32 = 900.0;
    pub const LENGTH: f32 = 60.0;
    pub const LIFETIME: f32 = 2.0;

    /// Indexed by charge level - 1 (0 => level 1, ..., 2 => level 3).
    pub const CHARGE_TIME: [f32; 3] = [0.6, 1.3, 2.2];
    pub const DAMAGE: [u16; 3] = [50, 100, 250];
    pub const WIDTH: [f32; 3] = [20.0, 35.0, 55.0];
}

/// Power-up drops.
pub mod powerup {
    pub const MAX_LIFETIME: f32 = 10.0;
    pub const WIDTH: f32 = 24.0;
    pub const HEIGHT: f32 = 24.0;
    pub const DRIFT_SPEED: f32 = -30.0;

    pub const DROP_CHANCE_PCT: u8 = 8;
    pub const ARMORED_DROP_CHANCE_PCT: u8 = 50;
    pub const ARMORED_SPAWN_INTERVAL: f32 = 25.0;
    pub const HEAL_AMOUNT: u16 = 50;
}

/// Force Pod companion satellite.
pub mod forcepod {
    pub const WIDTH: f32 = 32.0;
    pub const HEIGHT: f32 = 32.0;
    pub const SPEED: f32 = 400.0;
    pub const ATTACH_OFFSET_X: f32 = 50.0;
    pub const CONTACT_DAMAGE: u16 = 30;
    pub const HIT_COOLDOWN: f32 = 0.5;
    pub const SHOOT_COOLDOWN: f32 = 0.35;
}

/// Bit Device companion satellites (two per owner, orbiting).
pub mod bitdevice {
    pub const WIDTH: f32 = 24.0;
    pub const HEIGHT: f32 = 24.0;
    pub const ORBIT_RADIUS: f32 = 50.0;
    /// Radians per second.
    pub const ORBIT_SPEED: f32 = 3.0;
    pub const SHOOT_COOLDOWN: f32 = 0.4;
    pub const CONTACT_DAMAGE: u16 = 15;
    pub const HIT_COOLDOWN: f32 = 0.5;
}

/// Enemy wave spawner cadence.
pub mod wave {
    pub const INTERVAL_MIN: f32 = 6.0;
    pub const INTERVAL_MAX: f32 = 12.0;
    pub const ENEMIES_PER_WAVE_MIN: u8 = 2;
    pub const ENEMIES_PER_WAVE_MAX: u8 = 6;
    pub const SPAWN_X: f32 = 1950.0;
    pub const SPAWN_Y_MIN: f32 = 100.0;
    pub const SPAWN_Y_MAX: f32 = 900.0;
    pub const SPAWN_DELAY_MIN: f32 = 0.3;
    pub const SPAWN_DELAY_MAX: f32 = 1.2;
}
