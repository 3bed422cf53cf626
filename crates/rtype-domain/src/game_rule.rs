//! Damage, score, combo and weapon/enemy stat arithmetic.
//!
//! Every method here is a pure function of its arguments: no field on
//! [`GameRule`] is ever mutated. The struct exists only to give the
//! lookups a natural call site (`GameRule::missile_damage(...)`) and to
//! mirror the service boundary the ECS layer talks to through
//! `DomainBridge`.

use crate::constants::{boss, enemy, player, score, wavecannon, weapon};
use crate::types::{EnemyType, WeaponType};

#[derive(Debug, Default, Clone, Copy)]
pub struct GameRule;

impl GameRule {
    /// Final missile damage for a weapon type and upgrade level (0..=3).
    pub fn missile_damage(weapon_type: WeaponType, level: u8) -> u8 {
        let level = level.min(3) as usize;
        let base = weapon::DAMAGE0[weapon_type as usize] as u32;
        let pct = weapon::DAMAGE_MULT_PCT[level] as u32;
        ((base * pct) / 100) as u8
    }

    /// Final missile travel speed (px/s) for a weapon type and level.
    pub fn missile_speed(weapon_type: WeaponType, level: u8) -> f32 {
        let level = level.min(3) as usize;
        let base = weapon::SPEED0[weapon_type as usize];
        let pct = weapon::SPEED_MULT_PCT[level] as f32 / 100.0;
        base * pct
    }

    /// Final weapon cooldown (seconds) for a weapon type and level.
    pub fn weapon_cooldown(weapon_type: WeaponType, level: u8) -> f32 {
        let level = level.min(3) as usize;
        let base = weapon::COOLDOWN0[weapon_type as usize];
        let pct = weapon::COOLDOWN_MULT_PCT[level] as f32 / 100.0;
        base * pct
    }

    /// Base score points for an enemy type.
    pub fn enemy_point_value(enemy_type: EnemyType) -> u16 {
        score::POINTS[enemy_type as usize]
    }

    /// `round(base * combo)`, truncating toward zero (matches the
    /// reference implementation's integer cast, not a rounded value).
    pub fn apply_combo_bonus(base_points: u16, combo_multiplier: f32) -> u32 {
        (base_points as f32 * combo_multiplier) as u32
    }

    /// Combo multiplier after a kill, capped at [`score::COMBO_MAX`].
    pub fn increment_combo(current: f32) -> f32 {
        (current + score::COMBO_INCREMENT).min(score::COMBO_MAX)
    }

    /// Grace-period combo decay: unchanged inside the grace window, then
    /// linear decay toward 1.0.
    pub fn decay_combo(current: f32, delta_time: f32, time_since_kill: f32) -> f32 {
        if time_since_kill < score::COMBO_GRACE_TIME {
            return current;
        }
        (current - score::COMBO_DECAY_RATE * delta_time).max(1.0)
    }

    pub fn combo_grace_time() -> f32 {
        score::COMBO_GRACE_TIME
    }

    /// True if `damage` would bring `hp` to zero or below.
    pub fn should_entity_die(hp: u16, damage: u16) -> bool {
        damage >= hp
    }

    /// New HP after damage, floored at zero (never underflows).
    pub fn apply_damage(hp: u16, damage: u16) -> u16 {
        hp.saturating_sub(damage)
    }

    pub fn player_speed_multiplier(speed_level: u8) -> f32 {
        player::SPEED_MULT[speed_level.min(3) as usize]
    }

    pub fn player_base_speed() -> f32 {
        player::MOVE_SPEED
    }

    pub fn enemy_health(enemy_type: EnemyType) -> u16 {
        enemy::HEALTH[enemy_type as usize]
    }

    pub fn enemy_speed_x(enemy_type: EnemyType) -> f32 {
        enemy::SPEED_X[enemy_type as usize]
    }

    pub fn enemy_shoot_interval(enemy_type: EnemyType) -> f32 {
        enemy::SHOOT_INTERVAL[enemy_type as usize]
    }

    /// `level` is 1..=3.
    pub fn wave_cannon_damage(level: u8) -> u16 {
        wavecannon::DAMAGE[(level.clamp(1, 3) - 1) as usize]
    }

    /// `level` is 1..=3.
    pub fn wave_cannon_width(level: u8) -> f32 {
        wavecannon::WIDTH[(level.clamp(1, 3) - 1) as usize]
    }

    pub fn boss_max_health(player_count: u8, defeat_count: u16) -> u32 {
        let extra_players = player_count.saturating_sub(1) as u32;
        boss::MAX_HEALTH as u32
            + boss::HP_PER_DEFEAT as u32 * defeat_count as u32
            + boss::HP_PER_EXTRA_PLAYER as u32 * extra_players
    }

    /// Whether the boss should transition into `to_phase` given its
    /// current HP ratio. `to_phase` is 2 or 3.
    pub fn should_boss_change_phase(hp: u32, max_hp: u32, to_phase: u8) -> bool {
        if max_hp == 0 {
            return false;
        }
        let ratio = hp as f32 / max_hp as f32;
        match to_phase {
            2 => ratio <= boss::PHASE2_THRESHOLD,
            3 => ratio <= boss::PHASE3_THRESHOLD,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missile_damage_monotone_in_level() {
        for wt in [
            WeaponType::Standard,
            WeaponType::Spread,
            WeaponType::Laser,
            WeaponType::Homing,
        ] {
            let mut last = 0u8;
            for level in 0..=3u8 {
                let dmg = GameRule::missile_damage(wt, level);
                assert!(dmg >= last, "damage should be monotone non-decreasing");
                last = dmg;
            }
        }
    }

    #[test]
    fn increment_combo_caps_at_max() {
        assert!((GameRule::increment_combo(2.95) - 3.0).abs() < 1e-4);
        assert_eq!(GameRule::increment_combo(3.0), 3.0);
        assert_eq!(GameRule::increment_combo(3.5), 3.0);
    }

    #[test]
    fn decay_combo_holds_during_grace() {
        let c = GameRule::decay_combo(2.0, 0.1, 0.5);
        assert_eq!(c, 2.0);
    }

    #[test]
    fn decay_combo_decays_after_grace_and_clamps() {
        let c = GameRule::decay_combo(2.0, 2.0, 3.5);
        assert!((c - 1.0).abs() < 1e-4, "should clamp to 1.0: got {c}");
    }

    #[test]
    fn apply_damage_never_underflows() {
        assert_eq!(GameRule::apply_damage(10, 50), 0);
        assert_eq!(GameRule::apply_damage(10, 10), 0);
        assert_eq!(GameRule::apply_damage(10, 9), 1);
    }

    #[test]
    fn should_entity_die_matches_apply_damage_zero() {
        assert!(GameRule::should_entity_die(10, 10));
        assert_eq!(GameRule::apply_damage(10, 10), 0);
        assert!(!GameRule::should_entity_die(10, 9));
        assert_ne!(GameRule::apply_damage(10, 9), 0);
    }

    #[test]
    fn boss_max_health_scales_with_players_and_defeats() {
        assert_eq!(GameRule::boss_max_health(1, 0), 1500);
        assert_eq!(GameRule::boss_max_health(2, 0), 2500);
        assert_eq!(GameRule::boss_max_health(1, 1), 2000);
        assert_eq!(GameRule::boss_max_health(4, 2), 1500 + 1000 + 3000);
    }

    #[test]
    fn apply_combo_bonus_truncates() {
        // 100 * 1.99 = 199.0 exactly representable; use a case that forces truncation.
        assert_eq!(GameRule::apply_combo_bonus(100, 1.999), 199);
        assert_eq!(GameRule::apply_combo_bonus(10, 1.05), 10);
    }

    proptest! {
        #[test]
        fn prop_apply_damage_never_negative(hp in 0u16..=5000, dmg in 0u16..=5000) {
            let result = GameRule::apply_damage(hp, dmg);
            prop_assert!(result <= hp);
            prop_assert_eq!(GameRule::should_entity_die(hp, dmg), result == 0);
        }

        #[test]
        fn prop_increment_combo_idempotent_at_cap(c in 3.0f32..10.0) {
            prop_assert_eq!(GameRule::increment_combo(c), 3.0);
        }
    }
}
