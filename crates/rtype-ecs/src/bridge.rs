//! Adapter between the ECS systems and the stateless domain rules.
//!
//! Systems never call `rtype_domain` directly; they go through
//! `DomainBridge` so the domain crate stays ignorant of the ECS and the
//! ECS stays ignorant of gameplay arithmetic.

use rtype_domain::prelude::*;
use rtype_domain::types::{EnemyType, WeaponType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub actual_damage: u16,
    pub died: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DomainBridge;

impl DomainBridge {
    pub fn apply_damage(&self, current_hp: u16, damage: u16) -> DamageResult {
        let new_hp = GameRule::apply_damage(current_hp, damage);
        DamageResult {
            actual_damage: current_hp - new_hp,
            died: new_hp == 0,
        }
    }

    pub fn would_die(&self, current_hp: u16, damage: u16) -> bool {
        GameRule::should_entity_die(current_hp, damage)
    }

    pub fn calculate_kill_score(&self, enemy_type: EnemyType, combo_multiplier: f32) -> u32 {
        GameRule::apply_combo_bonus(GameRule::enemy_point_value(enemy_type), combo_multiplier)
    }

    pub fn get_enemy_points(&self, enemy_type: EnemyType) -> u16 {
        GameRule::enemy_point_value(enemy_type)
    }

    pub fn increment_combo(&self, current: f32) -> f32 {
        GameRule::increment_combo(current)
    }

    pub fn decay_combo(&self, current: f32, delta_time: f32, time_since_kill: f32) -> f32 {
        GameRule::decay_combo(current, delta_time, time_since_kill)
    }

    pub fn get_combo_grace_time(&self) -> f32 {
        GameRule::combo_grace_time()
    }

    pub fn get_missile_damage(&self, weapon_type: WeaponType, level: u8) -> u8 {
        GameRule::missile_damage(weapon_type, level)
    }

    pub fn get_missile_speed(&self, weapon_type: WeaponType, level: u8) -> f32 {
        GameRule::missile_speed(weapon_type, level)
    }

    pub fn get_weapon_cooldown(&self, weapon_type: WeaponType, level: u8) -> f32 {
        GameRule::weapon_cooldown(weapon_type, level)
    }

    pub fn get_player_speed(&self, speed_level: u8) -> f32 {
        GameRule::player_base_speed() * GameRule::player_speed_multiplier(speed_level)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn check_collision(
        &self,
        x1: f32,
        y1: f32,
        w1: f32,
        h1: f32,
        x2: f32,
        y2: f32,
        w2: f32,
        h2: f32,
    ) -> bool {
        CollisionRule::aabb(x1, y1, w1, h1, x2, y2, w2, h2)
    }

    pub fn is_out_of_bounds(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        CollisionRule::is_out_of_bounds(x, y, w, h)
    }

    pub fn clamp_to_screen(&self, x: &mut f32, y: &mut f32, w: f32, h: f32) {
        CollisionRule::clamp_to_screen(x, y, w, h)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_enemy_movement(
        &self,
        enemy_type: EnemyType,
        current_y: f32,
        base_y: f32,
        alive_time: f32,
        phase_offset: f32,
        delta_time: f32,
        target_y: f32,
        zigzag: &mut ZigzagState,
    ) -> EnemyMovement {
        EnemyBehavior::calculate_movement(
            enemy_type,
            current_y,
            base_y,
            alive_time,
            phase_offset,
            delta_time,
            target_y,
            zigzag,
        )
    }

    pub fn can_enemy_shoot(&self, shoot_cooldown: f32) -> bool {
        EnemyBehavior::can_shoot(shoot_cooldown)
    }

    pub fn get_enemy_shoot_interval(&self, enemy_type: EnemyType) -> f32 {
        GameRule::enemy_shoot_interval(enemy_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_damage_reports_actual_and_death() {
        let bridge = DomainBridge;
        let r = bridge.apply_damage(10, 15);
        assert_eq!(r.actual_damage, 10);
        assert!(r.died);

        let r = bridge.apply_damage(10, 4);
        assert_eq!(r.actual_damage, 4);
        assert!(!r.died);
    }
}
