//! Per-type enemy movement integration.

use crate::constants::{enemy, world};
use crate::types::EnemyType;

/// Mutable zigzag timer/direction state, threaded through
/// [`EnemyBehavior::calculate_movement`] calls for Zigzag-type enemies.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZigzagState {
    pub timer: f32,
    pub going_up: bool,
}

/// Result of one movement integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyMovement {
    pub dx: f32,
    pub new_y: f32,
    pub new_base_y: f32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnemyBehavior;

impl EnemyBehavior {
    /// Integrate one step of enemy movement.
    ///
    /// `current_y`/`base_y`/`phase_offset` are the entity's current state;
    /// `target_y` is the nearest player's Y (or screen-center fallback).
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_movement(
        enemy_type: EnemyType,
        current_y: f32,
        base_y: f32,
        alive_time: f32,
        phase_offset: f32,
        delta_time: f32,
        target_y: f32,
        zigzag: &mut ZigzagState,
    ) -> EnemyMovement {
        let dx = Self::horizontal_movement(enemy_type, delta_time);
        let mut new_base_y = base_y;

        let new_y = match enemy_type {
            EnemyType::Basic | EnemyType::Armored => {
                Self::basic_y(base_y, alive_time, phase_offset, 1.0, 1.0)
            }
            EnemyType::Fast => Self::basic_y(base_y, alive_time, phase_offset, 0.6, 2.5),
            EnemyType::Bomber => {
                new_base_y += 10.0 * delta_time;
                Self::basic_y(new_base_y, alive_time, phase_offset, 0.3, 0.5)
            }
            EnemyType::Tracker => Self::tracker_y(current_y, target_y, delta_time),
            EnemyType::Zigzag => Self::zigzag_movement(current_y, delta_time, zigzag),
        };

        EnemyMovement {
            dx,
            new_y: new_y.clamp(0.0, world::SCREEN_HEIGHT - 40.0),
            new_base_y: new_base_y.clamp(100.0, 900.0),
        }
    }

    pub fn horizontal_movement(enemy_type: EnemyType, delta_time: f32) -> f32 {
        enemy::SPEED_X[enemy_type as usize] * delta_time
    }

    pub fn can_shoot(shoot_cooldown: f32) -> bool {
        shoot_cooldown <= 0.0
    }

    pub fn movement_amplitude() -> f32 {
        enemy::AMPLITUDE
    }

    pub fn movement_frequency() -> f32 {
        enemy::FREQUENCY
    }

    pub fn should_zigzag_flip(timer: f32) -> bool {
        timer >= enemy::ZIGZAG_INTERVAL
    }

    pub fn zigzag_interval() -> f32 {
        enemy::ZIGZAG_INTERVAL
    }

    pub fn zigzag_speed() -> f32 {
        enemy::ZIGZAG_SPEED_Y
    }

    pub fn tracker_speed() -> f32 {
        enemy::TRACKER_SPEED_Y
    }

    fn basic_y(base_y: f32, alive_time: f32, phase_offset: f32, amp_scale: f32, freq_scale: f32) -> f32 {
        let amplitude = enemy::AMPLITUDE * amp_scale;
        let frequency = enemy::FREQUENCY * freq_scale;
        base_y + amplitude * (frequency * alive_time + phase_offset).sin()
    }

    /// Steps toward `target_y`, snapping exactly onto it if within reach
    /// this frame (prevents overshoot oscillation).
    fn tracker_y(current_y: f32, target_y: f32, delta_time: f32) -> f32 {
        let max_step = enemy::TRACKER_SPEED_Y * delta_time;
        let diff = target_y - current_y;
        if diff.abs() <= max_step {
            target_y
        } else {
            current_y + max_step * diff.signum()
        }
    }

    fn zigzag_movement(current_y: f32, delta_time: f32, state: &mut ZigzagState) -> f32 {
        state.timer += delta_time;
        if Self::should_zigzag_flip(state.timer) {
            state.timer = 0.0;
            state.going_up = !state.going_up;
        }
        let direction = if state.going_up { -1.0 } else { 1.0 };
        current_y + direction * enemy::ZIGZAG_SPEED_Y * delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_snaps_when_within_reach() {
        let y = EnemyBehavior::tracker_y(300.0, 301.0, 1.0 / 60.0);
        assert_eq!(y, 301.0);
    }

    #[test]
    fn tracker_steps_toward_target_otherwise() {
        let y = EnemyBehavior::tracker_y(0.0, 1000.0, 1.0 / 60.0);
        assert!(y > 0.0 && y < 1000.0);
    }

    #[test]
    fn zigzag_flips_after_interval() {
        let mut state = ZigzagState {
            timer: 0.0,
            going_up: true,
        };
        EnemyBehavior::zigzag_movement(300.0, 0.9, &mut state);
        assert!(!state.going_up);
        assert_eq!(state.timer, 0.0);
    }

    #[test]
    fn basic_enemy_y_clamped_to_screen() {
        let mut zz = ZigzagState::default();
        let m = EnemyBehavior::calculate_movement(
            EnemyType::Basic,
            -500.0,
            -500.0,
            0.0,
            0.0,
            1.0 / 60.0,
            300.0,
            &mut zz,
        );
        assert!(m.new_y >= 0.0);
    }

    #[test]
    fn bomber_base_y_drifts_and_clamps() {
        let mut zz = ZigzagState::default();
        let m = EnemyBehavior::calculate_movement(
            EnemyType::Bomber,
            500.0,
            895.0,
            0.0,
            0.0,
            1.0,
            300.0,
            &mut zz,
        );
        assert!(m.new_base_y <= 900.0);
    }

    #[test]
    fn enemies_always_move_left() {
        for et in EnemyType::ALL {
            assert!(EnemyBehavior::horizontal_movement(et, 1.0) < 0.0);
        }
    }
}
