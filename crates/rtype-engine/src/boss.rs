//! Boss encounter state machine.
//!
//! Grounded on `GameWorld.hpp`'s boss fields: phase transitions are
//! HP-ratio gated (`GameRule::should_boss_change_phase`), and each phase
//! rotates through a fixed attack list on `ATTACK_INTERVAL[phase]`
//! cadence. Movement (`Hover`/`Dashing`/`Teleporting`) is driven by the
//! currently active attack rather than tracked independently.

use rtype_domain::constants::boss;
use rtype_domain::prelude::GameRule;
use rtype_domain::types::{BossAttack, BossMovement, BossPhase};

const PHASE1_ATTACKS: &[BossAttack] = &[BossAttack::LinearShot, BossAttack::SpreadShot];
const PHASE2_ATTACKS: &[BossAttack] = &[
    BossAttack::SpreadShot,
    BossAttack::LaserWarn,
    BossAttack::LaserFire,
    BossAttack::Dash,
    BossAttack::SpawnMinions,
];
const PHASE3_ATTACKS: &[BossAttack] = &[
    BossAttack::Dash,
    BossAttack::Teleport,
    BossAttack::HomingSwarm,
    BossAttack::LaserWarn,
    BossAttack::LaserFire,
    BossAttack::SpawnMinions,
];

/// Spawn position: center-right of the 1920x1080 play field.
const SPAWN_X: f32 = 1700.0;
const SPAWN_Y: f32 = 400.0;
const DASH_TRAVEL: f32 = 400.0;

#[derive(Debug, Clone)]
pub struct BossState {
    pub max_health: u32,
    pub health: u32,
    pub phase: BossPhase,
    pub movement: BossMovement,
    pub current_attack: BossAttack,
    pub attack_timer: f32,
    pub attack_index: usize,
    pub minion_timer: f32,
    pub x: f32,
    pub y: f32,
    hover_phase: f32,
    dash_target_x: f32,
}

impl BossState {
    pub fn new(player_count: u8, defeat_count: u16) -> Self {
        let max_health = GameRule::boss_max_health(player_count, defeat_count);
        Self {
            max_health,
            health: max_health,
            phase: BossPhase::One,
            movement: BossMovement::Hover,
            current_attack: BossAttack::Idle,
            attack_timer: 0.0,
            attack_index: 0,
            minion_timer: 0.0,
            x: SPAWN_X,
            y: SPAWN_Y,
            hover_phase: 0.0,
            dash_target_x: SPAWN_X,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    fn attack_list(&self) -> &'static [BossAttack] {
        match self.phase {
            BossPhase::One => PHASE1_ATTACKS,
            BossPhase::Two => PHASE2_ATTACKS,
            BossPhase::Three => PHASE3_ATTACKS,
        }
    }

    fn attack_interval(&self) -> f32 {
        boss::ATTACK_INTERVAL[self.phase as usize]
    }

    fn max_minions(&self) -> u8 {
        match self.phase {
            BossPhase::One => 0,
            BossPhase::Two => boss::MAX_MINIONS_P2,
            BossPhase::Three => boss::MAX_MINIONS_P3,
        }
    }

    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        self.maybe_transition_phase();
    }

    fn maybe_transition_phase(&mut self) {
        if self.phase == BossPhase::One
            && GameRule::should_boss_change_phase(self.health, self.max_health, 2)
        {
            self.phase = BossPhase::Two;
            self.attack_index = 0;
        } else if self.phase != BossPhase::Three
            && GameRule::should_boss_change_phase(self.health, self.max_health, 3)
        {
            self.phase = BossPhase::Three;
            self.attack_index = 0;
        }
    }

    /// Advances the attack cadence. Returns `Some(attack)` the instant a
    /// new attack begins, so the caller can spawn its side effects
    /// (missiles, lasers, minions) exactly once.
    pub fn tick(&mut self, delta_time: f32) -> Option<BossAttack> {
        if self.is_defeated() {
            return None;
        }
        self.move_step(delta_time);
        self.attack_timer -= delta_time;
        self.minion_timer -= delta_time;
        if self.attack_timer > 0.0 {
            return None;
        }
        self.attack_timer = self.attack_interval();
        let attacks = self.attack_list();
        self.attack_index = (self.attack_index + 1) % attacks.len();
        self.current_attack = attacks[self.attack_index];
        self.movement = match self.current_attack {
            BossAttack::Dash => {
                self.dash_target_x = if self.x > SPAWN_X - DASH_TRAVEL / 2.0 {
                    SPAWN_X - DASH_TRAVEL
                } else {
                    SPAWN_X
                };
                BossMovement::Dashing
            }
            BossAttack::Teleport => BossMovement::Teleporting,
            _ => BossMovement::Hover,
        };
        if self.movement == BossMovement::Teleporting {
            self.x = SPAWN_X;
            self.y = rtype_domain::constants::world::SCREEN_HEIGHT / 2.0;
        }
        Some(self.current_attack)
    }

    fn move_step(&mut self, delta_time: f32) {
        match self.movement {
            BossMovement::Hover => {
                self.hover_phase += delta_time;
                self.y = SPAWN_Y + (self.hover_phase * 0.8).sin() * 60.0;
            }
            BossMovement::Dashing => {
                let dx = self.dash_target_x - self.x;
                let step = boss::DASH_SPEED * delta_time;
                if dx.abs() <= step {
                    self.x = self.dash_target_x;
                } else {
                    self.x += step * dx.signum();
                }
            }
            BossMovement::Teleporting => {}
        }
    }

    pub fn should_spawn_minion(&self, current_minion_count: u8) -> bool {
        current_minion_count < self.max_minions() && self.minion_timer <= 0.0
    }

    pub fn reset_minion_timer(&mut self) {
        self.minion_timer = boss::MINION_SPAWN_INTERVAL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_to_phase_two_at_threshold() {
        let mut boss = BossState::new(1, 0);
        boss.apply_damage(boss.max_health - (boss.max_health as f32 * 0.60) as u32);
        assert_eq!(boss.phase, BossPhase::Two);
    }

    #[test]
    fn transitions_to_phase_three_at_threshold() {
        let mut boss = BossState::new(1, 0);
        boss.apply_damage(boss.max_health - (boss.max_health as f32 * 0.25) as u32);
        assert_eq!(boss.phase, BossPhase::Three);
    }

    #[test]
    fn attack_cadence_fires_on_interval() {
        let mut boss = BossState::new(1, 0);
        boss.attack_timer = 0.0;
        assert!(boss.tick(0.0).is_some());
        assert!(boss.tick(0.1).is_none());
    }

    #[test]
    fn defeated_boss_never_attacks() {
        let mut boss = BossState::new(1, 0);
        boss.apply_damage(boss.max_health);
        assert!(boss.is_defeated());
        assert!(boss.tick(100.0).is_none());
    }

    #[test]
    fn dash_moves_boss_toward_its_target() {
        let mut boss = BossState::new(1, 0);
        boss.phase = BossPhase::Two;
        for _ in 0..PHASE2_ATTACKS.len() {
            boss.attack_timer = 0.0;
            boss.tick(0.0);
            if boss.current_attack == BossAttack::Dash {
                break;
            }
        }
        assert_eq!(boss.movement, BossMovement::Dashing);
        let start_x = boss.x;
        boss.tick(1.0);
        assert_ne!(boss.x, start_x);
    }
}
