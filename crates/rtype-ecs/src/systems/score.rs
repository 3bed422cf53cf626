//! Turns kill events into combo-weighted score updates.
//!
//! Grounded on `ScoreSystem::processKill`: combo increments per kill,
//! decays after a grace period of no kills, and multiplies the enemy's
//! base point value. Kills are fed in by the orchestrator (via
//! `submit_kill`) once `DamageSystem` reports them, the same hand-off the
//! original makes between its damage and score systems.

use std::collections::VecDeque;

use crate::bridge::DomainBridge;
use crate::command::CommandBuffer;
use crate::components::ScoreComp;
use crate::scheduler::System;
use crate::systems::damage::KillEvent;
use crate::world::World;

#[derive(Default)]
pub struct ScoreSystem {
    pending: VecDeque<KillEvent>,
    bridge: DomainBridge,
}

impl ScoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_kill(&mut self, event: KillEvent) {
        self.pending.push_back(event);
    }

}

impl System for ScoreSystem {
    fn name(&self) -> &'static str {
        "ScoreSystem"
    }

    fn run(&mut self, world: &mut World, _commands: &mut CommandBuffer, delta_time: f32) {
        for (_, score) in world.query_mut::<ScoreComp>() {
            score.combo_timer += delta_time;
            score.combo_multiplier = self
                .bridge
                .decay_combo(score.combo_multiplier, delta_time, score.combo_timer);
        }

        while let Some(kill) = self.pending.pop_front() {
            let Some(killer) = kill.killer else { continue };
            let Some(score) = world.get_mut::<ScoreComp>(killer) else {
                continue;
            };
            score.combo_multiplier = self.bridge.increment_combo(score.combo_multiplier);
            score.combo_timer = 0.0;
            score.max_combo = score.max_combo.max(score.combo_multiplier);
            let points = self.bridge.calculate_kill_score(kill.enemy_type, score.combo_multiplier);
            score.total += points;
            score.kills += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtype_domain::types::EnemyType;

    #[test]
    fn kill_awards_combo_weighted_points() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = ScoreSystem::new();
        let killer = world.spawn();
        world.insert(killer, ScoreComp::default());

        sys.submit_kill(KillEvent {
            enemy: world.spawn(),
            enemy_type: EnemyType::Basic,
            killer: Some(killer),
            weapon_type: None,
            x: 0.0,
            y: 0.0,
        });
        sys.run(&mut world, &mut commands, 1.0 / 60.0);

        let score = world.get::<ScoreComp>(killer).unwrap();
        assert_eq!(score.kills, 1);
        assert!(score.total > 0);
        assert!(score.combo_multiplier > 1.0);
    }

    #[test]
    fn combo_decays_after_grace_period_with_no_kills() {
        let mut world = World::new();
        let mut commands = CommandBuffer::new();
        let mut sys = ScoreSystem::new();
        let killer = world.spawn();
        world.insert(
            killer,
            ScoreComp {
                combo_multiplier: 2.0,
                ..ScoreComp::default()
            },
        );
        for _ in 0..400 {
            sys.run(&mut world, &mut commands, 1.0 / 60.0);
        }
        assert_eq!(world.get::<ScoreComp>(killer).unwrap().combo_multiplier, 1.0);
    }
}
