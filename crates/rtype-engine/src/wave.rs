//! Enemy wave spawn cadence.
//!
//! Grounded on `GameWorld.hpp`'s wave spawner fields and
//! `Constants.hpp::wave`. A boss spawns instead of a normal wave once
//! `wave_number` reaches `boss::SPAWN_WAVE`.

use rand::Rng;
use rtype_domain::constants::{boss, wave};
use rtype_domain::types::EnemyType;

#[derive(Debug, Clone)]
pub struct WaveSpawner {
    pub wave_number: u16,
    timer: f32,
    next_interval: f32,
    boss_spawn_wave: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub enemy_type: EnemyType,
    pub x: f32,
    pub y: f32,
    pub delay: f32,
}

impl WaveSpawner {
    pub fn new(boss_spawn_wave: u16) -> Self {
        Self {
            wave_number: 0,
            timer: 0.0,
            next_interval: wave::INTERVAL_MIN,
            boss_spawn_wave,
        }
    }

    /// Forces the next `tick` call to roll a wave immediately, regardless
    /// of the remaining timer. Test-only escape hatch.
    #[doc(hidden)]
    pub fn force_next_tick(&mut self) {
        self.timer = 0.0;
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave_number > 0 && self.wave_number % self.boss_spawn_wave == 0
    }

    /// Advances the spawn timer. Returns a freshly rolled wave of spawn
    /// points the instant the interval elapses (empty on a boss wave,
    /// since the boss is spawned separately by the caller).
    pub fn tick(&mut self, delta_time: f32, rng: &mut impl Rng) -> Option<Vec<SpawnPoint>> {
        self.timer -= delta_time;
        if self.timer > 0.0 {
            return None;
        }
        self.wave_number += 1;
        self.next_interval = rng.gen_range(wave::INTERVAL_MIN..=wave::INTERVAL_MAX);
        self.timer = self.next_interval;

        if self.is_boss_wave() {
            return Some(Vec::new());
        }

        let count = rng.gen_range(wave::ENEMIES_PER_WAVE_MIN..=wave::ENEMIES_PER_WAVE_MAX);
        let points = (0..count)
            .map(|i| SpawnPoint {
                enemy_type: EnemyType::ALL[rng.gen_range(0..EnemyType::ALL.len())],
                x: wave::SPAWN_X,
                y: rng.gen_range(wave::SPAWN_Y_MIN..=wave::SPAWN_Y_MAX),
                delay: i as f32 * rng.gen_range(wave::SPAWN_DELAY_MIN..=wave::SPAWN_DELAY_MAX),
            })
            .collect();
        Some(points)
    }
}

impl Default for WaveSpawner {
    fn default() -> Self {
        Self::new(boss::SPAWN_WAVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg32;

    #[test]
    fn every_tenth_wave_is_a_boss_wave() {
        let mut rng = Pcg32::new(1, 1);
        let mut spawner = WaveSpawner::new(boss::SPAWN_WAVE);
        for _ in 0..10 {
            spawner.timer = 0.0;
            let points = spawner.tick(0.0, &mut rng);
            if spawner.wave_number == 10 {
                assert!(spawner.is_boss_wave());
                assert!(points.unwrap().is_empty());
            }
        }
    }

    #[test]
    fn normal_wave_spawns_points_within_bounds() {
        let mut rng = Pcg32::new(42, 1);
        let mut spawner = WaveSpawner::new(boss::SPAWN_WAVE);
        spawner.timer = 0.0;
        let points = spawner.tick(0.0, &mut rng).unwrap();
        assert!(!points.is_empty());
        for p in &points {
            assert!(p.y >= wave::SPAWN_Y_MIN && p.y <= wave::SPAWN_Y_MAX);
        }
    }
}
