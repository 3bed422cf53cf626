//! Numeric-priority system scheduler.
//!
//! Systems run in ascending priority order once per tick. The command
//! buffer is flushed against the world immediately after each system
//! returns, not once at the end of the tick, so a system never observes
//! another system's still-pending spawns/despawns from the same tick out
//! of order.

use crate::command::CommandBuffer;
use crate::world::World;

pub const PRIORITY_PLAYER_INPUT: i32 = 0;
pub const PRIORITY_ENEMY_AI: i32 = 100;
pub const PRIORITY_WEAPON: i32 = 200;
pub const PRIORITY_MOVEMENT: i32 = 300;
pub const PRIORITY_COLLISION: i32 = 400;
pub const PRIORITY_DAMAGE: i32 = 500;
pub const PRIORITY_LIFETIME: i32 = 600;
pub const PRIORITY_CLEANUP: i32 = 700;
pub const PRIORITY_SCORE: i32 = 800;

pub trait System {
    fn name(&self) -> &'static str;
    fn run(&mut self, world: &mut World, commands: &mut CommandBuffer, delta_time: f32);
}

struct Entry {
    priority: i32,
    system: Box<dyn System>,
}

#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    commands: CommandBuffer,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system. Insertion order among equal priorities is
    /// preserved (stable sort), matching the fixed system list in the
    /// specification's priority table.
    pub fn register(&mut self, priority: i32, system: impl System + 'static) {
        self.entries.push(Entry {
            priority,
            system: Box::new(system),
        });
        self.entries.sort_by_key(|e| e.priority);
    }

    pub fn run_tick(&mut self, world: &mut World, delta_time: f32) {
        for entry in &mut self.entries {
            entry.system.run(world, &mut self.commands, delta_time);
            world.flush(&mut self.commands);
        }
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.system.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Spawner;
    impl System for Spawner {
        fn name(&self) -> &'static str {
            "spawner"
        }
        fn run(&mut self, _world: &mut World, commands: &mut CommandBuffer, _dt: f32) {
            commands.spawn(|w| {
                w.spawn();
            });
        }
    }

    struct Counter(usize);
    impl System for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
        fn run(&mut self, world: &mut World, _commands: &mut CommandBuffer, _dt: f32) {
            self.0 = world.alive_count();
        }
    }

    #[test]
    fn systems_run_in_priority_order_and_flush_between_calls() {
        let mut sched = Scheduler::new();
        sched.register(PRIORITY_MOVEMENT, Counter(0));
        sched.register(PRIORITY_PLAYER_INPUT, Spawner);
        assert_eq!(sched.system_names(), vec!["spawner", "counter"]);

        let mut world = World::new();
        sched.run_tick(&mut world, 1.0 / 60.0);
        assert_eq!(world.alive_count(), 1);
    }
}
