//! Benchmarks `GameWorld::tick` against the 60Hz frame budget (~16.67ms).
//!
//! A room runs one tick per `ServerConfig::fixed_delta_time()` on its own
//! tokio task; if a tick routinely takes longer than the budget the room
//! falls behind real time under load. This exercises a four-player room
//! with a handful of enemies and power-ups already on the field, which is
//! close to a worst-case mid-wave tick rather than an empty room.
//!
//! Run with: `cargo bench --bench tick_benchmark`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rtype_engine::config::RoomSettings;
use rtype_engine::game_world::GameWorld;

fn build_room(player_count: u8) -> GameWorld {
    let mut world = GameWorld::new("bench-room", player_count, 42, RoomSettings::default());
    for player_id in 0..player_count as u32 {
        world.add_player(player_id).expect("room has capacity");
    }
    for i in 0..8 {
        world.spawn_random_power_up(100.0 + i as f32 * 40.0, 200.0);
    }
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("game_world_tick");
    for &player_count in &[1u8, 2, 4] {
        group.bench_function(format!("{player_count}_players"), |b| {
            let mut world = build_room(player_count);
            b.iter(|| {
                world.tick(black_box(1.0 / 60.0));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
