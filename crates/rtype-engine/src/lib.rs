//! Per-room orchestration: ties the ECS systems together into a fixed
//! tick loop, owns wave/boss pacing, and multiplexes multiple rooms.

pub mod boss;
pub mod config;
pub mod error;
pub mod game_world;
pub mod instance_manager;
pub mod score;
pub mod wave;

pub mod prelude {
    pub use crate::boss::BossState;
    pub use crate::config::{RoomSettings, ServerConfig};
    pub use crate::error::RoomError;
    pub use crate::game_world::{BossSnapshot, EntitySnapshot, GameWorld, SnapshotKind, WorldSnapshot};
    pub use crate::instance_manager::GameInstanceManager;
    pub use crate::score::PlayerScore;
    pub use crate::wave::WaveSpawner;
    pub use rtype_ecs::systems::damage::{KillEvent, PowerUpCollectedEvent};
}
