//! Server configuration, with sane defaults and an optional TOML override
//! file, following the same `serde` + file-override idiom used elsewhere
//! in this workspace for engine configuration.

use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "0.0.0.0:4242".to_string()
}

fn default_tick_rate_hz() -> u32 {
    60
}

fn default_max_players_per_room() -> u8 {
    4
}

fn default_max_rooms() -> usize {
    64
}

fn default_room_idle_timeout_secs() -> f32 {
    300.0
}

fn default_screen_width() -> f32 {
    rtype_domain::constants::world::SCREEN_WIDTH
}

fn default_screen_height() -> f32 {
    rtype_domain::constants::world::SCREEN_HEIGHT
}

fn default_player_timeout_ms() -> u64 {
    30_000
}

fn default_boss_spawn_wave() -> u16 {
    rtype_domain::constants::boss::SPAWN_WAVE
}

fn default_game_speed_percent() -> u8 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub tick_rate_hz: u32,
    pub max_players_per_room: u8,
    pub max_rooms: usize,
    pub room_idle_timeout_secs: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub player_timeout_ms: u64,
    pub boss_spawn_wave: u16,
    pub game_speed_percent: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            tick_rate_hz: default_tick_rate_hz(),
            max_players_per_room: default_max_players_per_room(),
            max_rooms: default_max_rooms(),
            room_idle_timeout_secs: default_room_idle_timeout_secs(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            player_timeout_ms: default_player_timeout_ms(),
            boss_spawn_wave: default_boss_spawn_wave(),
            game_speed_percent: default_game_speed_percent(),
        }
    }
}

impl ServerConfig {
    pub fn fixed_delta_time(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    /// Loads config from a TOML file, falling back to defaults for any
    /// field the file omits. Returns `Err` only on a parse failure, not a
    /// missing file — callers that want a missing file to be fatal should
    /// check `path.exists()` themselves.
    pub fn load_from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// `CollisionRule` is compiled against the domain's fixed 1920x1080
    /// bounds; this only checks the config agrees with it; it never feeds
    /// `screen_width`/`screen_height` back into collision math.
    pub fn screen_dims_match_compiled(&self) -> bool {
        (self.screen_width - rtype_domain::constants::world::SCREEN_WIDTH).abs() < f32::EPSILON
            && (self.screen_height - rtype_domain::constants::world::SCREEN_HEIGHT).abs() < f32::EPSILON
    }
}

/// Per-room tuning threaded from [`ServerConfig`] into [`crate::game_world::GameWorld`].
/// A separate struct rather than passing `ServerConfig` itself, since a room
/// cares about only a slice of the server-wide settings (bind address, room
/// capacity and idle timeout are `rtype-server`'s concern, not the room's).
#[derive(Debug, Clone, Copy)]
pub struct RoomSettings {
    pub player_timeout_secs: f32,
    pub boss_spawn_wave: u16,
    pub game_speed_percent: u8,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for RoomSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            player_timeout_secs: config.player_timeout_ms as f32 / 1000.0,
            boss_spawn_wave: config.boss_spawn_wave,
            game_speed_percent: config.game_speed_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.tick_rate_hz, 60);
        assert!((cfg.fixed_delta_time() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = ServerConfig::load_from_toml("tick_rate_hz = 30\n").unwrap();
        assert_eq!(cfg.tick_rate_hz, 30);
        assert_eq!(cfg.max_players_per_room, 4);
    }
}
