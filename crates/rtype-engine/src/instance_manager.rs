//! Multi-room registry.
//!
//! Grounded on `GameWorld.hpp`'s manager class: a mutex-guarded map from
//! room code to a shared, reference-counted room. Each room is ticked by
//! its own tokio task in `rtype-server`; this type only owns the mapping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::RoomSettings;
use crate::error::RoomError;
use crate::game_world::GameWorld;

#[derive(Default)]
pub struct GameInstanceManager {
    rooms: Mutex<HashMap<String, Arc<Mutex<GameWorld>>>>,
    max_players_per_room: u8,
    room_settings: RoomSettings,
}

impl GameInstanceManager {
    pub fn new(max_players_per_room: u8, room_settings: RoomSettings) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            max_players_per_room,
            room_settings,
        }
    }

    pub fn get_or_create_instance(&self, room_code: &str, seed: u64) -> Arc<Mutex<GameWorld>> {
        let mut rooms = self.rooms.lock().expect("room map mutex poisoned");
        rooms
            .entry(room_code.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(GameWorld::new(
                    room_code.to_string(),
                    self.max_players_per_room,
                    seed,
                    self.room_settings,
                )))
            })
            .clone()
    }

    pub fn get_instance(&self, room_code: &str) -> Result<Arc<Mutex<GameWorld>>, RoomError> {
        self.rooms
            .lock()
            .expect("room map mutex poisoned")
            .get(room_code)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(room_code.to_string()))
    }

    pub fn has_instance(&self, room_code: &str) -> bool {
        self.rooms.lock().expect("room map mutex poisoned").contains_key(room_code)
    }

    pub fn remove_instance(&self, room_code: &str) -> bool {
        self.rooms.lock().expect("room map mutex poisoned").remove(room_code).is_some()
    }

    pub fn get_active_room_codes(&self) -> Vec<String> {
        self.rooms.lock().expect("room map mutex poisoned").keys().cloned().collect()
    }

    pub fn get_instance_count(&self) -> usize {
        self.rooms.lock().expect("room map mutex poisoned").len()
    }

    pub fn get_total_player_count(&self) -> usize {
        self.rooms
            .lock()
            .expect("room map mutex poisoned")
            .values()
            .map(|room| room.lock().expect("room mutex poisoned").player_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent_per_room_code() {
        let manager = GameInstanceManager::new(4, RoomSettings::default());
        let a = manager.get_or_create_instance("room1", 1);
        let b = manager.get_or_create_instance("room1", 2);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn remove_instance_drops_the_room() {
        let manager = GameInstanceManager::new(4, RoomSettings::default());
        manager.get_or_create_instance("room1", 1);
        assert!(manager.remove_instance("room1"));
        assert!(!manager.has_instance("room1"));
    }

    #[test]
    fn total_player_count_sums_across_rooms() {
        let manager = GameInstanceManager::new(4, RoomSettings::default());
        let a = manager.get_or_create_instance("a", 1);
        let b = manager.get_or_create_instance("b", 2);
        a.lock().unwrap().add_player(1).unwrap();
        b.lock().unwrap().add_player(2).unwrap();
        b.lock().unwrap().add_player(3).unwrap();
        assert_eq!(manager.get_total_player_count(), 3);
    }
}
