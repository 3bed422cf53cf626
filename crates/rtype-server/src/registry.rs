//! Maps UDP endpoints to the player and room they belong to.
//!
//! There is no per-connection task here (unlike a TCP server's one task
//! per `accept`): every endpoint shares the one bound socket, so this is
//! the only place that remembers who is who between datagrams.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct ClientState {
    player_id: u32,
    room_code: String,
    last_input_keys: u8,
}

#[derive(Default)]
pub struct ClientRegistry {
    by_addr: Mutex<HashMap<SocketAddr, ClientState>>,
    next_player_id: AtomicU32,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_player_id(&self) -> u32 {
        self.next_player_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn register(&self, addr: SocketAddr, player_id: u32, room_code: String) {
        self.by_addr.lock().expect("client registry mutex poisoned").insert(
            addr,
            ClientState {
                player_id,
                room_code,
                last_input_keys: 0,
            },
        );
    }

    pub fn remove(&self, addr: &SocketAddr) -> Option<(u32, String)> {
        self.by_addr
            .lock()
            .expect("client registry mutex poisoned")
            .remove(addr)
            .map(|s| (s.player_id, s.room_code))
    }

    pub fn room_and_player(&self, addr: &SocketAddr) -> Option<(String, u32)> {
        self.by_addr
            .lock()
            .expect("client registry mutex poisoned")
            .get(addr)
            .map(|s| (s.room_code.clone(), s.player_id))
    }

    /// Diffs `new_keys` against the endpoint's last known input mask,
    /// returning `(pressed, released)` bitmasks, then stores `new_keys`.
    /// Used so one-shot actions (shoot, charge, switch weapon) fire once
    /// per press instead of once per packet while a key is held.
    pub fn take_edges(&self, addr: &SocketAddr, new_keys: u8) -> (u8, u8) {
        let mut map = self.by_addr.lock().expect("client registry mutex poisoned");
        let Some(state) = map.get_mut(addr) else {
            return (0, 0);
        };
        let pressed = new_keys & !state.last_input_keys;
        let released = !new_keys & state.last_input_keys;
        state.last_input_keys = new_keys;
        (pressed, released)
    }

    /// Every endpoint currently seated in `room_code`, newest registration
    /// order is not guaranteed.
    pub fn endpoints_in_room(&self, room_code: &str) -> Vec<SocketAddr> {
        self.by_addr
            .lock()
            .expect("client registry mutex poisoned")
            .iter()
            .filter(|(_, state)| state.room_code == room_code)
            .map(|(addr, _)| *addr)
            .collect()
    }

    pub fn player_id_for(&self, addr: &SocketAddr) -> Option<u32> {
        self.by_addr
            .lock()
            .expect("client registry mutex poisoned")
            .get(addr)
            .map(|s| s.player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:4242".parse().unwrap()
    }

    #[test]
    fn held_key_only_edges_once() {
        let reg = ClientRegistry::new();
        reg.register(addr(), 1, "room1".to_string());

        let (pressed, released) = reg.take_edges(&addr(), 0x20);
        assert_eq!(pressed, 0x20);
        assert_eq!(released, 0);

        let (pressed, released) = reg.take_edges(&addr(), 0x20);
        assert_eq!(pressed, 0);
        assert_eq!(released, 0);

        let (pressed, released) = reg.take_edges(&addr(), 0);
        assert_eq!(pressed, 0);
        assert_eq!(released, 0x20);
    }

    #[test]
    fn endpoints_in_room_filters_by_room_code() {
        let reg = ClientRegistry::new();
        let a: SocketAddr = "127.0.0.1:1".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:2".parse().unwrap();
        reg.register(a, 1, "room1".to_string());
        reg.register(b, 2, "room2".to_string());

        assert_eq!(reg.endpoints_in_room("room1"), vec![a]);
    }

    #[test]
    fn remove_clears_registration() {
        let reg = ClientRegistry::new();
        reg.register(addr(), 1, "room1".to_string());
        assert_eq!(reg.remove(&addr()), Some((1, "room1".to_string())));
        assert_eq!(reg.player_id_for(&addr()), None);
    }
}
