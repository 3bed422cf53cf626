//! One tokio task per room: ticks its `GameWorld` on the configured
//! cadence and broadcasts the resulting state/events to every endpoint
//! seated in that room. Exits once the room has been empty for longer
//! than the configured idle timeout.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::net::UdpSocket;
use tokio::time::{interval, Duration};

use rtype_domain::types::BossPhase;
use rtype_engine::prelude::*;
use rtype_protocol::prelude::*;

use crate::registry::ClientRegistry;
use crate::wire;

pub async fn run(
    room_code: String,
    world: Arc<Mutex<GameWorld>>,
    socket: Arc<UdpSocket>,
    registry: Arc<ClientRegistry>,
    instances: Arc<GameInstanceManager>,
    config: ServerConfig,
    active_rooms: Arc<Mutex<HashSet<String>>>,
) {
    let mut ticker = interval(Duration::from_secs_f32(config.fixed_delta_time()));
    let mut tick: u32 = 0;
    let mut known_entities: HashSet<u32> = HashSet::new();
    let mut known_boss_phase: Option<BossPhase> = None;
    let mut idle_secs: f32 = 0.0;

    loop {
        ticker.tick().await;
        tick = tick.wrapping_add(1);

        let (broadcast_packets, per_player_state, endpoints) = {
            let mut room = world.lock().expect("room mutex poisoned");
            room.tick(config.fixed_delta_time());

            let snapshot = room.get_snapshot();
            let entities = wire::entity_states(&snapshot);
            let current_ids: HashSet<u32> = entities.iter().map(|e| e.entity_id).collect();

            let mut packets = Vec::new();
            for entity in &entities {
                if !known_entities.contains(&entity.entity_id) {
                    let spawn = Spawn {
                        entity_id: entity.entity_id,
                        entity_type: entity.entity_type,
                        x: entity.x,
                        y: entity.y,
                        health: entity.health,
                    };
                    packets.push(wire::encode(PacketType::Spawn, tick as u16, spawn.to_bytes()));
                }
            }
            for &old_id in known_entities.difference(&current_ids) {
                let despawn = Despawn { entity_id: old_id };
                packets.push(wire::encode(PacketType::Despawn, tick as u16, despawn.to_bytes()));
            }
            known_entities = current_ids;

            let boss_phase = room.boss_phase();
            if boss_phase != known_boss_phase {
                if let Some(phase) = boss_phase {
                    let event = Event {
                        event: GameEvent::BossPhaseChanged,
                        entity_id: wire::BOSS_ENTITY_ID,
                        target_id: 0,
                        value: phase as i16,
                    };
                    packets.push(wire::encode(PacketType::Event, tick as u16, event.to_bytes()));
                }
                known_boss_phase = boss_phase;
            }

            for kill in room.take_kill_events() {
                let event = Event {
                    event: GameEvent::EnemyKilled,
                    entity_id: kill.enemy.index(),
                    target_id: kill.killer.map(|k| k.index()).unwrap_or(0),
                    value: 0,
                };
                packets.push(wire::encode(PacketType::Event, tick as u16, event.to_bytes()));
            }
            for pickup in room.take_pickup_events() {
                let event = Event {
                    event: GameEvent::PowerUpCollected,
                    entity_id: pickup.power_up.index(),
                    target_id: pickup.player.index(),
                    value: pickup.power_up_type as i16,
                };
                packets.push(wire::encode(PacketType::Event, tick as u16, event.to_bytes()));
            }

            let endpoints = registry.endpoints_in_room(&room_code);
            let mut per_player = Vec::with_capacity(endpoints.len());
            for &addr in &endpoints {
                let Some(player_id) = registry.player_id_for(&addr) else { continue };
                let last_processed_input_seq = room.get_player_last_input_seq(player_id).unwrap_or(0);
                let state = GameState {
                    server_tick: tick,
                    last_processed_input_seq,
                    entities: entities.clone(),
                };
                per_player.push((addr, wire::encode(PacketType::GameState, tick as u16, state.to_bytes())));
            }

            (packets, per_player, endpoints)
        };

        for packet in &broadcast_packets {
            for &addr in &endpoints {
                let _ = socket.send_to(packet, addr).await;
            }
        }
        for (addr, bytes) in &per_player_state {
            let _ = socket.send_to(bytes, *addr).await;
        }

        if endpoints.is_empty() {
            idle_secs += config.fixed_delta_time();
        } else {
            idle_secs = 0.0;
        }
        if idle_secs >= config.room_idle_timeout_secs {
            tracing::info!(%room_code, "room idle timeout reached, tearing down");
            instances.remove_instance(&room_code);
            active_rooms.lock().expect("active room set mutex poisoned").remove(&room_code);
            break;
        }
    }
}
