//! Translates `GameWorld`'s snapshot/event types into the packets
//! `rtype-protocol` knows how to encode.

use std::time::{SystemTime, UNIX_EPOCH};

use rtype_engine::game_world::{SnapshotKind, WorldSnapshot};
use rtype_protocol::prelude::*;

/// The boss is orchestrator state, not an ECS entity, so it has no
/// `EntityId`; it gets a reserved wire id instead of colliding with one.
pub const BOSS_ENTITY_ID: u32 = u32::MAX;

pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

pub fn entity_type_byte(kind: SnapshotKind) -> u8 {
    match kind {
        SnapshotKind::Player => 0,
        SnapshotKind::Enemy => 1,
        SnapshotKind::PlayerMissile => 2,
        SnapshotKind::EnemyMissile => 3,
        SnapshotKind::PowerUp => 4,
        SnapshotKind::WaveCannon => 5,
        SnapshotKind::ForcePod => 6,
        SnapshotKind::BitDevice => 8,
        SnapshotKind::Boss => 7,
    }
}

fn health_byte(current: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    ((current as u64 * u8::MAX as u64) / max as u64).min(u8::MAX as u64) as u8
}

/// Builds every `EntityState` in the snapshot, boss included. One of
/// these is shared verbatim across every player in the room; only the
/// enclosing `GameState.last_processed_input_seq` differs per recipient.
pub fn entity_states(snapshot: &WorldSnapshot) -> Vec<EntityState> {
    let mut entities: Vec<EntityState> = snapshot
        .entities
        .iter()
        .map(|e| EntityState {
            entity_id: e.entity.index(),
            entity_type: entity_type_byte(e.kind),
            x: e.x,
            y: e.y,
            vx: e.vx,
            vy: e.vy,
            health: health_byte(e.health as u32, e.max_health as u32),
            flags: e.invulnerable as u8,
        })
        .collect();
    if let Some(boss) = &snapshot.boss {
        entities.push(EntityState {
            entity_id: BOSS_ENTITY_ID,
            entity_type: entity_type_byte(SnapshotKind::Boss),
            x: boss.x,
            y: boss.y,
            vx: 0.0,
            vy: 0.0,
            health: health_byte(boss.health, boss.max_health),
            flags: 0,
        });
    }
    entities
}

pub fn encode(packet_type: PacketType, sequence: u16, payload: Vec<u8>) -> Vec<u8> {
    let header = Header::new(packet_type as u16, sequence, now_ns());
    encode_frame(header, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_health_scales_to_max_byte() {
        assert_eq!(super::health_byte(100, 100), u8::MAX);
    }

    #[test]
    fn zero_max_health_is_zero() {
        assert_eq!(super::health_byte(0, 0), 0);
    }

    #[test]
    fn encoded_frame_decodes_back_to_the_same_packet_type() {
        let bytes = encode(PacketType::Ping, 7, vec![1, 2, 3, 4]);
        let (header, payload) = decode_frame(&bytes).unwrap();
        assert_eq!(header.packet_type, PacketType::Ping as u16);
        assert_eq!(payload, vec![1, 2, 3, 4]);
    }
}
