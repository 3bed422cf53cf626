//! Typed payload layouts for every packet the core exchanges, per the
//! external interface: fixed-size, big-endian, NUL-padded strings. Each
//! payload hand-rolls `to_bytes`/`from_bytes` rather than going through
//! serde, since the wire format must stay bit-exact and padding-free,
//! which serde's default struct encoding does not guarantee.

use crate::error::ProtocolError;

pub const NAME_LEN: usize = 32;

fn take<'a>(bytes: &'a [u8], len: usize) -> Result<(&'a [u8], &'a [u8]), ProtocolError> {
    if bytes.len() < len {
        return Err(ProtocolError::Truncated);
    }
    Ok(bytes.split_at(len))
}

fn read_u32(bytes: &[u8]) -> Result<(u32, &[u8]), ProtocolError> {
    let (head, rest) = take(bytes, 4)?;
    Ok((u32::from_be_bytes(head.try_into().unwrap()), rest))
}

fn read_u8(bytes: &[u8]) -> Result<(u8, &[u8]), ProtocolError> {
    let (head, rest) = take(bytes, 1)?;
    Ok((head[0], rest))
}

fn read_i16(bytes: &[u8]) -> Result<(i16, &[u8]), ProtocolError> {
    let (head, rest) = take(bytes, 2)?;
    Ok((i16::from_be_bytes(head.try_into().unwrap()), rest))
}

fn read_u64(bytes: &[u8]) -> Result<(u64, &[u8]), ProtocolError> {
    let (head, rest) = take(bytes, 8)?;
    Ok((u64::from_be_bytes(head.try_into().unwrap()), rest))
}

fn read_f32(bytes: &[u8]) -> Result<(f32, &[u8]), ProtocolError> {
    let (head, rest) = take(bytes, 4)?;
    Ok((f32::from_be_bytes(head.try_into().unwrap()), rest))
}

/// Client → server: join request. `player_name` is NUL-padded ASCII.
#[derive(Debug, Clone, PartialEq)]
pub struct Connect {
    pub player_name: [u8; NAME_LEN],
}

impl Connect {
    pub const WIRE_SIZE: usize = NAME_LEN;

    pub fn new(name: &str) -> Self {
        let mut player_name = [0u8; NAME_LEN];
        let bytes = name.as_bytes();
        let n = bytes.len().min(NAME_LEN);
        player_name[..n].copy_from_slice(&bytes[..n]);
        Self { player_name }
    }

    pub fn name(&self) -> &str {
        let end = self.player_name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        std::str::from_utf8(&self.player_name[..end]).unwrap_or("")
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.player_name.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (name_bytes, _) = take(bytes, NAME_LEN)?;
        let mut player_name = [0u8; NAME_LEN];
        player_name.copy_from_slice(name_bytes);
        Ok(Self { player_name })
    }
}

/// Client → server: leave request. Carries no payload beyond the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disconnect;

impl Disconnect {
    pub const WIRE_SIZE: usize = 0;

    pub fn to_bytes(&self) -> Vec<u8> {
        Vec::new()
    }

    pub fn from_bytes(_bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(Self)
    }
}

pub const INPUT_UP: u8 = 0x01;
pub const INPUT_DOWN: u8 = 0x02;
pub const INPUT_LEFT: u8 = 0x04;
pub const INPUT_RIGHT: u8 = 0x08;
pub const INPUT_SHOOT: u8 = 0x10;
pub const INPUT_CHARGE: u8 = 0x20;
pub const INPUT_SWITCH_WEAPON: u8 = 0x40;

/// Client → server: one tick's worth of input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerInput {
    pub client_tick: u32,
    pub input_keys: u8,
}

impl PlayerInput {
    pub const WIRE_SIZE: usize = 5;

    pub fn key(&self, mask: u8) -> bool {
        self.input_keys & mask != 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        buf.extend_from_slice(&self.client_tick.to_be_bytes());
        buf.push(self.input_keys);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (client_tick, rest) = read_u32(bytes)?;
        let (input_keys, _) = read_u8(rest)?;
        Ok(Self { client_tick, input_keys })
    }
}

/// Client → server, and mirrored back as `Pong`: RTT probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub timestamp_us: u64,
}

impl Ping {
    pub const WIRE_SIZE: usize = 8;

    pub fn to_bytes(&self) -> Vec<u8> {
        self.timestamp_us.to_be_bytes().to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (timestamp_us, _) = read_u64(bytes)?;
        Ok(Self { timestamp_us })
    }
}

pub type Pong = Ping;

/// Server → client: connection accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accept {
    pub player_id: u32,
    pub server_tick: u32,
    pub tick_rate: f32,
}

impl Accept {
    pub const WIRE_SIZE: usize = 12;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        buf.extend_from_slice(&self.player_id.to_be_bytes());
        buf.extend_from_slice(&self.server_tick.to_be_bytes());
        buf.extend_from_slice(&self.tick_rate.to_be_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (player_id, rest) = read_u32(bytes)?;
        let (server_tick, rest) = read_u32(rest)?;
        let (tick_rate, _) = read_f32(rest)?;
        Ok(Self { player_id, server_tick, tick_rate })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RejectReason {
    RoomFull = 0,
    InvalidName = 1,
    ServerShuttingDown = 2,
}

impl RejectReason {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::RoomFull,
            1 => Self::InvalidName,
            _ => Self::ServerShuttingDown,
        }
    }
}

/// Server → client: connection refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reject {
    pub reason_code: RejectReason,
}

impl Reject {
    pub const WIRE_SIZE: usize = 1;

    pub fn to_bytes(&self) -> Vec<u8> {
        vec![self.reason_code as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (code, _) = read_u8(bytes)?;
        Ok(Self { reason_code: RejectReason::from_u8(code) })
    }
}

pub const ENTITY_STATE_WIRE_SIZE: usize = 4 + 1 + 4 + 4 + 4 + 4 + 1 + 1;

/// One entity's worth of a `GameState` snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    pub entity_id: u32,
    pub entity_type: u8,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: u8,
    pub flags: u8,
}

impl EntityState {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ENTITY_STATE_WIRE_SIZE);
        buf.extend_from_slice(&self.entity_id.to_be_bytes());
        buf.push(self.entity_type);
        buf.extend_from_slice(&self.x.to_be_bytes());
        buf.extend_from_slice(&self.y.to_be_bytes());
        buf.extend_from_slice(&self.vx.to_be_bytes());
        buf.extend_from_slice(&self.vy.to_be_bytes());
        buf.push(self.health);
        buf.push(self.flags);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), ProtocolError> {
        let (entity_id, rest) = read_u32(bytes)?;
        let (entity_type, rest) = read_u8(rest)?;
        let (x, rest) = read_f32(rest)?;
        let (y, rest) = read_f32(rest)?;
        let (vx, rest) = read_f32(rest)?;
        let (vy, rest) = read_f32(rest)?;
        let (health, rest) = read_u8(rest)?;
        let (flags, rest) = read_u8(rest)?;
        Ok((
            Self { entity_id, entity_type, x, y, vx, vy, health, flags },
            rest,
        ))
    }
}

/// Server → client: the per-tick world snapshot for one room.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub server_tick: u32,
    pub last_processed_input_seq: u32,
    pub entities: Vec<EntityState>,
}

impl GameState {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(9 + self.entities.len() * ENTITY_STATE_WIRE_SIZE);
        buf.extend_from_slice(&self.server_tick.to_be_bytes());
        buf.extend_from_slice(&self.last_processed_input_seq.to_be_bytes());
        buf.push(self.entities.len().min(u8::MAX as usize) as u8);
        for entity in self.entities.iter().take(u8::MAX as usize) {
            buf.extend_from_slice(&entity.to_bytes());
        }
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (server_tick, rest) = read_u32(bytes)?;
        let (last_processed_input_seq, rest) = read_u32(rest)?;
        let (entity_count, mut rest) = read_u8(rest)?;
        let mut entities = Vec::with_capacity(entity_count as usize);
        for _ in 0..entity_count {
            let (entity, next) = EntityState::from_bytes(rest)?;
            entities.push(entity);
            rest = next;
        }
        Ok(Self { server_tick, last_processed_input_seq, entities })
    }
}

/// Server → client: a new entity entered the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub entity_id: u32,
    pub entity_type: u8,
    pub x: f32,
    pub y: f32,
    pub health: u8,
}

impl Spawn {
    pub const WIRE_SIZE: usize = 4 + 1 + 4 + 4 + 1;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        buf.extend_from_slice(&self.entity_id.to_be_bytes());
        buf.push(self.entity_type);
        buf.extend_from_slice(&self.x.to_be_bytes());
        buf.extend_from_slice(&self.y.to_be_bytes());
        buf.push(self.health);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (entity_id, rest) = read_u32(bytes)?;
        let (entity_type, rest) = read_u8(rest)?;
        let (x, rest) = read_f32(rest)?;
        let (y, rest) = read_f32(rest)?;
        let (health, _) = read_u8(rest)?;
        Ok(Self { entity_id, entity_type, x, y, health })
    }
}

/// Server → client: an entity left the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Despawn {
    pub entity_id: u32,
}

impl Despawn {
    pub const WIRE_SIZE: usize = 4;

    pub fn to_bytes(&self) -> Vec<u8> {
        self.entity_id.to_be_bytes().to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (entity_id, _) = read_u32(bytes)?;
        Ok(Self { entity_id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GameEvent {
    EnemyKilled = 0,
    PlayerDied = 1,
    PowerUpCollected = 2,
    BossPhaseChanged = 3,
    WaveCleared = 4,
}

impl GameEvent {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::EnemyKilled),
            1 => Some(Self::PlayerDied),
            2 => Some(Self::PowerUpCollected),
            3 => Some(Self::BossPhaseChanged),
            4 => Some(Self::WaveCleared),
            _ => None,
        }
    }
}

/// Server → client: a gameplay event not captured by a state delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub event: GameEvent,
    pub entity_id: u32,
    pub target_id: u32,
    pub value: i16,
}

impl Event {
    pub const WIRE_SIZE: usize = 1 + 4 + 4 + 2;

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        buf.push(self.event as u8);
        buf.extend_from_slice(&self.entity_id.to_be_bytes());
        buf.extend_from_slice(&self.target_id.to_be_bytes());
        buf.extend_from_slice(&self.value.to_be_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (code, rest) = read_u8(bytes)?;
        let event = GameEvent::from_u8(code).ok_or(ProtocolError::UnknownPacketType(code as u16))?;
        let (entity_id, rest) = read_u32(rest)?;
        let (target_id, rest) = read_u32(rest)?;
        let (value, _) = read_i16(rest)?;
        Ok(Self { event, entity_id, target_id, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_roundtrips_name() {
        let c = Connect::new("bruno");
        let decoded = Connect::from_bytes(&c.to_bytes()).unwrap();
        assert_eq!(decoded.name(), "bruno");
    }

    #[test]
    fn player_input_roundtrips() {
        let input = PlayerInput { client_tick: 42, input_keys: INPUT_UP | INPUT_SHOOT };
        let decoded = PlayerInput::from_bytes(&input.to_bytes()).unwrap();
        assert_eq!(input, decoded);
        assert!(decoded.key(INPUT_UP));
        assert!(!decoded.key(INPUT_DOWN));
    }

    #[test]
    fn accept_roundtrips() {
        let accept = Accept { player_id: 7, server_tick: 100, tick_rate: 60.0 };
        assert_eq!(Accept::from_bytes(&accept.to_bytes()).unwrap(), accept);
    }

    #[test]
    fn game_state_roundtrips_with_entities() {
        let state = GameState {
            server_tick: 10,
            last_processed_input_seq: 3,
            entities: vec![
                EntityState { entity_id: 1, entity_type: 0, x: 1.0, y: 2.0, vx: 0.0, vy: 0.0, health: 100, flags: 0 },
                EntityState { entity_id: 2, entity_type: 1, x: 3.0, y: 4.0, vx: -1.0, vy: 0.5, health: 50, flags: 1 },
            ],
        };
        assert_eq!(GameState::from_bytes(&state.to_bytes()).unwrap(), state);
    }

    #[test]
    fn event_rejects_unknown_code() {
        let bytes = [255u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(Event::from_bytes(&bytes), Err(ProtocolError::UnknownPacketType(255)));
    }

    #[test]
    fn despawn_roundtrips() {
        let d = Despawn { entity_id: 99 };
        assert_eq!(Despawn::from_bytes(&d.to_bytes()).unwrap(), d);
    }
}
