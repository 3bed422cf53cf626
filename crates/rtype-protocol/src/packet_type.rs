//! The packet type IDs carried in the header's low 15 bits.

use crate::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PacketType {
    Connect = 1,
    Disconnect = 2,
    PlayerInput = 3,
    Ping = 4,
    Accept = 5,
    Reject = 6,
    GameState = 7,
    Spawn = 8,
    Despawn = 9,
    Event = 10,
    Pong = 11,
}

impl PacketType {
    pub fn from_u16(value: u16) -> Result<Self, ProtocolError> {
        match value {
            1 => Ok(Self::Connect),
            2 => Ok(Self::Disconnect),
            3 => Ok(Self::PlayerInput),
            4 => Ok(Self::Ping),
            5 => Ok(Self::Accept),
            6 => Ok(Self::Reject),
            7 => Ok(Self::GameState),
            8 => Ok(Self::Spawn),
            9 => Ok(Self::Despawn),
            10 => Ok(Self::Event),
            11 => Ok(Self::Pong),
            other => Err(ProtocolError::UnknownPacketType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(PacketType::from_u16(0), Err(ProtocolError::UnknownPacketType(0)));
    }

    #[test]
    fn known_type_roundtrips() {
        assert_eq!(PacketType::from_u16(PacketType::GameState as u16).unwrap() as u16, PacketType::GameState as u16);
    }
}
