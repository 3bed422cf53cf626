//! Wire-format errors. Every variant is dropped silently by the caller —
//! a malformed or truncated UDP datagram is never fatal to the server.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("packet shorter than the 12-byte header")]
    Truncated,
    #[error("unknown packet type {0}")]
    UnknownPacketType(u16),
    #[error("payload decompression failed")]
    DecompressionFailed,
}
