//! Binary wire protocol: packet header, compression envelope, and the
//! typed payload layouts exchanged between server and client.

pub mod compression;
pub mod error;
pub mod frame;
pub mod header;
pub mod packet;
pub mod packet_type;

pub mod prelude {
    pub use crate::error::ProtocolError;
    pub use crate::frame::{decode_frame, encode_frame};
    pub use crate::header::{Header, COMPRESSED_FLAG, HEADER_LEN};
    pub use crate::packet::*;
    pub use crate::packet_type::PacketType;
}
