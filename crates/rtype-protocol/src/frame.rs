//! Glues header, optional compression, and payload bytes into the bytes
//! actually sent over the socket.

use crate::compression;
use crate::error::ProtocolError;
use crate::header::Header;

/// Encodes a complete datagram: header followed by payload, compressing
/// the payload first when that shrinks it.
pub fn encode_frame(mut header: Header, payload: &[u8]) -> Vec<u8> {
    let body = compression::compress_if_worthwhile(payload);
    header.compressed = body.is_some();
    let body = body.unwrap_or_else(|| payload.to_vec());

    let mut buf = Vec::with_capacity(12 + body.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(&body);
    buf
}

/// Splits a received datagram into its header and decompressed payload.
pub fn decode_frame(bytes: &[u8]) -> Result<(Header, Vec<u8>), ProtocolError> {
    let header = Header::decode(bytes)?;
    let body = &bytes[crate::header::HEADER_LEN..];
    let payload = if header.compressed {
        compression::decompress(body)?
    } else {
        body.to_vec()
    };
    Ok((header, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_payload_roundtrips_uncompressed() {
        let header = Header::new(1, 0, 1_000);
        let payload = b"hello".to_vec();
        let frame = encode_frame(header, &payload);
        let (decoded_header, decoded_payload) = decode_frame(&frame).unwrap();
        assert_eq!(decoded_header.packet_type, 1);
        assert!(!decoded_header.compressed);
        assert_eq!(decoded_payload, payload);
    }

    #[test]
    fn large_repetitive_payload_roundtrips_compressed() {
        let header = Header::new(7, 5, 2_000);
        let payload = vec![9u8; 4096];
        let frame = encode_frame(header, &payload);
        let (decoded_header, decoded_payload) = decode_frame(&frame).unwrap();
        assert!(decoded_header.compressed);
        assert_eq!(decoded_payload, payload);
        assert!(frame.len() < 12 + payload.len());
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let bytes = [0u8; 4];
        assert_eq!(decode_frame(&bytes), Err(ProtocolError::Truncated));
    }
}
