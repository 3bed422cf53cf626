//! Payload compression.
//!
//! Grounded on `Compression.hpp`: only worth attempting above
//! `MIN_COMPRESS_SIZE` bytes, and only kept if it actually shrinks the
//! payload. The reference implementation binds to liblz4; this uses
//! `lz4_flex`'s pure-Rust block format instead, prefixed with the
//! original length since `lz4_flex`'s block API needs it to decompress.

use crate::error::ProtocolError;

pub const MIN_COMPRESS_SIZE: usize = 128;
pub const MAX_UNCOMPRESSED_SIZE: usize = 65535;

/// Compresses `payload` if doing so helps. Returns `None` when the input
/// is too small or compression did not shrink it, signaling the caller
/// to send the payload uncompressed.
pub fn compress_if_worthwhile(payload: &[u8]) -> Option<Vec<u8>> {
    if payload.len() < MIN_COMPRESS_SIZE || payload.len() > MAX_UNCOMPRESSED_SIZE {
        return None;
    }
    let compressed = lz4_flex::block::compress_prepend_size(payload);
    (compressed.len() < payload.len()).then_some(compressed)
}

pub fn decompress(payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    lz4_flex::block::decompress_size_prepended(payload).map_err(|_| ProtocolError::DecompressionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_payload_is_never_compressed() {
        let payload = vec![0u8; MIN_COMPRESS_SIZE - 1];
        assert!(compress_if_worthwhile(&payload).is_none());
    }

    #[test]
    fn repetitive_payload_compresses_and_roundtrips() {
        let payload = vec![7u8; 4096];
        let compressed = compress_if_worthwhile(&payload).expect("should compress");
        assert!(compressed.len() < payload.len());
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn incompressible_payload_is_left_uncompressed() {
        // Pseudo-random bytes via a simple LCG: LZ4 should not shrink this.
        let mut state: u32 = 0x12345678;
        let payload: Vec<u8> = (0..4096)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect();
        assert!(compress_if_worthwhile(&payload).is_none());
    }
}
