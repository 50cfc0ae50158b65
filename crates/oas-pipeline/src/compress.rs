//! # Compression Engine: zstd Encode/Decode and Magic Sniffing
//!
//! Thin wrapper over the `zstd` crate at a fixed default-speed level.
//! The level is deliberately not caller-tunable: identical input must
//! produce identical stored bytes regardless of which node handled the
//! push.

use std::io;

/// Canonical zstd frame magic number, little-endian `0xFD2FB528`.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compress bytes with the default zstd profile.
///
/// Failure here is an engine/environment error, not a data error, so callers
/// treat it as degradation, not as request failure.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    // Level 0 selects zstd's default compression level.
    zstd::stream::encode_all(data, 0)
}

/// Decompress a zstd stream.
///
/// Fails when the input is not valid zstd framing, a data error the
/// caller maps to `CorruptPayload`.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::decode_all(data)
}

/// Cheap compressed-or-not sniff: true iff the first four bytes are the
/// zstd frame magic. A heuristic, not a format validation, used only when
/// authoritative annotations are unavailable.
pub fn is_zstd_magic(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZSTD_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_law() {
        let payload: Vec<u8> = (0..2048u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress(&payload).unwrap();
        let restored = decompress(&compressed).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn roundtrip_empty_input() {
        let compressed = compress(b"").unwrap();
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn compressed_output_carries_magic() {
        let compressed = compress(b"some compressible text content").unwrap();
        assert!(is_zstd_magic(&compressed));
    }

    #[test]
    fn magic_sniff_rejects_plain_data() {
        assert!(!is_zstd_magic(b"plain text"));
        assert!(!is_zstd_magic(b"{\"json\": true}"));
    }

    #[test]
    fn magic_sniff_rejects_short_input() {
        assert!(!is_zstd_magic(b""));
        assert!(!is_zstd_magic(&[0x28, 0xB5, 0x2F]));
    }

    #[test]
    fn magic_sniff_exact_prefix() {
        assert!(is_zstd_magic(&[0x28, 0xB5, 0x2F, 0xFD]));
        assert!(is_zstd_magic(&[0x28, 0xB5, 0x2F, 0xFD, 0x00, 0x01]));
        assert!(!is_zstd_magic(&[0x28, 0xB5, 0x2F, 0xFE]));
    }

    #[test]
    fn decompress_rejects_garbage() {
        assert!(decompress(b"definitely not a zstd frame").is_err());
    }

    #[test]
    fn decompress_rejects_truncated_frame() {
        let compressed = compress(&vec![7u8; 4096]).unwrap();
        assert!(decompress(&compressed[..compressed.len() / 2]).is_err());
    }

    #[test]
    fn compression_shrinks_repetitive_payloads() {
        let payload = vec![b'a'; 10 * 1024];
        let compressed = compress(&payload).unwrap();
        assert!(compressed.len() < payload.len());
    }
}
