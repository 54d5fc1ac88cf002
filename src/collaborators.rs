//! The compression/CRC collaborator contract (spec §6), backed by real
//! crates rather than a hand-rolled DEFLATE or CRC32.

use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib;

use crate::error::CodecError;

/// zlib-wrapped DEFLATE compression at the default level.
pub fn deflate_zlib(bytes: &[u8]) -> Vec<u8> {
    const DEFAULT_LEVEL: u8 = 6;
    compress_to_vec_zlib(bytes, DEFAULT_LEVEL)
}

/// zlib-wrapped DEFLATE decompression. Fails on malformed input.
pub fn inflate_zlib(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    decompress_to_vec_zlib(bytes)
        .map_err(|e| CodecError::DecompressionFailure(format!("{e:?}")))
}

/// PNG-spec CRC-32 over a byte range.
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_then_inflate_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let compressed = deflate_zlib(&data);
        let decompressed = inflate_zlib(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn inflate_rejects_garbage() {
        assert!(inflate_zlib(&[0xDE, 0xAD, 0xBE, 0xEF]).is_err());
    }

    #[test]
    fn crc32_matches_known_vector() {
        assert_eq!(crc32(b"IEND"), 0xAE426082);
    }
}
