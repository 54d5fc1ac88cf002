//! PNG chunk stream parsing, scanline filter reconstruction, and the
//! symmetric encoder.

mod decode;
mod encode;

pub use decode::decode_png;
pub use encode::{encode_png, PngEncodeFormat, RowOrder};

pub(crate) const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub(crate) const IHDR: [u8; 4] = *b"IHDR";
pub(crate) const PLTE: [u8; 4] = *b"PLTE";
pub(crate) const TRNS: [u8; 4] = *b"tRNS";
pub(crate) const IDAT: [u8; 4] = *b"IDAT";
pub(crate) const IEND: [u8; 4] = *b"IEND";

/// One `length || kind || data || crc` chunk as read off the wire.
pub(crate) struct RawChunk {
    pub kind: [u8; 4],
    pub data: Vec<u8>,
}

/// Split a post-signature byte slice into its chunk sequence. Fails on any
/// truncated length/kind/data/crc field; CRC values are read but, per spec,
/// not verified.
pub(crate) fn read_chunks(mut buf: &[u8]) -> Option<Vec<RawChunk>> {
    let mut chunks = Vec::new();
    loop {
        if buf.is_empty() {
            break;
        }
        if buf.len() < 8 {
            return None;
        }
        let length = u32::from_be_bytes(buf[0..4].try_into().unwrap()) as usize;
        let kind: [u8; 4] = buf[4..8].try_into().unwrap();
        let rest = &buf[8..];
        if rest.len() < length + 4 {
            return None;
        }
        let data = rest[..length].to_vec();
        let _crc = u32::from_be_bytes(rest[length..length + 4].try_into().unwrap());
        let is_end = kind == IEND;
        chunks.push(RawChunk { kind, data });
        buf = &rest[length + 4..];
        if is_end {
            break;
        }
    }
    Some(chunks)
}
