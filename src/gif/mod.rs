//! GIF89a encoder (single-frame) and a decode helper limited to what spec
//! non-goals allow: the LZW inner stream, for round-trip verification.

mod decode;
mod encode;

pub use decode::decode_gif_lzw_stream;
pub use encode::encode_gif;
