//! Error types shared by every decoder and encoder in this crate.

/// Errors from PNG/BMP/GIF decoding, encoding, and the shared LZW coder.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("decompression failed: {0}")]
    DecompressionFailure(String),

    #[error("LZW protocol error: {0}")]
    LzwProtocol(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("resource limit exceeded: {0}")]
    LimitExceeded(String),
}

pub type Result<T> = core::result::Result<T, CodecError>;
