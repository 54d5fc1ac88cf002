//! Tagged description of an image's origin and declared color shape.

use std::collections::BTreeMap;

/// PNG color-type × bit-depth matrix, restricted to the shapes this crate
/// parses IHDR into. Decode only accepts a subset of these (see
/// [`crate::png::decode`]); the others are representable in `Meta` because an
/// `IHDR` can declare them even when the pixel pass later fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PngColor {
    Greyscale(u8),
    TrueColour(u8),
    IndexedColour(u8),
    GreyscaleAlpha(u8),
    TrueColourAlpha(u8),
}

impl PngColor {
    /// The `(colorType, bitDepth)` pair as it appears in IHDR.
    pub fn from_ihdr(color_type: u8, bit_depth: u8) -> Option<Self> {
        Some(match color_type {
            0 => PngColor::Greyscale(bit_depth),
            2 => PngColor::TrueColour(bit_depth),
            3 => PngColor::IndexedColour(bit_depth),
            4 => PngColor::GreyscaleAlpha(bit_depth),
            6 => PngColor::TrueColourAlpha(bit_depth),
            _ => return None,
        })
    }

    pub fn to_ihdr(self) -> (u8, u8) {
        match self {
            PngColor::Greyscale(d) => (0, d),
            PngColor::TrueColour(d) => (2, d),
            PngColor::IndexedColour(d) => (3, d),
            PngColor::GreyscaleAlpha(d) => (4, d),
            PngColor::TrueColourAlpha(d) => (6, d),
        }
    }
}

/// Channel count × bit depth for images built from raw data rather than a
/// decoded container (e.g. the result of `get`/`put`, or `fromArray`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FromDataColor {
    Channel1(u8),
    Channel2(u8),
    Channel3(u8),
    Channel4(u8),
}

impl FromDataColor {
    pub fn channel4_8() -> Self {
        FromDataColor::Channel4(8)
    }
}

/// Raw, uninterpreted BMP DIB header fields, kept around for round-trip
/// fidelity and for callers that want to inspect the original header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmpDibHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub data_size: u32,
    pub pixels_per_meter_x: i32,
    pub pixels_per_meter_y: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// Tagged origin metadata. The decoders that produce each variant are in
/// [`crate::png`], [`crate::bmp`], and [`crate::gif`].
#[derive(Clone, Debug, PartialEq)]
pub enum Meta {
    Png {
        width: u32,
        height: u32,
        color: PngColor,
        adam7: bool,
        aux_chunks: BTreeMap<[u8; 4], Vec<u8>>,
    },
    Bmp {
        file_size: u32,
        pixel_start: u32,
        dib_header: BmpDibHeader,
        width: u32,
        height: u32,
        color_planes: u16,
        bits_per_pixel: u16,
        compression: u32,
        data_size: u32,
    },
    Gif {
        width: u32,
        height: u32,
    },
    FromData {
        width: u32,
        height: u32,
        color: FromDataColor,
    },
}

impl Meta {
    pub fn width(&self) -> u32 {
        match self {
            Meta::Png { width, .. } => *width,
            Meta::Bmp { width, .. } => *width,
            Meta::Gif { width, .. } => *width,
            Meta::FromData { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Meta::Png { height, .. } => *height,
            Meta::Bmp { height, .. } => *height,
            Meta::Gif { height, .. } => *height,
            Meta::FromData { height, .. } => *height,
        }
    }

    /// Bytes per pixel implied by the declared shape, used by BMP row
    /// padding math. Only meaningful for `Bmp`; other variants fall back to
    /// the canonical 4-byte RGBA width since nothing else consumes it.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            Meta::Bmp {
                bits_per_pixel: bpp,
                ..
            } => u32::from(*bpp) / 8,
            _ => 4,
        }
    }

    pub fn from_data(width: u32, height: u32) -> Self {
        Meta::FromData {
            width,
            height,
            color: FromDataColor::channel4_8(),
        }
    }
}
