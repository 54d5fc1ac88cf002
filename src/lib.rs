//! # rastercodec
//!
//! PNG, BMP, and GIF89a raster image codec built around one shared
//! in-memory abstraction: a lazily-materialized grid of 32-bit RGBA pixels
//! plus the header metadata it was decoded from.
//!
//! ## Supported paths
//!
//! - **PNG**: decode (IndexedColour@8, GreyscaleAlpha@8, TrueColourAlpha@8)
//!   and encode (RGBA/RGB/LuminanceAlpha/Alpha), non-interlaced, 8-bit only.
//! - **BMP**: decode (8/16/24/32 bpp) and encode (24/32 bpp), both header
//!   variants.
//! - **GIF89a**: single-frame encode, plus a decode helper limited to the
//!   LZW inner stream (full GIF decoding is out of scope).
//!
//! ## Laziness
//!
//! Decoders never eagerly materialize pixels. Call [`Image::eval`] once you
//! need pixel access and keep the result — forcing is not memoized.
//!
//! ## Credits
//!
//! PNG chunk/filter handling, BMP header layout, and the LZW coder in this
//! crate are new for this format set; the crate's error-handling, resource
//! limit, and module-layout conventions continue those of `zenbitmaps`.

#![forbid(unsafe_code)]

pub mod array2d;
pub mod bitstream;
pub mod bmp;
pub mod collaborators;
pub mod error;
pub mod gif;
pub mod image;
pub mod limits;
pub mod lzw;
pub mod meta;
pub mod pixel;
pub mod png;

pub use array2d::Array2D;
pub use error::{CodecError, Result};
pub use image::Image;
pub use limits::Limits;
pub use meta::{BmpDibHeader, FromDataColor, Meta, PngColor};
pub use pixel::{pack32, unpack32, Pixel};

pub use bmp::{decode_bmp, encode_bmp24, encode_bmp32, RowOrder as BmpRowOrder};
pub use gif::{decode_gif_lzw_stream, encode_gif};
pub use png::{decode_png, encode_png, PngEncodeFormat, RowOrder as PngRowOrder};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn png_round_trip_is_pixel_exact_for_an_opaque_gradient() {
        let mut rows = Vec::new();
        for y in 0..4u8 {
            let mut row = Vec::new();
            for x in 0..4u8 {
                row.push(pack32(x * 32, y * 32, 128, 255));
            }
            rows.push(row);
        }
        let image = Image::Raw(Meta::from_data(4, 4), Array2D::new(rows.clone()));
        let encoded = encode_png(image, PngEncodeFormat::Rgba, PngRowOrder::RightDown);
        let decoded = decode_png(&encoded).unwrap();
        let (_, pixels) = decoded.into_raw();
        assert_eq!(pixels.into_rows(), rows);
    }

    #[test]
    fn bmp32_round_trip_preserves_alpha() {
        let px = pack32(10, 20, 30, 40);
        let image = Image::Raw(Meta::from_data(1, 1), Array2D::new(vec![vec![px]]));
        let encoded = encode_bmp32(image, BmpRowOrder::default());
        let decoded = decode_bmp(&encoded).unwrap();
        let (_, pixels) = decoded.into_raw();
        assert_eq!(pixels.into_rows(), vec![vec![px]]);
    }

    #[test]
    fn lzw_round_trips_scenario_s5() {
        let indices: Vec<u8> = [1u8; 5]
            .into_iter()
            .chain([2u8; 5])
            .chain([1u8; 5])
            .chain([2u8; 5])
            .collect();
        let (min_code_size, data) = lzw::lzw_encode(3, &indices);
        assert_eq!(min_code_size, 2);
        let decoded = lzw::lzw_decode(3, min_code_size, &data).unwrap();
        assert_eq!(decoded, indices);
    }
}
