use crate::collaborators::{crc32, deflate_zlib};
use crate::image::Image;
use crate::pixel::unpack32;

use super::{IDAT, IEND, IHDR, SIGNATURE};

/// Row/column traversal order for encoding, independent of how the source
/// Image stores its rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

/// The channel layout an encoded PNG should use, chosen by the caller
/// rather than inferred from the source Image's Meta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PngEncodeFormat {
    Rgba,
    Rgb,
    LuminanceAlpha,
    Alpha,
}

impl PngEncodeFormat {
    fn color_type_and_depth(self) -> (u8, u8) {
        match self {
            PngEncodeFormat::Rgba => (6, 8),
            PngEncodeFormat::Rgb => (2, 8),
            PngEncodeFormat::LuminanceAlpha => (0, 16),
            PngEncodeFormat::Alpha => (0, 8),
        }
    }

    fn bytes_per_pixel(self) -> usize {
        match self {
            PngEncodeFormat::Rgba => 4,
            PngEncodeFormat::Rgb => 3,
            PngEncodeFormat::LuminanceAlpha => 2,
            PngEncodeFormat::Alpha => 1,
        }
    }

    fn pixel_to_bytes(self, p: u32) -> Vec<u8> {
        let (r, g, b, a) = unpack32(p);
        match self {
            PngEncodeFormat::Rgba => vec![r, g, b, a],
            PngEncodeFormat::Rgb => vec![r, g, b],
            PngEncodeFormat::LuminanceAlpha => {
                let luminance = r;
                vec![luminance, a]
            }
            PngEncodeFormat::Alpha => vec![a],
        }
    }
}

fn emit_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&kind);
    out.extend_from_slice(data);
    let mut crc_input = Vec::with_capacity(4 + data.len());
    crc_input.extend_from_slice(&kind);
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32(&crc_input).to_be_bytes());
}

fn ordered_rows(rows: &[Vec<u32>], order: RowOrder) -> Vec<Vec<u32>> {
    let mut rows: Vec<Vec<u32>> = rows.to_vec();
    if matches!(order, RowOrder::RightUp | RowOrder::LeftUp) {
        rows.reverse();
    }
    if matches!(order, RowOrder::LeftDown | RowOrder::LeftUp) {
        for row in rows.iter_mut() {
            row.reverse();
        }
    }
    rows
}

/// Encode an Image to a PNG byte buffer. Forces the Image if it was lazy.
pub fn encode_png(image: Image, format: PngEncodeFormat, order: RowOrder) -> Vec<u8> {
    let (meta, mut pixels) = image.into_raw();
    let width = meta.width();
    let height = meta.height();
    let bpp = format.bytes_per_pixel();
    pixels.pad_to(height as usize, width as usize, 0);

    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    let (color_type, bit_depth) = format.color_type_and_depth();
    ihdr.push(bit_depth);
    ihdr.push(color_type);
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    emit_chunk(&mut out, IHDR, &ihdr);

    let rows = ordered_rows(pixels.rows(), order);
    let stride = width as usize * bpp;
    let mut raw = Vec::with_capacity(height as usize * (stride + 1));
    for row in &rows {
        raw.push(1u8); // Sub filter
        let mut prev = vec![0u8; bpp];
        for x in 0..width as usize {
            let px = row.get(x).copied().unwrap_or(0);
            let bytes = format.pixel_to_bytes(px);
            for (i, &b) in bytes.iter().enumerate() {
                raw.push(b.wrapping_sub(prev[i]));
            }
            prev = bytes;
        }
    }
    let compressed = deflate_zlib(&raw);
    emit_chunk(&mut out, IDAT, &compressed);

    emit_chunk(&mut out, IEND, &[]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array2d::Array2D;
    use crate::meta::Meta;
    use crate::pixel::pack32;

    #[test]
    fn one_by_one_opaque_red_matches_scenario_s1() {
        let red = pack32(0xFF, 0x00, 0x00, 0xFF);
        let image = Image::Raw(Meta::from_data(1, 1), Array2D::new(vec![vec![red]]));
        let out = encode_png(image, PngEncodeFormat::Rgba, RowOrder::RightDown);
        assert_eq!(&out[0..8], &SIGNATURE);
        assert_eq!(&out[12..16], b"IHDR");
        let width = u32::from_be_bytes(out[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(out[20..24].try_into().unwrap());
        assert_eq!((width, height), (1, 1));
        assert_eq!(out[24], 8); // bit depth
        assert_eq!(out[25], 6); // color type RGBA
        assert_eq!(&out[out.len() - 8..out.len() - 4], b"IEND");
        let iend_crc = u32::from_be_bytes(out[out.len() - 4..].try_into().unwrap());
        assert_eq!(iend_crc, crc32(b"IEND"));
    }
}
