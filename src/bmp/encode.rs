use crate::image::Image;
use crate::pixel::rgba32_to_rgb24;

use super::row_stride;

/// Pixel and row traversal order for BMP encoding.
///
/// `order_up = true` reproduces standard BMP bottom-up row storage (the
/// natural top-first row list is reversed so the bottom row is emitted
/// first); `order_up = false` stores rows top-down, unreversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowOrder {
    pub order_right: bool,
    pub order_up: bool,
}

impl Default for RowOrder {
    fn default() -> Self {
        Self {
            order_right: true,
            order_up: true,
        }
    }
}

/// Static BI_BITFIELDS channel masks for the 32-bpp variant: R in the
/// canonical high byte, A in the low byte, matching this crate's Pixel
/// layout directly.
const MASK_R: u32 = 0xFF00_0000;
const MASK_G: u32 = 0x00FF_0000;
const MASK_B: u32 = 0x0000_FF00;
const MASK_A: u32 = 0x0000_00FF;

fn ordered_rows(rows: &[Vec<u32>], order: RowOrder) -> Vec<Vec<u32>> {
    let mut rows: Vec<Vec<u32>> = rows.to_vec();
    if order.order_up {
        rows.reverse();
    }
    if !order.order_right {
        for row in rows.iter_mut() {
            row.reverse();
        }
    }
    rows
}

fn file_header(total_len: u32, pixel_start: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(super::FILE_HEADER_LEN);
    h.extend_from_slice(b"BM");
    h.extend_from_slice(&total_len.to_le_bytes());
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(&pixel_start.to_le_bytes());
    h
}

fn info_header(width: u32, height: u32, bits_per_pixel: u16, data_size: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(super::INFO_HEADER_LEN);
    h.extend_from_slice(&(super::INFO_HEADER_LEN as u32).to_le_bytes());
    h.extend_from_slice(&(width as i32).to_le_bytes());
    h.extend_from_slice(&(height as i32).to_le_bytes());
    h.extend_from_slice(&1u16.to_le_bytes()); // color planes
    h.extend_from_slice(&bits_per_pixel.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    h.extend_from_slice(&data_size.to_le_bytes());
    h.extend_from_slice(&0i32.to_le_bytes()); // ppm x
    h.extend_from_slice(&0i32.to_le_bytes()); // ppm y
    h.extend_from_slice(&0u32.to_le_bytes()); // colors used
    h.extend_from_slice(&0u32.to_le_bytes()); // colors important
    h
}

fn v4_header(width: u32, height: u32, data_size: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(super::V4_HEADER_LEN);
    h.extend_from_slice(&(super::V4_HEADER_LEN as u32).to_le_bytes());
    h.extend_from_slice(&(width as i32).to_le_bytes());
    h.extend_from_slice(&(height as i32).to_le_bytes());
    h.extend_from_slice(&1u16.to_le_bytes()); // color planes
    h.extend_from_slice(&32u16.to_le_bytes());
    h.extend_from_slice(&3u32.to_le_bytes()); // BI_BITFIELDS
    h.extend_from_slice(&data_size.to_le_bytes());
    h.extend_from_slice(&0i32.to_le_bytes());
    h.extend_from_slice(&0i32.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes());
    h.extend_from_slice(&MASK_R.to_le_bytes());
    h.extend_from_slice(&MASK_G.to_le_bytes());
    h.extend_from_slice(&MASK_B.to_le_bytes());
    h.extend_from_slice(&MASK_A.to_le_bytes());
    h.extend_from_slice(b"BGRs"); // color space type: device-dependent RGB
    h.extend_from_slice(&[0u8; 36]); // CIEXYZTRIPLE endpoints
    h.extend_from_slice(&[0u8; 12]); // gamma R, G, B
    h
}

/// Encode an opaque (alpha dropped) 24-bpp BMP using BGR triples.
pub fn encode_bmp24(image: Image, order: RowOrder) -> Vec<u8> {
    let (meta, mut pixels) = image.into_raw();
    let width = meta.width();
    let height = meta.height();
    let bytes_per_pixel = 3;
    let stride = row_stride(width, bytes_per_pixel);
    pixels.pad_to(height as usize, width as usize, 0);
    let rows = ordered_rows(pixels.rows(), order);

    let mut body = Vec::with_capacity(stride * height as usize);
    for row in &rows {
        let row_start = body.len();
        for x in 0..width as usize {
            let px = row.get(x).copied().unwrap_or(0);
            let (r, g, b) = rgba32_to_rgb24(px);
            body.push(b);
            body.push(g);
            body.push(r);
        }
        body.resize(row_start + stride, 0);
    }

    let pixel_start = (super::FILE_HEADER_LEN + super::INFO_HEADER_LEN) as u32;
    let total_len = pixel_start + body.len() as u32;
    let mut out = file_header(total_len, pixel_start);
    out.extend_from_slice(&info_header(width, height, 24, body.len() as u32));
    out.extend_from_slice(&body);
    out
}

/// Encode a 32-bpp BMP with BI_BITFIELDS masks, preserving alpha.
pub fn encode_bmp32(image: Image, order: RowOrder) -> Vec<u8> {
    let (meta, mut pixels) = image.into_raw();
    let width = meta.width();
    let height = meta.height();
    let bytes_per_pixel = 4;
    let stride = row_stride(width, bytes_per_pixel);
    pixels.pad_to(height as usize, width as usize, 0);
    let rows = ordered_rows(pixels.rows(), order);

    let mut body = Vec::with_capacity(stride * height as usize);
    for row in &rows {
        let row_start = body.len();
        for x in 0..width as usize {
            let px = row.get(x).copied().unwrap_or(0);
            body.extend_from_slice(&px.to_le_bytes());
        }
        body.resize(row_start + stride, 0);
    }

    let pixel_start = (super::FILE_HEADER_LEN + super::V4_HEADER_LEN) as u32;
    let total_len = pixel_start + body.len() as u32;
    let mut out = file_header(total_len, pixel_start);
    out.extend_from_slice(&v4_header(width, height, body.len() as u32));
    out.extend_from_slice(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array2d::Array2D;
    use crate::meta::Meta;
    use crate::pixel::pack32;

    #[test]
    fn row_padding_rounds_up_to_four_byte_boundary_property_10() {
        for width in 1u32..=9 {
            for bpp in [1u32, 3, 4] {
                let stride = row_stride(width, bpp);
                assert_eq!(stride % 4, 0);
                let expected = ((width * bpp + 3) / 4) * 4;
                assert_eq!(stride as u32, expected);
            }
        }
    }

    #[test]
    fn two_by_two_bmp24_round_trips_through_decode() {
        let r = pack32(0xFF, 0x00, 0x00, 0xFF);
        let g = pack32(0x00, 0xFF, 0x00, 0xFF);
        let b = pack32(0x00, 0x00, 0xFF, 0xFF);
        let w = pack32(0xFF, 0xFF, 0xFF, 0xFF);
        let image = Image::Raw(
            Meta::from_data(2, 2),
            Array2D::new(vec![vec![r, g], vec![b, w]]),
        );
        let bytes = encode_bmp24(image, RowOrder::default());
        let decoded = super::super::decode_bmp(&bytes).unwrap();
        let (_, pixels) = decoded.into_raw();
        assert_eq!(pixels.into_rows(), vec![vec![r, g], vec![b, w]]);
    }
}
