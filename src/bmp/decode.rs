use crate::array2d::Array2D;
use crate::image::Image;
use crate::limits::Limits;
use crate::meta::{BmpDibHeader, Meta};
use crate::pixel::{ga16_to_rgba32, gray8_to_rgba32, rgb24_to_rgba32, Pixel};

use super::row_stride;

fn read_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

fn read_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn read_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Decode a BMP byte buffer into a lazy [`Image`]. Returns `None` on a bad
/// magic, a truncated header, or an unsupported `bitsPerPixel`.
pub fn decode_bmp(bytes: &[u8]) -> Option<Image> {
    decode_bmp_with_limits(bytes, &Limits::default())
}

pub fn decode_bmp_with_limits(bytes: &[u8], limits: &Limits) -> Option<Image> {
    if bytes.len() < super::FILE_HEADER_LEN + super::INFO_HEADER_LEN {
        return None;
    }
    if &bytes[0..2] != b"BM" {
        return None;
    }
    let file_size = read_u32(&bytes[2..6]);
    let pixel_start = read_u32(&bytes[10..14]);

    let dib = &bytes[14..];
    let dib_size = read_u32(&dib[0..4]);
    if (dib_size as usize) < super::INFO_HEADER_LEN || dib.len() < dib_size as usize {
        return None;
    }
    let width_i = read_i32(&dib[4..8]);
    let height_i = read_i32(&dib[8..12]);
    let color_planes = read_u16(&dib[12..14]);
    let bits_per_pixel = read_u16(&dib[14..16]);
    let compression = read_u32(&dib[16..20]);
    let data_size = read_u32(&dib[20..24]);
    let ppm_x = read_i32(&dib[24..28]);
    let ppm_y = read_i32(&dib[28..32]);
    let colors_used = read_u32(&dib[32..36]);
    let colors_important = read_u32(&dib[36..40]);

    if width_i <= 0 || height_i <= 0 {
        return None;
    }
    let width = width_i as u32;
    let height = height_i as u32;
    if !matches!(bits_per_pixel, 8 | 16 | 24 | 32) {
        return None;
    }
    limits.check_dimensions(width, height).ok()?;

    let dib_header = BmpDibHeader {
        size: dib_size,
        width: width_i,
        height: height_i,
        color_planes,
        bits_per_pixel,
        compression,
        data_size,
        pixels_per_meter_x: ppm_x,
        pixels_per_meter_y: ppm_y,
        colors_used,
        colors_important,
    };

    let meta = Meta::Bmp {
        file_size,
        pixel_start,
        dib_header,
        width,
        height,
        color_planes,
        bits_per_pixel,
        compression,
        data_size,
    };

    let body = bytes.to_vec();
    let producer_limits = limits.clone();
    let producer = move || decode_pixels(&body, pixel_start, width, height, bits_per_pixel, &producer_limits);

    Some(Image::lazy(meta, std::rc::Rc::new(producer)))
}

fn decode_pixels(
    bytes: &[u8],
    pixel_start: u32,
    width: u32,
    height: u32,
    bits_per_pixel: u16,
    limits: &Limits,
) -> Option<Array2D<Pixel>> {
    let bytes_per_pixel = u32::from(bits_per_pixel) / 8;
    let stride = row_stride(width, bytes_per_pixel);
    limits
        .check_memory(stride.checked_mul(height as usize)?)
        .ok()?;

    let start = pixel_start as usize;
    let total = stride.checked_mul(height as usize)?;
    if bytes.len() < start.checked_add(total)? {
        return None;
    }
    let body = &bytes[start..start + total];

    // BMP rows are stored bottom-first; accumulate then reverse to get
    // top-first row order.
    let mut rows_bottom_up = Vec::with_capacity(height as usize);
    for row_idx in 0..height as usize {
        let row_bytes = &body[row_idx * stride..row_idx * stride + width as usize * bytes_per_pixel as usize];
        let mut row = Vec::with_capacity(width as usize);
        for x in 0..width as usize {
            let o = x * bytes_per_pixel as usize;
            let px = match bits_per_pixel {
                8 => gray8_to_rgba32(row_bytes[o]),
                16 => {
                    let word = u16::from_le_bytes([row_bytes[o], row_bytes[o + 1]]);
                    ga16_to_rgba32(word)
                }
                24 => {
                    let (b, g, r) = (row_bytes[o], row_bytes[o + 1], row_bytes[o + 2]);
                    rgb24_to_rgba32(r, g, b)
                }
                32 => u32::from_le_bytes([
                    row_bytes[o],
                    row_bytes[o + 1],
                    row_bytes[o + 2],
                    row_bytes[o + 3],
                ]),
                _ => return None,
            };
            row.push(px);
        }
        rows_bottom_up.push(row);
    }
    rows_bottom_up.reverse();
    Some(Array2D::new(rows_bottom_up))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_magic() {
        let bytes = vec![0u8; 64];
        assert!(decode_bmp(&bytes).is_none());
    }

    #[test]
    fn rejects_unsupported_bits_per_pixel() {
        let mut bytes = vec![0u8; 54];
        bytes[0] = b'B';
        bytes[1] = b'M';
        bytes[14] = 40; // dib header size
        bytes[18] = 1; // width = 1
        bytes[22] = 1; // height = 1
        bytes[26] = 1; // color planes
        bytes[28] = 4; // 4 bits per pixel: unsupported
        assert!(decode_bmp(&bytes).is_none());
    }
}
