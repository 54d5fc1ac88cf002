use std::collections::BTreeMap;

use crate::array2d::Array2D;
use crate::collaborators::inflate_zlib;
use crate::image::Image;
use crate::limits::Limits;
use crate::meta::{Meta, PngColor};
use crate::pixel::{ga16_to_rgba32, pack32, Pixel};

use super::{read_chunks, IDAT, IHDR, PLTE, SIGNATURE, TRNS};

struct Ihdr {
    width: u32,
    height: u32,
    color: PngColor,
    adam7: bool,
}

fn parse_ihdr(data: &[u8]) -> Option<Ihdr> {
    if data.len() != 13 {
        return None;
    }
    let width = u32::from_be_bytes(data[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(data[4..8].try_into().unwrap());
    let bit_depth = data[8];
    let color_type = data[9];
    let compression = data[10];
    let filter = data[11];
    let interlace = data[12];
    if compression != 0 || filter != 0 || interlace > 1 {
        return None;
    }
    let color = PngColor::from_ihdr(color_type, bit_depth)?;
    Some(Ihdr {
        width,
        height,
        color,
        adam7: interlace == 1,
    })
}

/// Decode a PNG byte buffer into a lazy [`Image`]. Returns `None` on any
/// structural failure (bad signature, truncated chunk, malformed IHDR, or
/// an interlaced image — unsupported by this core). A recognized-but-
/// unsupported color shape still returns a `Lazy` Image whose pixel pass
/// will fail at `eval` time, per the failure semantics in spec §4.7.
pub fn decode_png(bytes: &[u8]) -> Option<Image> {
    decode_png_with_limits(bytes, &Limits::default())
}

pub fn decode_png_with_limits(bytes: &[u8], limits: &Limits) -> Option<Image> {
    if bytes.len() < 8 || bytes[0..8] != SIGNATURE {
        return None;
    }
    let chunks = read_chunks(&bytes[8..])?;

    let mut ihdr = None;
    let mut palette: Vec<(u8, u8, u8, u8)> = Vec::new();
    let mut idat = Vec::new();
    let mut aux_chunks: BTreeMap<[u8; 4], Vec<u8>> = BTreeMap::new();
    let mut saw_iend = false;

    for chunk in &chunks {
        match chunk.kind {
            k if k == IHDR => {
                ihdr = Some(parse_ihdr(&chunk.data)?);
            }
            k if k == PLTE => {
                if chunk.data.len() % 3 != 0 {
                    return None;
                }
                palette = chunk
                    .data
                    .chunks_exact(3)
                    .map(|c| (c[0], c[1], c[2], 255))
                    .collect();
            }
            k if k == TRNS => {
                for (i, &alpha) in chunk.data.iter().enumerate() {
                    if let Some(entry) = palette.get_mut(i) {
                        entry.3 = alpha;
                    }
                }
            }
            k if k == IDAT => idat.extend_from_slice(&chunk.data),
            k if k == super::IEND => saw_iend = true,
            other => {
                aux_chunks.entry(other).or_default().extend_from_slice(&chunk.data);
            }
        }
    }

    let ihdr = ihdr?;
    if ihdr.adam7 || !saw_iend {
        return None;
    }
    limits.check_dimensions(ihdr.width, ihdr.height).ok()?;

    let meta = Meta::Png {
        width: ihdr.width,
        height: ihdr.height,
        color: ihdr.color,
        adam7: ihdr.adam7,
        aux_chunks,
    };

    let width = ihdr.width;
    let height = ihdr.height;
    let color = ihdr.color;
    let producer_limits = limits.clone();
    let producer = move || decode_pixels(&idat, width, height, color, &palette, &producer_limits);

    Some(Image::lazy(meta, std::rc::Rc::new(producer)))
}

fn paeth(a: i32, b: i32, c: i32) -> i32 {
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn decode_pixels(
    idat: &[u8],
    width: u32,
    height: u32,
    color: PngColor,
    palette: &[(u8, u8, u8, u8)],
    limits: &Limits,
) -> Option<Array2D<Pixel>> {
    let bytes_per_pixel = match color {
        PngColor::IndexedColour(8) => 1,
        PngColor::GreyscaleAlpha(8) => 2,
        PngColor::TrueColourAlpha(8) => 4,
        _ => return None,
    };
    let w = width as usize;
    let h = height as usize;
    let stride = w * bytes_per_pixel;
    limits
        .check_memory(stride.checked_mul(h)?.checked_add(h)?)
        .ok()?;

    let raw = inflate_zlib(idat).ok()?;
    if raw.len() < h * (stride + 1) {
        return None;
    }

    let mut prev_row = vec![0u8; stride];
    let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(h);
    let mut offset = 0usize;

    for _ in 0..h {
        let filter_type = raw[offset];
        offset += 1;
        let mut row = raw[offset..offset + stride].to_vec();
        offset += stride;

        for i in 0..stride {
            let a = if i >= bytes_per_pixel {
                row[i - bytes_per_pixel] as i32
            } else {
                0
            };
            let b = prev_row[i] as i32;
            let c = if i >= bytes_per_pixel {
                prev_row[i - bytes_per_pixel] as i32
            } else {
                0
            };
            let predictor = match filter_type {
                0 => 0,
                1 => a,
                2 => b,
                3 => 0, // Average: unsupported, degrades to None
                4 => paeth(a, b, c),
                _ => return None,
            };
            row[i] = row[i].wrapping_add(predictor as u8);
        }

        let mut pixel_row = Vec::with_capacity(w);
        for x in 0..w {
            let px = match color {
                PngColor::IndexedColour(8) => {
                    let idx = row[x] as usize;
                    let &(r, g, b, a) = palette.get(idx)?;
                    pack32(r, g, b, a)
                }
                PngColor::GreyscaleAlpha(8) => {
                    let word = u16::from_be_bytes([row[x * 2], row[x * 2 + 1]]);
                    ga16_to_rgba32(word)
                }
                PngColor::TrueColourAlpha(8) => {
                    let o = x * 4;
                    pack32(row[o], row[o + 1], row[o + 2], row[o + 3])
                }
                _ => unreachable!("bytes_per_pixel match above already rejected other shapes"),
            };
            pixel_row.push(px);
        }
        rows.push(pixel_row);
        prev_row = row;
    }

    Some(Array2D::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_signature() {
        let bytes = [0u8; 16];
        assert!(decode_png(&bytes).is_none());
    }

    #[test]
    fn rejects_interlaced_header() {
        let mut ihdr_body = vec![0u8; 13];
        ihdr_body[3] = 1; // width = 1
        ihdr_body[7] = 1; // height = 1
        ihdr_body[8] = 8; // bit depth
        ihdr_body[9] = 6; // color type
        ihdr_body[12] = 1; // interlace
        assert!(parse_ihdr(&ihdr_body).map(|h| h.adam7) == Some(true));
    }
}
