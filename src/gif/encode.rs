use std::collections::HashMap;

use crate::image::Image;
use crate::lzw::lzw_encode;
use crate::pixel::unpack32;

const SUB_BLOCK_MAX: usize = 255;

fn size_field_for(palette_size: u32) -> u8 {
    let mut size = 1u32;
    while (1u32 << size) < palette_size {
        size += 1;
    }
    (size.max(1) - 1) as u8
}

/// Row-major palette extraction: each novel color gets the next free index
/// (0..255); a color seen after 256 distinct colors already exist is forced
/// to index 0 rather than growing the palette further (spec's
/// "overflow to palette[0]" non-goal policy).
fn extract_palette(pixels_flat: &[(u8, u8, u8)]) -> (Vec<(u8, u8, u8)>, Vec<u8>) {
    let mut palette = Vec::new();
    let mut seen: HashMap<(u8, u8, u8), u8> = HashMap::new();
    let mut indices = Vec::with_capacity(pixels_flat.len());
    for &color in pixels_flat {
        let index = if let Some(&i) = seen.get(&color) {
            i
        } else if palette.len() < 256 {
            let i = palette.len() as u8;
            palette.push(color);
            seen.insert(color, i);
            i
        } else {
            0
        };
        indices.push(index);
    }
    (palette, indices)
}

fn sub_block_frame(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / SUB_BLOCK_MAX + 2);
    for chunk in data.chunks(SUB_BLOCK_MAX) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0); // terminator block
    out
}

/// Encode a single-frame GIF89a. Non-fully-opaque pixels are flattened to
/// opaque (this encoder emits no Graphics Control Extension, so there is no
/// way to express transparency).
pub fn encode_gif(image: Image) -> Vec<u8> {
    let (meta, mut pixels) = image.into_raw();
    let width = meta.width();
    let height = meta.height();
    pixels.pad_to(height as usize, width as usize, 0);

    let flat: Vec<(u8, u8, u8)> = pixels
        .rows()
        .iter()
        .flat_map(|row| row.iter())
        .map(|&p| {
            let (r, g, b, _a) = unpack32(p);
            (r, g, b)
        })
        .collect();
    let (palette, indices) = extract_palette(&flat);
    let palette_size = palette.len().max(1) as u32;
    let last_color_index = (palette_size - 1).max(0);

    let mut out = Vec::new();
    out.extend_from_slice(b"GIF89a");

    out.extend_from_slice(&(width as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    let size_field = size_field_for(palette_size);
    let packed = 0x80 | (0 << 4) | 0 | size_field;
    out.push(packed);
    out.push(0); // background color index
    out.push(0); // pixel aspect ratio

    let table_entries = 1usize << (size_field as u32 + 1);
    for i in 0..table_entries {
        let (r, g, b) = palette.get(i).copied().unwrap_or((0, 0, 0));
        out.push(r);
        out.push(g);
        out.push(b);
    }

    out.push(0x2C);
    out.extend_from_slice(&0u16.to_le_bytes()); // left
    out.extend_from_slice(&0u16.to_le_bytes()); // top
    out.extend_from_slice(&(width as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    out.push(0); // packed: no local table, no interlace

    let (min_code_size, lzw_data) = lzw_encode(last_color_index, &indices);
    out.push(min_code_size.max(2));
    out.extend_from_slice(&sub_block_frame(&lzw_data));

    out.push(0x3B);
    out
}
