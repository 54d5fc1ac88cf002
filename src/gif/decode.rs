use crate::error::CodecError;
use crate::lzw::lzw_decode;

/// Decode a raw (non sub-block-framed) LZW code stream produced by
/// [`super::encode_gif`]'s image data, given the palette's last color
/// index. This is a test-grade helper, not a full GIF file decoder — GIF
/// decoding at full fidelity is out of scope for this core.
pub fn decode_gif_lzw_stream(last_color_index: u32, min_code_size: u8, data: &[u8]) -> Result<Vec<u8>, CodecError> {
    lzw_decode(last_color_index, min_code_size, data)
}

/// Undo GIF's sub-block framing (length-prefixed chunks terminated by a
/// zero-length block) back into one contiguous byte stream.
pub fn de_sub_block(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let &len = data.first()?;
        data = &data[1..];
        if len == 0 {
            return Some(out);
        }
        let len = len as usize;
        if data.len() < len {
            return None;
        }
        out.extend_from_slice(&data[..len]);
        data = &data[len..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif::encode_gif;
    use crate::array2d::Array2D;
    use crate::image::Image;
    use crate::meta::Meta;
    use crate::pixel::pack32;

    #[test]
    fn gif_lzw_stream_round_trips_through_full_encode() {
        let r = pack32(255, 0, 0, 255);
        let g = pack32(0, 255, 0, 255);
        let mut row = Vec::new();
        for _ in 0..5 {
            row.push(r);
        }
        for _ in 0..5 {
            row.push(g);
        }
        let image = Image::Raw(Meta::from_data(10, 1), Array2D::new(vec![row.clone()]));
        let out = encode_gif(image);

        // Locate the LZW data: header(6)+LSD(7)+GCT(2 colors->4 entries*3)+
        // image descriptor(10) bytes precede the min-code-size byte.
        let gct_entries = 1usize << ((out[10] & 0x07) as u32 + 1);
        let image_descriptor_len = 10;
        let lzw_start = 13 + gct_entries * 3 + image_descriptor_len + 1;
        let min_code_size = out[lzw_start - 1];
        let framed = &out[lzw_start..out.len() - 1];
        let raw = de_sub_block(framed).unwrap();
        let decoded = decode_gif_lzw_stream(1, min_code_size, &raw).unwrap();
        assert_eq!(decoded, vec![0u8, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }
}
