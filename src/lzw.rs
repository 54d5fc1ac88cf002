//! GIF-flavored LZW: variable-width codes, clear-code table reset, EOI
//! termination.

use std::collections::HashMap;

use crate::bitstream::{BitReader, BitWriter};
use crate::error::CodecError;

const MAX_CODE_WIDTH: u32 = 12;
const MAX_CODE: u32 = (1 << MAX_CODE_WIDTH) - 1;

/// Minimum code width required to represent palette entries `0..=n` plus the
/// clear/EOI codes, per the spec's `lzwCodeSize` table.
pub fn lzw_code_size(n: u32) -> u32 {
    match n {
        0..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        65..=128 => 7,
        129..=256 => 8,
        257..=512 => 9,
        513..=1024 => 10,
        1025..=2048 => 11,
        _ => 12,
    }
}

struct Codes {
    last_color_index: u32,
    cc: u32,
    eoi: u32,
}

impl Codes {
    fn new(last_color_index: u32) -> Self {
        let cc = last_color_index + 1;
        Self {
            last_color_index,
            cc,
            eoi: cc + 1,
        }
    }
}

/// Encode an index stream. Returns `(minCodeSize, lzwData)` where
/// `minCodeSize` is the byte GIF stores ahead of the sub-blocks and
/// `lzwData` is the raw (not yet sub-block-framed) code stream.
pub fn lzw_encode(last_color_index: u32, indices: &[u8]) -> (u8, Vec<u8>) {
    let codes = Codes::new(last_color_index);
    let min_code_size = lzw_code_size(codes.cc).max(2) as u8;

    let mut writer = BitWriter::new();
    let mut width = min_code_size as u32 + 1;
    let mut table: HashMap<Vec<u8>, u32> = HashMap::new();
    let mut next_code = codes.eoi + 1;

    let reset_table = |table: &mut HashMap<Vec<u8>, u32>, next_code: &mut u32, width: &mut u32| {
        table.clear();
        for k in 0..=codes.last_color_index {
            table.insert(vec![k as u8], k);
        }
        *next_code = codes.eoi + 1;
        *width = min_code_size as u32 + 1;
    };
    reset_table(&mut table, &mut next_code, &mut width);

    writer.write_bits(width, codes.cc);

    let mut w: Vec<u8> = Vec::new();
    for &k in indices {
        let mut candidate = w.clone();
        candidate.push(k);
        if table.contains_key(&candidate) {
            w = candidate;
            continue;
        }
        let code = *table.get(&w).expect("w is always a known table entry");
        writer.write_bits(width, code);

        if next_code > MAX_CODE {
            writer.write_bits(width, codes.cc);
            reset_table(&mut table, &mut next_code, &mut width);
        } else {
            table.insert(candidate, next_code);
            next_code += 1;
            if next_code > (1 << width) && width < MAX_CODE_WIDTH {
                width += 1;
            }
        }
        w = vec![k];
    }
    if !w.is_empty() {
        let code = *table.get(&w).expect("w is always a known table entry");
        writer.write_bits(width, code);
    }
    writer.write_bits(width, codes.eoi);
    (min_code_size, writer.into_bytes())
}

/// Decode a raw (already de-sub-blocked) LZW code stream back to indices.
pub fn lzw_decode(last_color_index: u32, min_code_size: u8, data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let codes = Codes::new(last_color_index);
    let mut width = min_code_size as u32 + 1;
    let mut reader = BitReader::new(data);

    let mut table: HashMap<u32, Vec<u8>> = HashMap::new();
    let mut next_code = codes.eoi + 1;
    let reset_table = |table: &mut HashMap<u32, Vec<u8>>, next_code: &mut u32, width: &mut u32| {
        table.clear();
        for k in 0..=codes.last_color_index {
            table.insert(k, vec![k as u8]);
        }
        *next_code = codes.eoi + 1;
        *width = min_code_size as u32 + 1;
    };
    reset_table(&mut table, &mut next_code, &mut width);

    let mut out = Vec::new();
    let mut prev: Option<Vec<u8>> = None;

    let mut first = true;
    loop {
        let code = reader
            .read_bits(width, 0)
            .ok_or(CodecError::UnexpectedEof)?;

        if code == codes.cc {
            reset_table(&mut table, &mut next_code, &mut width);
            prev = None;
            first = false;
            continue;
        }
        if code == codes.eoi {
            break;
        }
        if first {
            return Err(CodecError::LzwProtocol(
                "stream must begin with a clear code".into(),
            ));
        }

        let entry = if let Some(s) = table.get(&code) {
            s.clone()
        } else if let Some(p) = &prev {
            if code == next_code {
                let mut s = p.clone();
                s.push(p[0]);
                s
            } else {
                return Err(CodecError::LzwProtocol(format!(
                    "code {code} out of range"
                )));
            }
        } else {
            return Err(CodecError::LzwProtocol("code before any prior string".into()));
        };

        out.extend_from_slice(&entry);

        if let Some(p) = prev {
            if next_code <= MAX_CODE {
                let mut new_entry = p;
                new_entry.push(entry[0]);
                table.insert(next_code, new_entry);
                next_code += 1;
                // next_code lags the encoder's own counter by the one table
                // insert skipped on the first code after every clear, so the
                // growth threshold is >= rather than the encoder's >.
                if next_code >= (1 << width) && width < MAX_CODE_WIDTH {
                    width += 1;
                }
            }
        }
        prev = Some(entry);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_repeating_two_color_run() {
        let indices: Vec<u8> = [1u8; 5]
            .iter()
            .chain([2u8; 5].iter())
            .chain([1u8; 5].iter())
            .chain([2u8; 5].iter())
            .copied()
            .collect();
        let (min_code_size, data) = lzw_encode(3, &indices);
        assert_eq!(min_code_size, 2);
        let decoded = lzw_decode(3, min_code_size, &data).unwrap();
        assert_eq!(decoded, indices);
    }

    #[test]
    fn round_trips_a_single_color() {
        let indices = vec![0u8; 3];
        let (min_code_size, data) = lzw_encode(0, &indices);
        let decoded = lzw_decode(0, min_code_size, &data).unwrap();
        assert_eq!(decoded, indices);
    }

    #[test]
    fn round_trips_enough_unique_runs_to_force_code_width_growth() {
        // One full 0..=255 cycle alone drives next_code from 258 past the
        // 512 width-9-to-10 boundary (every adjacent pair is a novel
        // two-symbol string, so each of the 255 transitions inserts a table
        // entry); three cycles leaves headroom to also exercise decode of
        // already-known strings once the table has grown.
        let indices: Vec<u8> = (0..768u32).map(|i| (i % 256) as u8).collect();
        let (min_code_size, data) = lzw_encode(255, &indices);
        let decoded = lzw_decode(255, min_code_size, &data).unwrap();
        assert_eq!(decoded, indices);
    }

    #[test]
    fn code_size_table_matches_spec_boundaries() {
        assert_eq!(lzw_code_size(4), 2);
        assert_eq!(lzw_code_size(8), 3);
        assert_eq!(lzw_code_size(16), 4);
        assert_eq!(lzw_code_size(256), 8);
        assert_eq!(lzw_code_size(4096), 12);
    }
}
