//=============================================
// objgscript/codec/ascii85.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: ASCII85 binary-to-text encoding for compiled artifacts
// Objective: Encode with the Adobe alphabet and `z` zero-group shorthand
//=============================================

use super::CodecError;

const BASE: u64 = 85;
const FIRST: u8 = b'!';
const LAST: u8 = b'u';
const ZERO_GROUP: u8 = b'z';

/// Encode bytes as ASCII85 without `<~ ~>` framing or line wrapping.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len().div_ceil(4) * 5);
    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(group);
        if chunk.len() == 4 && value == 0 {
            out.push(ZERO_GROUP);
            continue;
        }
        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = (value % BASE as u32) as u8 + FIRST;
            value /= BASE as u32;
        }
        // A partial group of n bytes is written as n + 1 digits.
        out.extend_from_slice(&digits[..chunk.len() + 1]);
    }
    out
}

/// Decode ASCII85 text; ASCII whitespace is ignored.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(data.len() / 5 * 4 + 4);
    let mut group = [0u8; 5];
    let mut len = 0;

    for (offset, &byte) in data.iter().enumerate() {
        match byte {
            b if b.is_ascii_whitespace() => {}
            ZERO_GROUP if len == 0 => out.extend_from_slice(&[0; 4]),
            ZERO_GROUP => return Err(CodecError::MisplacedZeroGroup { offset }),
            FIRST..=LAST => {
                group[len] = byte - FIRST;
                len += 1;
                if len == group.len() {
                    out.extend_from_slice(&decode_group(&group, offset)?);
                    len = 0;
                }
            }
            other => {
                return Err(CodecError::InvalidCharacter {
                    character: char::from(other),
                    offset,
                });
            }
        }
    }

    match len {
        0 => {}
        1 => return Err(CodecError::TruncatedGroup),
        n => {
            // Pad with the highest digit so truncation rounds back to the input.
            for digit in &mut group[n..] {
                *digit = LAST - FIRST;
            }
            let bytes = decode_group(&group, data.len())?;
            out.extend_from_slice(&bytes[..n - 1]);
        }
    }
    Ok(out)
}

fn decode_group(digits: &[u8; 5], offset: usize) -> Result<[u8; 4], CodecError> {
    let value = digits
        .iter()
        .fold(0u64, |acc, &digit| acc * BASE + u64::from(digit));
    u32::try_from(value)
        .map(u32::to_be_bytes)
        .map_err(|_| CodecError::GroupOverflow { offset })
}
