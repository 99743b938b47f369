//! Self-terminating variable-length index encoding.
//!
//! An index is split into big-endian 7-bit groups. Leading all-zero groups
//! are suppressed and each remaining group is written as one byte with its
//! top bit clear. Zero therefore encodes as no bytes at all. A decoder
//! consumes bytes while the top bit is clear and stops, without consuming,
//! at the first byte with the top bit set (the next opcode).

use super::StreamError;

/// Longest encoding of a `u32` (five 7-bit groups).
pub const MAX_INDEX_LEN: usize = 5;

/// Append the encoding of `value` to `out`.
pub fn write_index(out: &mut Vec<u8>, value: u32) {
    let mut shift = 7 * (MAX_INDEX_LEN as u32 - 1);
    let mut started = false;
    loop {
        let group = ((value >> shift) & 0x7F) as u8;
        if started || group != 0 {
            out.push(group);
            started = true;
        }
        if shift == 0 {
            break;
        }
        shift -= 7;
    }
}

/// Encode `value` into a fresh buffer.
pub fn encode_index(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_INDEX_LEN);
    write_index(&mut out, value);
    out
}

/// Number of bytes `write_index` produces for `value`.
pub fn index_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode an index from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Running out of input
/// ends the index like an opcode would.
pub fn decode_index(bytes: &[u8]) -> Result<(u32, usize), StreamError> {
    let mut value: u64 = 0;
    let mut consumed = 0;
    for &b in bytes {
        if b & 0x80 != 0 {
            break;
        }
        value = (value << 7) | u64::from(b);
        if value > u64::from(u32::MAX) {
            return Err(StreamError::IndexOverflow { offset: consumed });
        }
        consumed += 1;
    }
    Ok((value as u32, consumed))
}
