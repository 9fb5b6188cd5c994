//! Reflected binary (Gray) code tables.
//!
//! Chunk values are remapped onto their rank in the 2-bit Gray sequence
//! `00, 01, 11, 10` so that the numeric distance between two ranks tracks how
//! many bit flips separate the underlying chunks more closely than the raw
//! value would.

use crate::config::PerceptualError;

/// Bit width of a single chunk.
pub const CHUNK_BITS: u32 = 2;

/// Rank of each 2-bit value in the 2-bit Gray sequence, indexed by value.
///
/// `00 -> 0`, `01 -> 1`, `11 -> 2`, `10 -> 3`.
pub const GRAY_RANK: [u8; 4] = [0, 1, 3, 2];

/// Inverse of [`GRAY_RANK`]: the 2-bit value sitting at each rank.
pub const GRAY_VALUE: [u8; 4] = [0, 1, 3, 2];

/// Build the `width`-bit reflected binary Gray code sequence.
///
/// Width 1 is `["0", "1"]`. Every wider sequence is the previous one prefixed
/// with `0`, followed by the previous one reversed and prefixed with `1`, so
/// consecutive entries differ in exactly one bit.
pub fn gray_code(width: u32) -> Result<Vec<String>, PerceptualError> {
    if width == 0 {
        return Err(PerceptualError::InvalidWidth { width });
    }
    if width == 1 {
        return Ok(vec!["0".to_string(), "1".to_string()]);
    }

    let prev = gray_code(width - 1)?;
    let mut out = Vec::with_capacity(prev.len() * 2);
    out.extend(prev.iter().map(|code| format!("0{code}")));
    out.extend(prev.iter().rev().map(|code| format!("1{code}")));
    Ok(out)
}

/// Derive the value -> rank table for a `width`-bit Gray sequence.
///
/// Entry `v` holds the position of `v`'s binary string in [`gray_code`].
pub fn rank_table(width: u32) -> Result<Vec<u32>, PerceptualError> {
    let codes = gray_code(width)?;
    let mut table = vec![0u32; codes.len()];
    for (rank, code) in codes.iter().enumerate() {
        // Every entry is built from '0'/'1' only.
        let value = usize::from_str_radix(code, 2)
            .map_err(|_| PerceptualError::InvalidWidth { width })?;
        table[value] = rank as u32;
    }
    Ok(table)
}

/// Gray rank of a 2-bit chunk value. Only the low two bits of `value` are used.
#[inline]
pub fn rank(value: u8) -> u8 {
    GRAY_RANK[(value & 0b11) as usize]
}

/// The 2-bit chunk value at Gray position `rank`. Only the low two bits are used.
#[inline]
pub fn unrank(rank: u8) -> u8 {
    GRAY_VALUE[(rank & 0b11) as usize]
}
