//! Linear-index bit arithmetic: zero-bit insertion and the bit/index bijection.
//!
//! The addressing contract of the whole crate: bit `k` of a linear index in
//! `[0, 2^n)` holds the basis value of qubit `k`. Gate application never
//! iterates over multi-indices directly; it enumerates "free" indices with
//! the acted-on bit positions removed and re-inserts zero bits at those
//! positions with [`insert_zero`].

use crate::error::{Error, Result};

/// mask with ones at every bit position at or above `pos`.
#[inline]
pub fn cut_mask(pos: usize) -> usize {
    usize::MAX << pos
}

/// inserts a zero bit at the cut marked by `mask`: all bits at or above the
/// cut shift one position up, bits below stay put.
///
/// `mask == 0` degenerates to the identity, which the one-qubit path uses
/// for its unused second fold.
#[inline]
pub fn insert_zero(value: usize, mask: usize) -> usize {
    ((value & mask) << 1) | (value & !mask)
}

/// Linear index of a little-endian bit multi-index (bit `k` selects qubit `k`).
pub fn linear_from_bits(bits: &[u8]) -> Result<usize> {
    let mut linear = 0usize;
    for (position, &bit) in bits.iter().enumerate() {
        match bit {
            0 => {}
            1 => linear |= 1 << position,
            value => return Err(Error::InvalidBit { position, value }),
        }
    }
    Ok(linear)
}

/// Bit multi-index of `index` for an n-qubit register.
pub fn bits_from_linear(index: usize, qubit_count: usize) -> Vec<u8> {
    (0..qubit_count).map(|k| ((index >> k) & 1) as u8).collect()
}
