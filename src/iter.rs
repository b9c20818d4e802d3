//! Lazy enumeration of folded free indices.

use crate::index::insert_zero;

/// Iterator over the linear indices reached by a contiguous free-index range
/// `[start, start + len)`, each value folded through two zero-bit insertions.
///
/// `mask_low` is the cut mask of the lower acted-on bit position, `mask_high`
/// the cut mask of the higher one measured in the final n-bit index (the low
/// insertion happens first, so the high mask already accounts for the shift).
/// A zero mask is an identity fold; the one-qubit path passes `mask_high = 0`.
///
/// Produces exactly `len` items, monotone in the underlying counter. There is
/// no rewind; restarting means building a fresh iterator with the same
/// parameters.
#[derive(Debug, Clone)]
pub struct FoldedIndices {
    cur: usize,
    end: usize,
    mask_low: usize,
    mask_high: usize,
}

impl FoldedIndices {
    pub fn new(start: usize, len: usize, mask_low: usize, mask_high: usize) -> Self {
        Self {
            cur: start,
            end: start + len,
            mask_low,
            mask_high,
        }
    }
}

impl Iterator for FoldedIndices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cur == self.end {
            return None;
        }
        let folded = insert_zero(insert_zero(self.cur, self.mask_low), self.mask_high);
        self.cur += 1;
        Some(folded)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.cur;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FoldedIndices {}
