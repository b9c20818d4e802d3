//! Gate tasks: single-use, disjoint in-place kernels over one shared buffer.
//!
//! rust wants exclusive access for mutation, but the whole point of the task
//! decomposition is that many threads write one buffer at once. that is sound
//! here for exactly one reason: the partition iterators hand every task a
//! pairwise disjoint index set, so no two writes ever alias. the raw-pointer
//! view below is the narrow unsafe seam that encodes this contract.

use std::marker::PhantomData;

use num_complex::Complex;

use crate::iter::FoldedIndices;
use crate::Precision;

/// caller-supplied 2x2 gate matrix, row-major, basis index = qubit bit value.
pub type OneQubitGate<T> = [[Complex<T>; 2]; 2];

/// caller-supplied 4x4 gate matrix, row-major, basis index
/// `(bit_high << 1) | bit_low` where the high bit is `qubit_index_1`.
pub type TwoQubitGate<T> = [[Complex<T>; 4]; 4];

/// Write handle over the whole amplitude buffer, shared by every task of one
/// gate application.
///
/// Exclusivity contract: concurrent holders must address pairwise disjoint
/// index sets. The `'a` borrow plus the scoped scheduler guarantee no view
/// survives the gate-application call that created it.
pub(crate) struct BufferView<'a, T> {
    ptr: *mut Complex<T>,
    len: usize,
    _buf: PhantomData<&'a mut [Complex<T>]>,
}

impl<'a, T> BufferView<'a, T> {
    pub(crate) fn new(amps: &'a mut [Complex<T>]) -> Self {
        Self {
            ptr: amps.as_mut_ptr(),
            len: amps.len(),
            _buf: PhantomData,
        }
    }

    #[inline]
    fn load(&self, i: usize) -> Complex<T>
    where
        T: Copy,
    {
        debug_assert!(i < self.len);
        unsafe { *self.ptr.add(i) }
    }

    #[inline]
    fn store(&self, i: usize, value: Complex<T>) {
        debug_assert!(i < self.len);
        unsafe {
            *self.ptr.add(i) = value;
        }
    }
}

impl<T> Clone for BufferView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            ptr: self.ptr,
            len: self.len,
            _buf: PhantomData,
        }
    }
}

impl<T> Copy for BufferView<'_, T> {}

// safety: holders write disjoint index sets, see the exclusivity contract.
unsafe impl<T: Send> Send for BufferView<'_, T> {}

/// A unit of work a scheduler worker runs to completion. Running consumes the
/// task, so one slice can never be written twice.
pub(crate) trait Kernel: Send {
    fn run(self);
}

/// Bounded slice of a one-qubit gate application: `len` folded indices, one
/// stride, the 2x2 matrix carried by value.
pub(crate) struct OneQubitTask<'a, T: Precision> {
    pub(crate) indices: FoldedIndices,
    pub(crate) view: BufferView<'a, T>,
    pub(crate) stride: usize,
    pub(crate) gate: OneQubitGate<T>,
}

impl<T: Precision> Kernel for OneQubitTask<'_, T> {
    fn run(self) {
        let g = &self.gate;
        for j in self.indices {
            // gather both amplitudes before writing either, the pair overlaps
            let a0 = self.view.load(j);
            let a1 = self.view.load(j + self.stride);
            self.view.store(j, g[0][0] * a0 + g[0][1] * a1);
            self.view.store(j + self.stride, g[1][0] * a0 + g[1][1] * a1);
        }
    }
}

/// Bounded slice of a two-qubit gate application: `len` folded indices, two
/// strides, the 4x4 matrix carried by value.
pub(crate) struct TwoQubitTask<'a, T: Precision> {
    pub(crate) indices: FoldedIndices,
    pub(crate) view: BufferView<'a, T>,
    /// stride of the matrix-high qubit (`qubit_index_1`)
    pub(crate) stride_high: usize,
    /// stride of the matrix-low qubit (`qubit_index_2`)
    pub(crate) stride_low: usize,
    pub(crate) gate: TwoQubitGate<T>,
}

impl<T: Precision> Kernel for TwoQubitTask<'_, T> {
    fn run(self) {
        let g = &self.gate;
        for j in self.indices {
            // offsets j + k*stride_high + l*stride_low for k,l in {0,1},
            // ordered by the matrix basis (bit_high << 1) | bit_low
            let idx = [
                j,
                j + self.stride_low,
                j + self.stride_high,
                j + self.stride_high + self.stride_low,
            ];
            let a = [
                self.view.load(idx[0]),
                self.view.load(idx[1]),
                self.view.load(idx[2]),
                self.view.load(idx[3]),
            ];
            for (row, &target) in g.iter().zip(idx.iter()) {
                self.view.store(
                    target,
                    row[0] * a[0] + row[1] * a[1] + row[2] * a[2] + row[3] * a[3],
                );
            }
        }
    }
}
