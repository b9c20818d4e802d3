//! Lazy tiling of the free-index domain into disjoint gate tasks.
//!
//! Each partition iterator tiles `[0, D)` with contiguous chunks of
//! `task_size` free indices (the last chunk takes the remainder) and wraps
//! each chunk in a task carrying its own folded-index iterator. Tasks are
//! produced on demand, never materialized as a list.

use crate::index::cut_mask;
use crate::iter::FoldedIndices;
use crate::task::{BufferView, OneQubitGate, OneQubitTask, TwoQubitGate, TwoQubitTask};
use crate::Precision;

pub(crate) struct OneQubitPartition<'a, T: Precision> {
    next_start: usize,
    domain: usize,
    task_size: usize,
    mask: usize,
    stride: usize,
    gate: OneQubitGate<T>,
    view: BufferView<'a, T>,
}

impl<'a, T: Precision> OneQubitPartition<'a, T> {
    pub(crate) fn new(
        view: BufferView<'a, T>,
        gate: OneQubitGate<T>,
        qubit_index: usize,
        qubit_count: usize,
        task_size: usize,
    ) -> Self {
        Self {
            next_start: 0,
            domain: 1 << (qubit_count - 1),
            task_size,
            mask: cut_mask(qubit_index),
            stride: 1 << qubit_index,
            gate,
            view,
        }
    }
}

impl<'a, T: Precision> Iterator for OneQubitPartition<'a, T> {
    type Item = OneQubitTask<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start == self.domain {
            return None;
        }
        let len = self.task_size.min(self.domain - self.next_start);
        let task = OneQubitTask {
            // second fold slot unused, mask 0 is the identity
            indices: FoldedIndices::new(self.next_start, len, self.mask, 0),
            view: self.view,
            stride: self.stride,
            gate: self.gate,
        };
        self.next_start += len;
        Some(task)
    }
}

pub(crate) struct TwoQubitPartition<'a, T: Precision> {
    next_start: usize,
    domain: usize,
    task_size: usize,
    mask_low: usize,
    mask_high: usize,
    stride_high: usize,
    stride_low: usize,
    gate: TwoQubitGate<T>,
    view: BufferView<'a, T>,
}

impl<'a, T: Precision> TwoQubitPartition<'a, T> {
    pub(crate) fn new(
        view: BufferView<'a, T>,
        gate: TwoQubitGate<T>,
        qubit_index_1: usize,
        qubit_index_2: usize,
        qubit_count: usize,
        task_size: usize,
    ) -> Self {
        // fold masks follow bit position, strides follow the matrix basis
        // (qubit_index_1 is the high matrix bit whichever is numerically larger)
        let low = qubit_index_1.min(qubit_index_2);
        let high = qubit_index_1.max(qubit_index_2);
        Self {
            next_start: 0,
            domain: 1 << (qubit_count - 2),
            task_size,
            mask_low: cut_mask(low),
            mask_high: cut_mask(high),
            stride_high: 1 << qubit_index_1,
            stride_low: 1 << qubit_index_2,
            gate,
            view,
        }
    }
}

impl<'a, T: Precision> Iterator for TwoQubitPartition<'a, T> {
    type Item = TwoQubitTask<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start == self.domain {
            return None;
        }
        let len = self.task_size.min(self.domain - self.next_start);
        let task = TwoQubitTask {
            indices: FoldedIndices::new(self.next_start, len, self.mask_low, self.mask_high),
            view: self.view,
            stride_high: self.stride_high,
            stride_low: self.stride_low,
            gate: self.gate,
        };
        self.next_start += len;
        Some(task)
    }
}
