//! qsv: parallel quantum state-vector gate engine.
//!
//! Maintains the full 2^n complex amplitude vector of an n-qubit register and
//! applies 1- and 2-qubit gate matrices to it in place. One gate application
//! is decomposed into disjoint tasks over the folded free-index domain and
//! drained by a bounded-queue worker pool without locks.

use num_traits::Float;

pub mod error; // error taxonomy and Result alias
pub mod index; // zero-bit insertion and the bit/index bijection
pub mod iter; // folded free-index iterator
mod partition; // tiling of the free-index domain into tasks
mod scheduler; // bounded-queue worker pool
pub mod state; // state vector and public gate API
mod task; // single-use in-place gate kernels

pub use error::{Error, Result};
pub use state::{Config, StateVector, DEFAULT_TASK_SIZE, MAX_QUBIT_COUNT};
pub use task::{OneQubitGate, TwoQubitGate};

/// Floating-point scalar usable as the amplitude component type.
///
/// The amplitude precision is a compile-time parameter: `StateVector<f32>`
/// and `StateVector<f64>` (the default) are the two instantiations.
pub trait Precision:
    Float + Send + Sync + std::iter::Sum + std::fmt::Debug + Default + 'static
{
}

impl Precision for f32 {}
impl Precision for f64 {}
