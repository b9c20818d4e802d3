//! Error types for state-vector operations

use thiserror::Error;

/// Everything that can go wrong while constructing or driving a state vector.
///
/// Argument errors are detected synchronously, before any task is generated,
/// so a failed call leaves the amplitude buffer untouched. `WorkerPanic` is
/// the one exception: it reports a fault inside a worker thread, after which
/// the buffer is partially updated and the state vector is poisoned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("qubit count must be nonzero")]
    ZeroQubitCount,

    #[error("task size must be nonzero")]
    ZeroTaskSize,

    #[error("thread count must be nonzero")]
    ZeroThreadCount,

    #[error("qubit count {qubit_count} exceeds the supported maximum of {max}")]
    QubitCountTooLarge { qubit_count: usize, max: usize },

    #[error("qubit index {index} out of range for {qubit_count}-qubit state")]
    QubitOutOfRange { index: usize, qubit_count: usize },

    #[error("two-qubit gate needs two distinct qubits, got {index} twice")]
    DuplicateQubit { index: usize },

    #[error("multi-index has {actual} bits, expected {expected}")]
    MultiIndexLength { expected: usize, actual: usize },

    #[error("multi-index bit at position {position} is {value}, expected 0 or 1")]
    InvalidBit { position: usize, value: u8 },

    #[error("state vector contains NaN or infinite amplitudes")]
    NonFiniteAmplitude,

    #[error("state vector is not normalized, norm squared = {norm_sqr}")]
    NotNormalized { norm_sqr: f64 },

    #[error("a worker thread panicked during gate application, state is inconsistent")]
    WorkerPanic,

    #[error("state vector was poisoned by an earlier worker fault")]
    Poisoned,
}

/// Result type for state-vector operations
pub type Result<T> = std::result::Result<T, Error>;
