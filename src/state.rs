//! State-vector orchestration and the public gate API.

use log::debug;
use num_complex::Complex;
use num_traits::{One, ToPrimitive, Zero};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index;
use crate::partition::{OneQubitPartition, TwoQubitPartition};
use crate::scheduler;
use crate::task::{BufferView, OneQubitGate, TwoQubitGate};
use crate::Precision;

/// Largest supported register: beyond this the contiguous amplitude buffer
/// stops being a realistic single allocation on shared-memory hosts.
pub const MAX_QUBIT_COUNT: usize = 30;

/// Free-index chunk granularity used when the caller does not pick one.
pub const DEFAULT_TASK_SIZE: usize = 4096;

/// Decomposition parameters for gate application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Config {
    /// free indices per generated task
    pub task_size: usize,
    /// worker threads per gate application
    pub thread_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            task_size: DEFAULT_TASK_SIZE,
            thread_count: num_cpus::get().max(1),
        }
    }
}

/// Full complex amplitude vector of an n-qubit register.
///
/// The buffer holds exactly `2^qubit_count` amplitudes, allocated once at
/// construction and never reallocated. Gate application mutates it in place:
/// the request is decomposed into disjoint tasks and drained by a worker pool
/// before the call returns, so every `apply_*` call is synchronous and the
/// buffer is fully updated on `Ok`.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct StateVector<T: Precision = f64> {
    qubit_count: usize,
    task_size: usize,
    thread_count: usize,
    amps: Vec<Complex<T>>,
    #[serde(skip)]
    poisoned: bool,
}

impl<T: Precision> StateVector<T> {
    /// Creates an n-qubit register in the all-zero basis state.
    pub fn new(qubit_count: usize, task_size: usize, thread_count: usize) -> Result<Self> {
        if qubit_count == 0 {
            return Err(Error::ZeroQubitCount);
        }
        if task_size == 0 {
            return Err(Error::ZeroTaskSize);
        }
        if thread_count == 0 {
            return Err(Error::ZeroThreadCount);
        }
        if qubit_count > MAX_QUBIT_COUNT {
            return Err(Error::QubitCountTooLarge {
                qubit_count,
                max: MAX_QUBIT_COUNT,
            });
        }
        let mut amps = vec![Complex::zero(); 1 << qubit_count];
        amps[0] = Complex::one();
        Ok(Self {
            qubit_count,
            task_size,
            thread_count,
            amps,
            poisoned: false,
        })
    }

    /// Creates a register with [`Config::default`] decomposition parameters.
    pub fn with_defaults(qubit_count: usize) -> Result<Self> {
        let config = Config::default();
        Self::new(qubit_count, config.task_size, config.thread_count)
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// The full amplitude buffer, linear-index order.
    pub fn amplitudes(&self) -> &[Complex<T>] {
        &self.amps
    }

    /// True once a worker fault has left the buffer inconsistent; every
    /// subsequent gate application is refused.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Amplitude of one basis state given as a bit multi-index
    /// (`multi_index[k]` is qubit k's basis value).
    pub fn read_amplitude(&self, multi_index: &[u8]) -> Result<Complex<T>> {
        if multi_index.len() != self.qubit_count {
            return Err(Error::MultiIndexLength {
                expected: self.qubit_count,
                actual: multi_index.len(),
            });
        }
        let linear = index::linear_from_bits(multi_index)?;
        Ok(self.amps[linear])
    }

    /// Applies a 2x2 gate to `qubit_index`, in place.
    pub fn apply_one_qubit_gate(
        &mut self,
        gate: &OneQubitGate<T>,
        qubit_index: usize,
    ) -> Result<()> {
        self.check_usable()?;
        self.check_qubit(qubit_index)?;
        debug!(
            "one-qubit gate on qubit {} ({} amplitudes, {} threads)",
            qubit_index,
            self.amps.len(),
            self.thread_count
        );
        let (task_size, thread_count) = (self.task_size, self.thread_count);
        let qubit_count = self.qubit_count;
        let result = {
            let tasks = OneQubitPartition::new(
                BufferView::new(&mut self.amps),
                *gate,
                qubit_index,
                qubit_count,
                task_size,
            );
            scheduler::run_tasks(tasks, thread_count)
        };
        self.record_outcome(result)
    }

    /// Applies a 4x4 gate to the pair (`qubit_index_1`, `qubit_index_2`), in
    /// place. `qubit_index_1` is the high bit of the matrix basis.
    pub fn apply_two_qubit_gate(
        &mut self,
        gate: &TwoQubitGate<T>,
        qubit_index_1: usize,
        qubit_index_2: usize,
    ) -> Result<()> {
        self.check_usable()?;
        self.check_qubit(qubit_index_1)?;
        self.check_qubit(qubit_index_2)?;
        if qubit_index_1 == qubit_index_2 {
            return Err(Error::DuplicateQubit {
                index: qubit_index_1,
            });
        }
        debug!(
            "two-qubit gate on qubits ({}, {}) ({} amplitudes, {} threads)",
            qubit_index_1,
            qubit_index_2,
            self.amps.len(),
            self.thread_count
        );
        let (task_size, thread_count) = (self.task_size, self.thread_count);
        let qubit_count = self.qubit_count;
        let result = {
            let tasks = TwoQubitPartition::new(
                BufferView::new(&mut self.amps),
                *gate,
                qubit_index_1,
                qubit_index_2,
                qubit_count,
                task_size,
            );
            scheduler::run_tasks(tasks, thread_count)
        };
        self.record_outcome(result)
    }

    /// Probability of each basis state, without measuring.
    pub fn probabilities(&self) -> Vec<T> {
        self.amps.par_iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of all basis-state probabilities; 1 for any normalized state,
    /// invariant under unitary gates up to floating rounding.
    pub fn total_probability(&self) -> T {
        self.amps.par_iter().map(|a| a.norm_sqr()).sum()
    }

    /// Checks the buffer for NaN/infinite amplitudes and for normalization
    /// within `tolerance` of 1.
    pub fn validate(&self, tolerance: T) -> Result<()> {
        let finite = self
            .amps
            .par_iter()
            .all(|a| a.re.is_finite() && a.im.is_finite());
        if !finite {
            return Err(Error::NonFiniteAmplitude);
        }
        let norm_sqr = self.total_probability();
        if (norm_sqr - T::one()).abs() > tolerance {
            return Err(Error::NotNormalized {
                norm_sqr: norm_sqr.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    // the fault protocol for one gate application: any scheduler error
    // leaves the buffer only piecewise consistent, so the state is poisoned
    // before the error is handed back
    pub(crate) fn record_outcome(&mut self, result: Result<()>) -> Result<()> {
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn check_usable(&self) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        Ok(())
    }

    fn check_qubit(&self, index: usize) -> Result<()> {
        if index >= self.qubit_count {
            return Err(Error::QubitOutOfRange {
                index,
                qubit_count: self.qubit_count,
            });
        }
        Ok(())
    }
}

// deserialization re-checks every construction invariant: a buffer whose
// length disagrees with the qubit count would turn later gate applications
// into out-of-bounds writes, so it must never come into existence.
impl<'de, T> Deserialize<'de> for StateVector<T>
where
    T: Precision + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        #[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
        struct Raw<T> {
            qubit_count: usize,
            task_size: usize,
            thread_count: usize,
            amps: Vec<Complex<T>>,
        }

        let raw: Raw<T> = Raw::deserialize(deserializer)?;
        let mut state = StateVector::new(raw.qubit_count, raw.task_size, raw.thread_count)
            .map_err(D::Error::custom)?;
        if raw.amps.len() != state.amps.len() {
            return Err(D::Error::custom(format!(
                "amplitude buffer has {} entries, expected {}",
                raw.amps.len(),
                state.amps.len(),
            )));
        }
        state.amps = raw.amps;
        Ok(state)
    }
}
