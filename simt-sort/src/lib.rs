//! Stable comparator-parametrized radix sort over a SIMT execution model.
//!
//! LSD radix sort, four bits per digit, expressed as the three accelerator
//! phases of the classic formulation: per-group histogram counting, a
//! two-level exclusive prefix sum into a transposed offset table, and a
//! collision-free rank-and-scatter driven by lock-step peer ranking. Keys
//! are any fixed-width integer or IEEE float ([`SortKey`]); direction is a
//! runtime parameter. Floats order by IEEE-754 `totalOrder` (the
//! `f32::total_cmp` order), so NaNs and signed zeros have a defined, tested
//! position.
//!
//! ```
//! use simt_sort::RadixSorter;
//!
//! let sorter = RadixSorter::new().unwrap();
//! let mut data = vec![3i32, -1, 4, -1, 5];
//! sorter.sort(&mut data).unwrap();
//! assert_eq!(data, [-1, -1, 3, 4, 5]);
//!
//! // Asynchronous submission owning its buffer.
//! let pending = sorter.submit(vec![2.5f32, -0.5, 1.0], true);
//! assert_eq!(pending.wait().unwrap(), [-0.5, 1.0, 2.5]);
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use simt_primitives::{completion, ExecutorError, Submission};

mod config;
mod count;
mod driver;
mod reorder;
mod scan;
mod table;

pub mod ordered;
pub mod rank;

pub use ordered::{OrderedKey, SortKey, RADIX_BITS, RADIX_STATES};
pub use rank::{AtomicOrRank, BallotRank, PeerAlgo, PeerRank, ScanBroadcastRank};
pub use simt_primitives::{DeviceProfile, Executor};

/// Sort failures surfaced to the caller.
///
/// Resource limits (local memory, unsupported lock-step widths) never show
/// up here; configuration adapts to them. What remains is executor setup
/// and hard faults inside a launched kernel.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("failed to initialize execution device: {0}")]
    DeviceInit(#[from] ExecutorError),
    #[error("kernel execution fault: {0}")]
    ExecutionFault(String),
}

/// Radix sorter bound to one executor.
///
/// Cheap to clone handles out of via [`RadixSorter::executor`]; one instance
/// can sort any mix of key types and directions.
pub struct RadixSorter {
    executor: Arc<Executor>,
}

impl RadixSorter {
    /// Sorter on the detected device profile.
    pub fn new() -> Result<Self, SortError> {
        Ok(Self {
            executor: Arc::new(Executor::new()?),
        })
    }

    /// Sorter on an explicit profile.
    pub fn with_profile(profile: DeviceProfile) -> Result<Self, SortError> {
        Ok(Self {
            executor: Arc::new(Executor::with_profile(profile)?),
        })
    }

    /// Sorter sharing an existing executor.
    pub fn from_executor(executor: Arc<Executor>) -> Self {
        Self { executor }
    }

    /// The executor this sorter dispatches on.
    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    /// Sort ascending, in place, blocking until complete.
    pub fn sort<K: SortKey>(&self, keys: &mut [K]) -> Result<(), SortError> {
        self.sort_with(keys, true)
    }

    /// Sort descending, in place, blocking until complete.
    pub fn sort_descending<K: SortKey>(&self, keys: &mut [K]) -> Result<(), SortError> {
        self.sort_with(keys, false)
    }

    fn sort_with<K: SortKey>(&self, keys: &mut [K], ascending: bool) -> Result<(), SortError> {
        // Dispatch-layer special case: the engine itself requires n > 1.
        if keys.len() <= 1 {
            return Ok(());
        }
        run_engine(&self.executor, keys, ascending)
    }

    /// Submit a sort asynchronously; the handle owns the buffer and resolves
    /// to it sorted. Kernel faults surface on the handle, never as a partial
    /// result.
    pub fn submit<K: SortKey>(&self, mut keys: Vec<K>, ascending: bool) -> SortSubmission<K> {
        let executor = Arc::clone(&self.executor);
        SortSubmission {
            inner: completion::submit(move || {
                if keys.len() > 1 {
                    run_engine(&executor, &mut keys, ascending)?;
                }
                Ok(keys)
            }),
        }
    }
}

/// Sort `keys` on `sorter`'s execution context, resolving to the sorted
/// buffer. Free-function form of [`RadixSorter::submit`].
pub fn radix_sort<K: SortKey>(
    sorter: &RadixSorter,
    keys: Vec<K>,
    ascending: bool,
) -> SortSubmission<K> {
    sorter.submit(keys, ascending)
}

/// Completion handle for a submitted sort.
pub struct SortSubmission<K: SortKey> {
    inner: Submission<Result<Vec<K>, SortError>>,
}

impl<K: SortKey> SortSubmission<K> {
    /// Block until the sort completes and take ownership of the buffer.
    pub fn wait(self) -> Result<Vec<K>, SortError> {
        match self.inner.wait() {
            Ok(result) => result,
            Err(lost) => Err(SortError::ExecutionFault(lost.to_string())),
        }
    }
}

/// Run the engine, converting a kernel panic into an asynchronous-style
/// fault instead of unwinding into the caller.
fn run_engine<K: SortKey>(
    executor: &Executor,
    keys: &mut [K],
    ascending: bool,
) -> Result<(), SortError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        driver::parallel_radix_sort(executor, keys, ascending)
    }));
    outcome.map_err(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "kernel panicked".to_string());
        SortError::ExecutionFault(msg)
    })
}
