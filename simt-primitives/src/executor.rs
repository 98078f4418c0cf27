//! Work-group dispatch across a worker pool.
//!
//! An [`Executor`] plays the role of the device queue: `dispatch` launches
//! one kernel invocation per work-group and returns once every group has
//! completed, which is the completion barrier separating dependent phases.

use log::debug;
use rayon::prelude::*;

use crate::device::DeviceProfile;

/// Executor construction failures.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),
}

/// Dispatches data-parallel kernels over a pool sized to the device profile.
pub struct Executor {
    pool: rayon::ThreadPool,
    profile: DeviceProfile,
}

impl Executor {
    /// Executor for the detected device profile.
    pub fn new() -> Result<Self, ExecutorError> {
        Self::with_profile(DeviceProfile::detect())
    }

    /// Executor for an explicit profile.
    pub fn with_profile(profile: DeviceProfile) -> Result<Self, ExecutorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(profile.compute_units.max(1))
            .thread_name(|i| format!("simt-worker-{i}"))
            .build()
            .map_err(|e| ExecutorError::PoolBuild(e.to_string()))?;
        debug!("executor up: {} workers", profile.compute_units.max(1));
        Ok(Self { pool, profile })
    }

    /// The profile this executor was built for.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Run `kernel` once per work-group, in parallel, and wait for all
    /// groups. A panicking kernel unwinds out of this call; callers that
    /// need fault isolation catch at the submission boundary.
    pub fn dispatch<F>(&self, groups: usize, kernel: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        if groups == 0 {
            return;
        }
        self.pool
            .install(|| (0..groups).into_par_iter().for_each(|group| kernel(group)));
    }
}
