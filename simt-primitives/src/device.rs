//! Device capability introspection.
//!
//! Reports the configuration numbers the compute engines derive their launch
//! geometry from: maximum work-group size, lock-step sub-group width, local
//! (group-shared) memory capacity, and whether a native ballot collective is
//! available. When host introspection fails, [`DeviceProfile::fallback`]
//! supplies conservative defaults.

use std::thread;

use log::debug;

/// Capability profile of the execution device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Largest work-group the device schedules as one barrier domain.
    pub max_work_group_size: usize,
    /// Width of a lock-step execution unit (warp/wavefront/sub-group).
    pub sub_group_size: usize,
    /// Group-shared local memory capacity in bytes.
    pub local_mem_bytes: usize,
    /// Number of independent compute units; sizes the worker pool.
    pub compute_units: usize,
    /// Whether the device exposes a single-instruction ballot collective.
    pub has_ballot: bool,
}

impl DeviceProfile {
    /// Detect the profile of the current host.
    ///
    /// Group geometry and local memory use the defaults of a contemporary
    /// accelerator; the compute-unit count comes from the host. Falls back
    /// to [`DeviceProfile::fallback`] when introspection is unavailable.
    pub fn detect() -> Self {
        match thread::available_parallelism() {
            Ok(units) => {
                let profile = Self {
                    max_work_group_size: 256,
                    sub_group_size: 32,
                    local_mem_bytes: 32 * 1024,
                    compute_units: units.get(),
                    has_ballot: true,
                };
                debug!(
                    "device profile: {} compute units, wg={} sg={} local={}B",
                    profile.compute_units,
                    profile.max_work_group_size,
                    profile.sub_group_size,
                    profile.local_mem_bytes
                );
                profile
            }
            Err(_) => {
                debug!("device introspection unavailable, using fallback profile");
                Self::fallback()
            }
        }
    }

    /// Conservative profile used when introspection is unavailable: small
    /// groups, narrow sub-group, no native ballot.
    pub fn fallback() -> Self {
        Self {
            max_work_group_size: 64,
            sub_group_size: 8,
            local_mem_bytes: 16 * 1024,
            compute_units: 1,
            has_ballot: false,
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::detect()
    }
}
