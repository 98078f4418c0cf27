//! Iteration driver: one count → scan → reorder pass per radix digit.
//!
//! Buffers ping-pong between digits: even digits read the front buffer and
//! write the back, odd digits the reverse. The digit count is even for every
//! supported key width, so the final reorder always lands back in the front
//! buffer. Phases within a digit are strictly sequenced: each dispatch
//! returns only once every group's writes are visible, the host-side wait
//! that stands in for a device event chain.

use log::{debug, trace};
use simt_primitives::{DeviceBuffer, Executor};

use crate::config::SortConfig;
use crate::count::count_kernel;
use crate::ordered::{radix_iterations, SortKey, RADIX_STATES};
use crate::rank::{AtomicOrRank, BallotRank, PeerAlgo, PeerRank, ScanBroadcastRank};
use crate::reorder::reorder_kernel;
use crate::scan::{global_scan_kernel, local_scan_kernel};
use crate::table::HistogramTable;

/// Sort `keys` in the requested direction.
///
/// Engine precondition: at least two elements. Shorter ranges are the
/// dispatch layer's job to special-case; passing one here is a programming
/// error, not a recoverable condition.
pub(crate) fn parallel_radix_sort<K: SortKey>(exec: &Executor, keys: &mut [K], ascending: bool) {
    assert!(
        keys.len() > 1,
        "radix engine requires a range of more than one element"
    );
    debug_assert!(keys.len() <= u32::MAX as usize, "offsets are 32-bit");
    if ascending {
        run::<K, true>(exec, keys);
    } else {
        run::<K, false>(exec, keys);
    }
}

fn run<K: SortKey, const ASC: bool>(exec: &Executor, keys: &mut [K]) {
    let n = keys.len();
    let cfg = SortConfig::derive(exec.profile(), n);
    let iterations = radix_iterations::<K>();
    debug_assert!(iterations % 2 == 0, "buffer ping-pong needs an even digit count");
    debug!(
        "radix sort: n={n} digits={iterations} ascending={ASC} segments={}",
        cfg.segments
    );

    let table = HistogramTable::new(cfg.segments);
    let mut front = DeviceBuffer::from_slice(keys);
    let back = DeviceBuffer::from_slice(keys);

    for iteration in 0..iterations {
        if iteration % 2 == 0 {
            run_iteration::<K, ASC>(exec, &cfg, &table, &front, &back, iteration);
        } else {
            run_iteration::<K, ASC>(exec, &cfg, &table, &back, &front, iteration);
        }
        trace!("digit {iteration} complete");
    }

    // Even digit count: the last reorder wrote the front buffer.
    keys.copy_from_slice(front.as_mut_slice());
}

fn run_iteration<K: SortKey, const ASC: bool>(
    exec: &Executor,
    cfg: &SortConfig,
    table: &HistogramTable,
    input: &DeviceBuffer<K>,
    output: &DeviceBuffer<K>,
    iteration: u32,
) {
    // The input buffer is only read this iteration; the table and output
    // are written by disjoint owners per the kernel contracts.
    let input = unsafe { input.view() };

    exec.dispatch(cfg.segments, |group| {
        count_kernel::<K, ASC>(group, input, table, cfg, iteration)
    });

    exec.dispatch(RADIX_STATES, |state| local_scan_kernel(state, table));
    exec.dispatch(1, |_| global_scan_kernel(table));

    match cfg.peer_algo {
        PeerAlgo::SubgroupBallot => {
            dispatch_reorder::<K, ASC, BallotRank>(exec, cfg, table, input, output, iteration)
        }
        PeerAlgo::AtomicFetchOr => {
            dispatch_reorder::<K, ASC, AtomicOrRank>(exec, cfg, table, input, output, iteration)
        }
        PeerAlgo::ScanThenBroadcast => {
            dispatch_reorder::<K, ASC, ScanBroadcastRank>(exec, cfg, table, input, output, iteration)
        }
    }
}

fn dispatch_reorder<K: SortKey, const ASC: bool, P: PeerRank>(
    exec: &Executor,
    cfg: &SortConfig,
    table: &HistogramTable,
    input: &[K],
    output: &DeviceBuffer<K>,
    iteration: u32,
) {
    exec.dispatch(cfg.segments, |group| {
        reorder_kernel::<K, ASC, P>(group, input, output, table, cfg, iteration)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use simt_primitives::DeviceProfile;

    #[test]
    fn test_sorts_two_elements() {
        let exec = Executor::with_profile(DeviceProfile::fallback()).unwrap();
        let mut keys = [9u32, 4];
        parallel_radix_sort(&exec, &mut keys, true);
        assert_eq!(keys, [4, 9]);
    }

    #[test]
    #[should_panic(expected = "more than one element")]
    fn test_single_element_is_a_programming_error() {
        let exec = Executor::with_profile(DeviceProfile::fallback()).unwrap();
        let mut keys = [1u32];
        parallel_radix_sort(&exec, &mut keys, true);
    }

    #[test]
    fn test_every_strategy_sorts() {
        let base = DeviceProfile::detect();
        let profiles = [
            DeviceProfile {
                sub_group_size: 32,
                has_ballot: true,
                ..base.clone()
            },
            DeviceProfile {
                sub_group_size: 16,
                has_ballot: false,
                ..base.clone()
            },
            DeviceProfile {
                sub_group_size: 4,
                has_ballot: true,
                ..base
            },
        ];
        let input: Vec<u32> = (0..4099u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let mut expected = input.clone();
        expected.sort_unstable();
        for profile in profiles {
            let exec = Executor::with_profile(profile).unwrap();
            let mut keys = input.clone();
            parallel_radix_sort(&exec, &mut keys, true);
            assert_eq!(keys, expected);
        }
    }
}
