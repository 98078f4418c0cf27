//! Count phase: one bucket histogram row per work-group.
//!
//! Each work-group walks its contiguous slice of the input in block-sized
//! strides, every work-item keeping a private 16-counter array, then reduces
//! all private arrays in group-local memory and stores the result as one
//! transposed row of the histogram table. Out-of-range indices in the last
//! partial group are masked off and contribute nothing.

use crate::config::SortConfig;
use crate::ordered::{bucket_of, SortKey, RADIX_STATES};
use crate::table::HistogramTable;

/// Kernel body for one work-group of the count dispatch.
pub(crate) fn count_kernel<K: SortKey, const ASC: bool>(
    group: usize,
    input: &[K],
    table: &HistogramTable,
    cfg: &SortConfig,
    iteration: u32,
) {
    let n = input.len();
    let block_size = cfg.block_size;
    let blocks = cfg.blocks_per_segment(n);
    let base = blocks * block_size * group;

    // Group-local counter array, item-major: slot(item, state) holds item's
    // private count for state.
    let mut local = vec![0u32; block_size * RADIX_STATES];

    // Step 1: private counts per work-item over the block-strided slice,
    // then spill to local memory. (Group barrier here on hardware.)
    for item in 0..block_size {
        let mut counts = [0u32; RADIX_STATES];
        for block in 0..blocks {
            let idx = base + block * block_size + item;
            if idx < n {
                let bucket = bucket_of::<K::Ordered, ASC>(input[idx].to_ordered(), iteration);
                counts[bucket as usize] += 1;
            }
        }
        local[RADIX_STATES * item..][..RADIX_STATES].copy_from_slice(&counts);
    }

    // Step 2a: fold the upper sections onto the first block_size slots, all
    // items active. (Barrier.)
    for item in 0..block_size {
        for section in 1..RADIX_STATES {
            local[item] += local[section * block_size + item];
        }
    }

    // Step 2b: tree-halve down to RADIX_STATES slots, halving the active
    // items each round. (Barrier per round.) block_size is a power of two
    // and a multiple of RADIX_STATES, so every fold preserves each slot's
    // index residue modulo RADIX_STATES; slot s ends up holding the group
    // total for state s.
    let mut active = block_size >> 1;
    while active >= RADIX_STATES {
        for item in 0..active {
            local[item] += local[active + item];
        }
        active >>= 1;
    }

    // Step 3: store the row transposed, so same-state counts of all groups
    // sit adjacent for the scan phase.
    for state in 0..RADIX_STATES {
        unsafe { table.store_count(state, group, local[state]) };
    }
}
