//! Reorder phase: rank-and-scatter every element to its digit position.
//!
//! One lock-step unit per work-group. The group loads its sixteen running
//! bucket offsets (global base plus this group's exclusive local count),
//! then walks its input slice in unit-sized chunks. For each chunk and each
//! bucket state, the peer-ranking strategy yields every lane's rank among
//! matching peers and the chunk's match total; rank plus running offset is
//! the lane's destination, and the total advances the offset for the next
//! chunk. Lanes past the end of the range are padded with the sentinel key
//! so the unit stays full for the collectives; they rank like any lane but
//! never write. The (state, group, chunk, rank) coordinates are globally
//! unique, so no two elements ever share a destination.

use simt_primitives::DeviceBuffer;

use crate::config::SortConfig;
use crate::ordered::{bucket_of, padding_key, SortKey, RADIX_STATES};
use crate::rank::PeerRank;
use crate::table::HistogramTable;

/// Kernel body for one work-group of the reorder dispatch.
pub(crate) fn reorder_kernel<K: SortKey, const ASC: bool, P: PeerRank>(
    group: usize,
    input: &[K],
    output: &DeviceBuffer<K>,
    table: &HistogramTable,
    cfg: &SortConfig,
    iteration: u32,
) {
    let n = input.len();
    let unit = cfg.sub_group_size;
    let blocks = cfg.blocks_per_segment(n);
    let chunks = blocks * (cfg.block_size / unit);
    let base = blocks * cfg.block_size * group;

    let counts = unsafe { table.view() };
    let mut offsets = [0u32; RADIX_STATES];
    for (state, offset) in offsets.iter_mut().enumerate() {
        *offset = counts[table.global_index(state)] + counts[table.count_index(state, group)];
    }

    let mut rank = P::for_unit(unit);
    let mut buckets = vec![0u32; unit];
    let mut matches = vec![false; unit];
    let mut ranks = vec![0u32; unit];
    let mut dests = vec![0u32; unit];

    for chunk in 0..chunks {
        let first = base + unit * chunk;

        for lane in 0..unit {
            let idx = first + lane;
            let ordered = if idx < n {
                input[idx].to_ordered()
            } else {
                padding_key::<K::Ordered, ASC>()
            };
            buckets[lane] = bucket_of::<K::Ordered, ASC>(ordered, iteration);
            dests[lane] = 0;
        }

        for state in 0..RADIX_STATES {
            for lane in 0..unit {
                matches[lane] = buckets[lane] == state as u32;
            }
            let total = rank.peer_contribution(&matches, &mut ranks);
            for lane in 0..unit {
                dests[lane] |= (matches[lane] as u32) * (offsets[state] + ranks[lane]);
            }
            offsets[state] += total;
        }

        for lane in 0..unit {
            let idx = first + lane;
            if idx < n {
                unsafe { output.write(dests[lane] as usize, input[idx]) };
            }
        }
    }
}
