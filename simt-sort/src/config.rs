//! Launch configuration derived from the device profile.
//!
//! Resource limits are absorbed here, never surfaced: an undersized local
//! memory clamps the block, an odd sub-group width falls back to the
//! scan-then-broadcast ranking strategy, and the block size is forced to a
//! power of two no smaller than the state count, the shape the count
//! phase's tree reduction requires.

use log::debug;
use simt_primitives::DeviceProfile;

use crate::ordered::RADIX_STATES;
use crate::rank::PeerAlgo;

/// Geometry of one sort launch.
#[derive(Clone, Debug)]
pub(crate) struct SortConfig {
    /// Number of work-groups; each owns a contiguous slice of the input.
    pub segments: usize,
    /// Work-items per group in the count phase; also the stride unit of a
    /// group's item blocks.
    pub block_size: usize,
    /// Lock-step unit width used by the reorder phase.
    pub sub_group_size: usize,
    /// Peer-ranking strategy, chosen once per launch from the capability
    /// profile.
    pub peer_algo: PeerAlgo,
}

impl SortConfig {
    pub fn derive(profile: &DeviceProfile, n: usize) -> Self {
        let wg_size = profile.max_work_group_size.max(RADIX_STATES);
        let segments = div_round_up(n, wg_size);

        // Block size starts at the lock-step width, then yields to the
        // local-memory budget of block_size * RADIX_STATES u32 counters.
        let mut block_size = profile.sub_group_size.max(1);
        let max_counters = (profile.local_mem_bytes / std::mem::size_of::<u32>())
            .min(block_size * RADIX_STATES);
        block_size = div_round_up(max_counters, RADIX_STATES);
        block_size = round_down_pow2(block_size);
        if block_size < RADIX_STATES {
            block_size = RADIX_STATES;
        }

        // Both powers of two, so the unit width always divides the block.
        let sub_group_size = round_down_pow2(profile.sub_group_size.max(1)).min(block_size);

        let peer_algo = match sub_group_size {
            8 | 16 | 32 if profile.has_ballot => PeerAlgo::SubgroupBallot,
            8 | 16 | 32 => PeerAlgo::AtomicFetchOr,
            _ => PeerAlgo::ScanThenBroadcast,
        };

        debug!(
            "sort config: n={n} segments={segments} block={block_size} \
             sub-group={sub_group_size} strategy={peer_algo:?}"
        );

        Self {
            segments,
            block_size,
            sub_group_size,
            peer_algo,
        }
    }

    /// Item blocks each group walks; groups cover `blocks_per_segment *
    /// block_size` consecutive elements, the last group partially.
    pub fn blocks_per_segment(&self, n: usize) -> usize {
        let blocks_total = div_round_up(n, self.block_size);
        div_round_up(blocks_total, self.segments)
    }
}

pub(crate) fn div_round_up(n: usize, divisor: usize) -> usize {
    (n + divisor - 1) / divisor
}

fn round_down_pow2(x: usize) -> usize {
    let mut val = 1;
    while x >= 2 * val {
        val <<= 1;
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_geometry() {
        let cfg = SortConfig::derive(&DeviceProfile::detect(), 1_000_000);
        assert!(cfg.block_size.is_power_of_two());
        assert!(cfg.block_size >= RADIX_STATES);
        assert_eq!(cfg.block_size % cfg.sub_group_size, 0);
        assert!(cfg.segments >= 1);
    }

    #[test]
    fn test_block_never_below_state_count() {
        let profile = DeviceProfile {
            sub_group_size: 4,
            ..DeviceProfile::fallback()
        };
        let cfg = SortConfig::derive(&profile, 1000);
        assert_eq!(cfg.block_size, RADIX_STATES);
        assert_eq!(cfg.sub_group_size, 4);
        assert_eq!(cfg.peer_algo, PeerAlgo::ScanThenBroadcast);
    }

    #[test]
    fn test_local_memory_clamps_block() {
        let profile = DeviceProfile {
            sub_group_size: 64,
            local_mem_bytes: 128 * std::mem::size_of::<u32>(),
            ..DeviceProfile::fallback()
        };
        let cfg = SortConfig::derive(&profile, 1000);
        // 128 counters across 16 states leave room for 8 items; clamped back
        // up to the state count.
        assert_eq!(cfg.block_size, RADIX_STATES);
        assert_eq!(cfg.sub_group_size, 16);
    }

    #[test]
    fn test_strategy_selection_by_capability() {
        let ballot = DeviceProfile {
            sub_group_size: 32,
            has_ballot: true,
            ..DeviceProfile::fallback()
        };
        assert_eq!(
            SortConfig::derive(&ballot, 100).peer_algo,
            PeerAlgo::SubgroupBallot
        );

        let no_ballot = DeviceProfile {
            sub_group_size: 16,
            has_ballot: false,
            ..DeviceProfile::fallback()
        };
        assert_eq!(
            SortConfig::derive(&no_ballot, 100).peer_algo,
            PeerAlgo::AtomicFetchOr
        );

        let narrow = DeviceProfile {
            sub_group_size: 4,
            has_ballot: true,
            ..DeviceProfile::fallback()
        };
        assert_eq!(
            SortConfig::derive(&narrow, 100).peer_algo,
            PeerAlgo::ScanThenBroadcast
        );
    }

    #[test]
    fn test_non_pow2_sub_group_rounds_down() {
        let profile = DeviceProfile {
            sub_group_size: 48,
            ..DeviceProfile::detect()
        };
        let cfg = SortConfig::derive(&profile, 4096);
        assert_eq!(cfg.sub_group_size, 32);
        assert_eq!(cfg.block_size % cfg.sub_group_size, 0);
    }

    #[test]
    fn test_blocks_cover_range() {
        let cfg = SortConfig::derive(&DeviceProfile::detect(), 100_001);
        let covered = cfg.segments * cfg.blocks_per_segment(100_001) * cfg.block_size;
        assert!(covered >= 100_001);
    }
}
