//! Peer-ranking strategies for the scatter phase.
//!
//! Within one lock-step unit, every lane needs to know how many peers below
//! it hold the candidate bucket value (its rank) and how many hold it in
//! total (the amount the running bucket offset advances for the next chunk).
//! Three functionally identical strategies compute the pair; the launch
//! configuration picks one per device capability and it stays fixed for the
//! whole sort.

use std::sync::atomic::{AtomicU32, Ordering};

use simt_primitives::collectives;

/// Which strategy a launch uses; selected once at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerAlgo {
    /// Single ballot collective materializes the match mask. Needs a native
    /// ballot and a unit width of 8, 16 or 32.
    SubgroupBallot,
    /// Lanes OR their bit into a unit-scope atomic accumulator. Same mask as
    /// ballot, for devices without the native collective.
    AtomicFetchOr,
    /// Exclusive 0/1 sum-scan plus broadcast. Works at any unit width.
    ScanThenBroadcast,
}

/// Rank-and-total contract shared by the strategies.
///
/// `matches[l]` says whether lane `l` holds the candidate bucket value. On
/// return, `ranks[l]` is the number of matching lanes strictly below `l`,
/// and the returned value is the number of matching lanes in the whole
/// unit. All strategies produce identical output for identical input.
pub trait PeerRank {
    /// Instance for a unit of `unit_width` lanes.
    fn for_unit(unit_width: usize) -> Self
    where
        Self: Sized;

    fn peer_contribution(&mut self, matches: &[bool], ranks: &mut [u32]) -> u32;
}

/// Ballot-based ranking.
pub struct BallotRank;

impl PeerRank for BallotRank {
    fn for_unit(unit_width: usize) -> Self {
        debug_assert!(unit_width <= collectives::MAX_BALLOT_LANES);
        BallotRank
    }

    fn peer_contribution(&mut self, matches: &[bool], ranks: &mut [u32]) -> u32 {
        let mask = collectives::ballot(matches);
        for (lane, rank) in ranks.iter_mut().enumerate() {
            *rank = (mask & collectives::lane_mask_lt(lane)).count_ones();
        }
        mask.count_ones()
    }
}

/// Atomic-OR ranking: the mask is accumulated in shared state instead of a
/// ballot instruction.
pub struct AtomicOrRank {
    mask: AtomicU32,
}

impl PeerRank for AtomicOrRank {
    fn for_unit(unit_width: usize) -> Self {
        debug_assert!(unit_width <= collectives::MAX_BALLOT_LANES);
        AtomicOrRank {
            mask: AtomicU32::new(0),
        }
    }

    fn peer_contribution(&mut self, matches: &[bool], ranks: &mut [u32]) -> u32 {
        // Lane 0 resets the accumulator for each candidate state.
        self.mask.store(0, Ordering::Relaxed);
        for (lane, &matched) in matches.iter().enumerate() {
            self.mask
                .fetch_or((matched as u32) << lane, Ordering::Relaxed);
        }
        let mask = self.mask.load(Ordering::Relaxed);
        for (lane, rank) in ranks.iter_mut().enumerate() {
            *rank = (mask & collectives::lane_mask_lt(lane)).count_ones();
        }
        mask.count_ones()
    }
}

/// Scan-then-broadcast ranking: rank falls out of an exclusive sum-scan of
/// the match indicator; the total is the last lane's inclusive value.
pub struct ScanBroadcastRank {
    indicator: Vec<u32>,
}

impl PeerRank for ScanBroadcastRank {
    fn for_unit(unit_width: usize) -> Self {
        ScanBroadcastRank {
            indicator: vec![0; unit_width],
        }
    }

    fn peer_contribution(&mut self, matches: &[bool], ranks: &mut [u32]) -> u32 {
        let lanes = matches.len();
        debug_assert_eq!(lanes, self.indicator.len());
        for (slot, &matched) in self.indicator.iter_mut().zip(matches) {
            *slot = matched as u32;
        }
        collectives::exclusive_scan_in_place(&mut self.indicator);
        ranks.copy_from_slice(&self.indicator);
        // The last exclusive value misses the last lane's own copy.
        collectives::broadcast(&self.indicator, lanes - 1) + matches[lanes - 1] as u32
    }
}
