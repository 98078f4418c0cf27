//! The transposed histogram/offset table shared by the three phases.
//!
//! One `u32` buffer, laid out state-major so each bucket state's counts form
//! one contiguous row the scan phase can sweep linearly:
//!
//! ```text
//! index(state, group) = state * (segments + 1) + group     group < segments
//! sentinel(state)     = index(state, segments)             state total after local scan
//! global(state)       = STATES * (segments + 1) + state    base offset after global scan
//! ```
//!
//! The count phase writes the `group` columns, the local scan rewrites each
//! row in place (filling the sentinel), the global scan fills the trailing
//! global slots, and the reorder phase reads the lot. The same buffer is
//! reused across digit iterations; every slot a phase reads was written
//! earlier in the same iteration.

use simt_primitives::DeviceBuffer;

use crate::ordered::RADIX_STATES;

pub(crate) struct HistogramTable {
    buf: DeviceBuffer<u32>,
    segments: usize,
}

impl HistogramTable {
    pub fn new(segments: usize) -> Self {
        Self {
            buf: DeviceBuffer::zeroed(RADIX_STATES * (segments + 1) + RADIX_STATES),
            segments,
        }
    }

    /// Columns per row: one per group plus the trailing sentinel.
    pub fn row_width(&self) -> usize {
        self.segments + 1
    }

    pub fn count_index(&self, state: usize, group: usize) -> usize {
        debug_assert!(state < RADIX_STATES && group < self.row_width());
        state * self.row_width() + group
    }

    pub fn sentinel_index(&self, state: usize) -> usize {
        self.count_index(state, self.segments)
    }

    pub fn global_index(&self, state: usize) -> usize {
        debug_assert!(state < RADIX_STATES);
        RADIX_STATES * self.row_width() + state
    }

    /// Read-only view for phases that only consume the table.
    ///
    /// # Safety
    /// No kernel may be writing the table while the view is alive.
    pub unsafe fn view(&self) -> &[u32] {
        self.buf.view()
    }

    /// One state's row, for the in-place local scan.
    ///
    /// # Safety
    /// At most one kernel may hold a given state's row; rows are disjoint.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn row_mut(&self, state: usize) -> &mut [u32] {
        self.buf
            .view_mut_range(self.count_index(state, 0), self.row_width())
    }

    /// The trailing global-offset slots, for the global scan.
    ///
    /// # Safety
    /// Single-writer: only the global scan task may hold this view.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn globals_mut(&self) -> &mut [u32] {
        self.buf
            .view_mut_range(RADIX_STATES * self.row_width(), RADIX_STATES)
    }

    /// Store one count cell from the count phase.
    ///
    /// # Safety
    /// Each (state, group) cell is written by exactly one work-group.
    pub unsafe fn store_count(&self, state: usize, group: usize, value: u32) {
        self.buf.write(self.count_index(state, group), value);
    }
}
