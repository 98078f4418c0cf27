//! Scan phase: histogram rows to scatter base offsets, in two levels.
//!
//! Level one runs one sub-task per bucket state: an in-place exclusive
//! prefix sum over that state's contiguous row, leaving in each group column
//! the number of same-state elements owned by earlier groups and in the
//! sentinel column the state's total. Level two is a single small task that
//! exclusive-scans the sixteen sentinels into the global base-offset slots.
//! For any (group, state), `global(state) + row(state, group)` is then the
//! first output position of that group's elements of that state.

use simt_primitives::collectives;

use crate::ordered::RADIX_STATES;
use crate::table::HistogramTable;

/// Kernel body for one state's row of the local scan dispatch.
pub(crate) fn local_scan_kernel(state: usize, table: &HistogramTable) {
    let row = unsafe { table.row_mut(state) };
    collectives::exclusive_scan_in_place(row);
}

/// Kernel body of the global scan task: one work-item per state.
pub(crate) fn global_scan_kernel(table: &HistogramTable) {
    let mut totals = [0u32; RADIX_STATES];
    {
        let view = unsafe { table.view() };
        for (state, total) in totals.iter_mut().enumerate() {
            *total = view[table.sentinel_index(state)];
        }
    }
    collectives::exclusive_scan_in_place(&mut totals);
    let globals = unsafe { table.globals_mut() };
    globals.copy_from_slice(&totals);
}
