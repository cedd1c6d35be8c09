//! Stacking Module
//!
//! Z-order helpers. Ordering is "highest z-index wins"; values are not
//! contiguous, so the next value is always recomputed from the current
//! maximum rather than tracked as a counter.

use crate::wm::window::{ManagedWindow, WindowId};

/// Highest z-index among `windows`
pub fn max_z_index<'a>(windows: impl IntoIterator<Item = &'a ManagedWindow>) -> Option<i64> {
    windows.into_iter().map(|w| w.state.z_index).max()
}

/// Z-index that puts a window above every window in `windows`
pub fn next_z_index<'a>(windows: impl IntoIterator<Item = &'a ManagedWindow>) -> i64 {
    max_z_index(windows).unwrap_or(0) + 1
}

/// Window ids ordered bottom to top
///
/// Equal z-indices keep their open order, which matches how the host
/// paints siblings with the same stacking value.
pub fn stacking_order(windows: &[ManagedWindow]) -> Vec<WindowId> {
    let mut order: Vec<(usize, &ManagedWindow)> = windows.iter().enumerate().collect();
    order.sort_by_key(|(index, w)| (w.state.z_index, *index));
    order.into_iter().map(|(_, w)| w.id.clone()).collect()
}

/// Topmost window, if any
pub fn topmost(windows: &[ManagedWindow]) -> Option<&WindowId> {
    windows
        .iter()
        .enumerate()
        .max_by_key(|(index, w)| (w.state.z_index, *index))
        .map(|(_, w)| &w.id)
}
