//! Bulk layouts: tile and cascade
//!
//! Both functions only compute slots; the window manager assigns them to
//! the visible windows in iteration order.

use crate::config::LayoutConfig;
use crate::shared::{Geometry, Size};

/// Grid dimensions used to tile `count` windows
pub fn tile_grid(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (cols, rows)
}

/// One cell per window, row-major, over a `ceil(sqrt(n))`-column grid
///
/// Cell sizes are floored, so up to `cols - 1` pixels on the right and
/// `rows - 1` at the bottom stay uncovered.
pub fn tile_cells(count: usize, viewport: Size) -> Vec<Geometry> {
    let (cols, rows) = tile_grid(count);
    if cols == 0 {
        return Vec::new();
    }

    let cell_width = (viewport.width / cols as f64).floor();
    let cell_height = (viewport.height / rows as f64).floor();

    (0..count)
        .map(|i| {
            let row = i / cols;
            let col = i % cols;
            Geometry::new(
                col as f64 * cell_width,
                row as f64 * cell_height,
                cell_width,
                cell_height,
            )
        })
        .collect()
}

/// Cascade slot for the window at each index, with its new z-index
///
/// Every window gets the same size; z-indices restart at 1.
pub fn cascade_slots(count: usize, viewport: Size, layout: &LayoutConfig) -> Vec<(Geometry, i64)> {
    let width = layout.default_width.min(viewport.width * layout.viewport_scale);
    let height = layout.default_height.min(viewport.height * layout.viewport_scale);

    (0..count)
        .map(|i| {
            let offset = layout.cascade_offset * i as f64;
            (Geometry::new(offset, offset, width, height), i as i64 + 1)
        })
        .collect()
}
