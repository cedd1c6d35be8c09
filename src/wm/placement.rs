//! Placement Module
//!
//! Minimized-icon placement. Icons go into a grid of icon-sized cells,
//! left to right, skipping cells an existing icon already covers. Rows
//! are scanned from the highest row index down; row `r` sits
//! `(r + 1)` cells above the bottom edge, so the first icon lands in the
//! topmost full row.

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::shared::{Geometry, Size};
use crate::wm::window::WindowId;

/// Geometry and stacking captured right before a window was minimized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreMinimizeState {
    pub geometry: Geometry,
    pub z_index: i64,
}

/// A minimized window's icon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizedIcon {
    pub x: f64,
    pub y: f64,
    pub pre_minimize: PreMinimizeState,
}

/// Minimized windows keyed by id
///
/// Presence in the table is what makes a window minimized; there is no
/// separate membership set to keep in sync.
#[derive(Debug, Clone, Default)]
pub struct IconTable {
    icons: HashMap<WindowId, MinimizedIcon>,
}

impl IconTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.icons.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&MinimizedIcon> {
        self.icons.get(id)
    }

    pub fn insert(&mut self, id: WindowId, icon: MinimizedIcon) {
        self.icons.insert(id, icon);
    }

    pub fn remove(&mut self, id: &str) -> Option<MinimizedIcon> {
        self.icons.remove(id)
    }

    /// Move an icon, leaving its snapshot untouched
    pub fn move_icon(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.icons.get_mut(id) {
            Some(icon) => {
                icon.x = x;
                icon.y = y;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.icons.values().map(|icon| (icon.x, icon.y))
    }
}

/// First free icon cell in the grid
///
/// A cell is occupied when an icon sits less than one icon width away
/// horizontally and less than one icon height away vertically. Once the
/// whole grid is taken, icons wrap along the top row and may overlap.
/// With no measurable viewport the icon goes to the top-left margin.
pub fn find_available_position(
    layout: &LayoutConfig,
    viewport: Option<Size>,
    icons: &IconTable,
) -> (f64, f64) {
    let (icon_w, icon_h, margin) = (layout.icon_width, layout.icon_height, layout.icon_margin);

    let Some(size) = viewport else {
        return (margin, margin);
    };

    let cols = ((size.width - margin) / (icon_w + margin)).floor().max(0.0) as usize;
    let rows = ((size.height - margin) / (icon_h + margin)).floor().max(0.0) as usize;

    let occupied = |x: f64, y: f64| {
        icons
            .positions()
            .any(|(ix, iy)| (ix - x).abs() < icon_w && (iy - y).abs() < icon_h)
    };

    for row in (0..rows).rev() {
        for col in 0..cols {
            let x = margin + col as f64 * (icon_w + margin);
            let y = size.height - (row as f64 + 1.0) * (icon_h + margin);

            if !occupied(x, y) {
                return (x, y);
            }
        }
    }

    // Grid exhausted
    let col = if cols == 0 { 0 } else { icons.len() % cols };
    (margin + col as f64 * (icon_w + margin), margin)
}
