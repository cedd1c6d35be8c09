//! Window state shared between the window manager and persistence
//!
//! `WindowState` is the record stored per open document in the
//! `openWindows` map, so its serialized field names follow that format.

use serde::{Deserialize, Serialize};

/// Window geometry in viewport-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rectangle lies entirely inside a `size` viewport anchored at the origin
    ///
    /// Edges are compared with a small tolerance, since clamped positions
    /// are computed as `viewport - size` and added back.
    pub fn fits_within(&self, size: Size) -> bool {
        const EPSILON: f64 = 1e-6;
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= size.width + EPSILON
            && self.bottom() <= size.height + EPSILON
    }
}

/// Measured viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A container that has not been laid out yet reports a zero (or
    /// garbage) size; nothing should be computed against it.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Geometry, stacking and maximize state of one document window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i64,
    pub is_maximized: bool,
    /// Geometry captured when the window was last maximized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_maximize_state: Option<Geometry>,
}

impl WindowState {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
    }
}

/// Partial window state
///
/// Used both as the upward change notification emitted by the window
/// manager and as the persisted record read back at startup, where older
/// files may be missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_maximized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_maximize_state: Option<Geometry>,
}

impl WindowStateUpdate {
    /// Fields of `new` that differ from `old`
    pub fn diff(old: &WindowState, new: &WindowState) -> Self {
        fn changed<T: PartialEq + Copy>(old: T, new: T) -> Option<T> {
            (old != new).then_some(new)
        }

        Self {
            x: changed(old.x, new.x),
            y: changed(old.y, new.y),
            width: changed(old.width, new.width),
            height: changed(old.height, new.height),
            z_index: changed(old.z_index, new.z_index),
            is_maximized: changed(old.is_maximized, new.is_maximized),
            pre_maximize_state: if old.pre_maximize_state != new.pre_maximize_state {
                new.pre_maximize_state
            } else {
                None
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the present fields onto `state`
    pub fn apply_to(&self, state: &mut WindowState) {
        if let Some(x) = self.x {
            state.x = x;
        }
        if let Some(y) = self.y {
            state.y = y;
        }
        if let Some(width) = self.width {
            state.width = width;
        }
        if let Some(height) = self.height {
            state.height = height;
        }
        if let Some(z_index) = self.z_index {
            state.z_index = z_index;
        }
        if let Some(is_maximized) = self.is_maximized {
            state.is_maximized = is_maximized;
        }
        if let Some(pre) = self.pre_maximize_state {
            state.pre_maximize_state = Some(pre);
        }
    }

    /// `base` with the present fields overlaid
    pub fn overlay(&self, base: WindowState) -> WindowState {
        let mut state = base;
        self.apply_to(&mut state);
        state
    }
}

impl From<&WindowState> for WindowStateUpdate {
    fn from(state: &WindowState) -> Self {
        Self {
            x: Some(state.x),
            y: Some(state.y),
            width: Some(state.width),
            height: Some(state.height),
            z_index: Some(state.z_index),
            is_maximized: Some(state.is_maximized),
            pre_maximize_state: state.pre_maximize_state,
        }
    }
}
