//! Viewport Module
//!
//! The bounding container all window geometry is measured against. The
//! window manager never caches its size: every size-dependent operation
//! calls [`Viewport::measure`] again, since the container can change size
//! between gestures.

use std::cell::Cell;
use std::rc::Rc;

use crate::shared::Size;

/// Source of the container's current size
pub trait Viewport {
    /// Current size, or `None` while the container is not laid out
    fn measure(&self) -> Option<Size>;
}

/// Viewport with a size that never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport {
    size: Size,
}

impl FixedViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }
}

impl Viewport for FixedViewport {
    fn measure(&self) -> Option<Size> {
        self.size.is_measurable().then_some(self.size)
    }
}

/// Viewport whose size is updated by the host as its container resizes
///
/// Clones share the same cell, so the host keeps one handle and gives
/// another to the window manager. Window state is only touched from the
/// UI thread, hence `Rc` rather than `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    size: Rc<Cell<Option<Size>>>,
}

impl SharedViewport {
    /// A viewport that has not been measured yet
    pub fn unmeasured() -> Self {
        Self::default()
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        let viewport = Self::default();
        viewport.resize(width, height);
        viewport
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.size.set(Some(Size::new(width, height)));
    }

    /// Forget the size, e.g. when the container is unmounted
    pub fn detach(&self) {
        self.size.set(None);
    }
}

impl Viewport for SharedViewport {
    fn measure(&self) -> Option<Size> {
        self.size.get().filter(Size::is_measurable)
    }
}
