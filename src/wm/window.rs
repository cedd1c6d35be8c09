//! Managed document windows and their presentation mode

use serde::{Deserialize, Serialize};

use crate::shared::{Geometry, WindowState};

/// Stable identifier shared with the persisted journal entry
pub type WindowId = String;

/// How a window is currently presented
///
/// Minimized is tracked by the manager's icon table rather than inside
/// `WindowState`, and takes precedence: a maximized window that gets
/// minimized reports `Minimized` and comes back maximized on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowMode {
    Normal,
    Maximized,
    Minimized,
}

impl WindowMode {
    /// Mode from the icon table membership and the stored maximize flag
    pub fn from_flags(minimized: bool, maximized: bool) -> Self {
        match (minimized, maximized) {
            (true, _) => WindowMode::Minimized,
            (false, true) => WindowMode::Maximized,
            (false, false) => WindowMode::Normal,
        }
    }
}

/// One open document window
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedWindow {
    pub id: WindowId,
    pub title: String,
    pub state: WindowState,
}

impl ManagedWindow {
    pub fn new(id: impl Into<WindowId>, title: impl Into<String>, state: WindowState) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            state,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.state.geometry()
    }

    pub fn is_maximized(&self) -> bool {
        self.state.is_maximized
    }
}

/// What the host should draw for one window
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWindow {
    pub id: WindowId,
    pub title: String,
    pub mode: WindowMode,
    /// Window rectangle, or the icon rectangle when minimized
    pub rect: Geometry,
    pub z_index: i64,
    /// False while maximized or minimized
    pub resizable: bool,
    /// False while maximized
    pub draggable: bool,
}
