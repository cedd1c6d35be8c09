//! Window manager notifications and commands
//!
//! Events flow up to the session layer, which merges them into the open
//! documents and schedules persistence. Commands flow down from the
//! toolbar and from pointer gestures.

use serde::{Deserialize, Serialize};

use crate::shared::WindowStateUpdate;
use crate::wm::window::WindowId;

// ============================================================================
// WM → Session Events
// ============================================================================

/// Events emitted by the window manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowEvent {
    /// A window was opened for a document
    Opened { id: WindowId },

    /// A window was closed (the document itself still exists)
    Closed { id: WindowId },

    /// Some fields of a window's state changed
    StateChanged {
        id: WindowId,
        update: WindowStateUpdate,
    },

    /// A window was minimized to an icon at `(x, y)`
    Minimized { id: WindowId, x: f64, y: f64 },

    /// A minimized window came back
    Restored { id: WindowId },

    /// A minimized icon was dragged
    IconMoved { id: WindowId, x: f64, y: f64 },
}

impl WindowEvent {
    pub fn window_id(&self) -> &WindowId {
        match self {
            Self::Opened { id }
            | Self::Closed { id }
            | Self::StateChanged { id, .. }
            | Self::Minimized { id, .. }
            | Self::Restored { id }
            | Self::IconMoved { id, .. } => id,
        }
    }

    /// Whether the persisted open-window map may have changed
    pub fn affects_window_map(&self) -> bool {
        matches!(
            self,
            Self::Opened { .. } | Self::Closed { .. } | Self::StateChanged { .. }
        )
    }
}

// ============================================================================
// Toolbar / Gesture → WM Commands
// ============================================================================

/// Commands accepted by [`crate::wm::WindowManager::dispatch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowCommand {
    /// Toolbar: tile all visible windows
    TileWindows,

    /// Toolbar: cascade all visible windows
    CascadeWindows,

    /// Toolbar: minimize every window
    MinimizeAll,

    /// Click or drag start on a window
    Activate { id: WindowId },

    Minimize { id: WindowId },

    /// Double click on a minimized icon
    Restore { id: WindowId },

    Maximize { id: WindowId },

    RestoreFromMaximize { id: WindowId },

    /// Maximize button: maximize or restore depending on current state
    ToggleMaximize { id: WindowId },

    /// Drag stop (moves the icon when minimized)
    Move { id: WindowId, x: f64, y: f64 },

    /// Resize stop
    Resize {
        id: WindowId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    Close { id: WindowId },
}
