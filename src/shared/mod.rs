//! Shared window state
//!
//! Plain data types passed between the window manager, the session layer
//! and the persistence bridge.

pub mod window_state;

pub use window_state::{Geometry, Size, WindowState, WindowStateUpdate};
