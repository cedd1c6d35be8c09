//! Eradia
//!
//! Window engine for a file-backed journal: each entry opens in its own
//! window inside a single viewport, with stacking, minimize to icons,
//! maximize, tile and cascade. Window geometry and entry content are
//! persisted through debounced background saves.

pub mod config;
pub mod journal;
pub mod persistence;
pub mod session;
pub mod shared;
pub mod wm;

pub use config::Config;
pub use session::Session;
