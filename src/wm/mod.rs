//! Window Manager Module
//!
//! Owns the open document windows inside one viewport and mediates every
//! change to their geometry, stacking and presentation mode.
//!
//! Mode transitions:
//!
//! ```text
//!   Normal ──maximize──▶ Maximized ──restore_from_maximize / activate──▶ Normal
//!     │                     │
//!  minimize              minimize
//!     ▼                     ▼
//!   Minimized ──restore──▶ (mode held before minimize)
//! ```
//!
//! Operations on unknown ids are silent no-ops, and operations that need
//! the viewport's size do nothing while it cannot be measured.

pub mod events;
pub mod factory;
pub mod layout;
pub mod moveresize;
pub mod placement;
pub mod stacking;
pub mod viewport;
pub mod window;

use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::shared::{Geometry, WindowState, WindowStateUpdate};

pub use events::{WindowCommand, WindowEvent};
pub use placement::{IconTable, MinimizedIcon, PreMinimizeState};
pub use viewport::{FixedViewport, SharedViewport, Viewport};
pub use window::{ManagedWindow, RenderedWindow, WindowId, WindowMode};

pub struct WindowManager {
    /// Open windows in open order; this is the iteration order used by
    /// tile, cascade and minimize-all
    windows: Vec<ManagedWindow>,
    icons: IconTable,
    viewport: Box<dyn Viewport>,
    layout: LayoutConfig,
    /// Notifications not yet collected by the session
    events: Vec<WindowEvent>,
}

impl WindowManager {
    pub fn new(layout: LayoutConfig, viewport: impl Viewport + 'static) -> Self {
        Self {
            windows: Vec::new(),
            icons: IconTable::new(),
            viewport: Box::new(viewport),
            layout,
            events: Vec::new(),
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn windows(&self) -> &[ManagedWindow] {
        &self.windows
    }

    pub fn window(&self, id: &str) -> Option<&ManagedWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn is_minimized(&self, id: &str) -> bool {
        self.icons.contains(id)
    }

    pub fn icon(&self, id: &str) -> Option<&MinimizedIcon> {
        self.icons.get(id)
    }

    pub fn mode(&self, id: &str) -> Option<WindowMode> {
        let window = self.window(id)?;
        Some(WindowMode::from_flags(self.icons.contains(id), window.is_maximized()))
    }

    pub fn z_indices(&self) -> Vec<i64> {
        self.windows.iter().map(|w| w.state.z_index).collect()
    }

    /// Ids from the bottom of the stack to the top
    pub fn stacking_order(&self) -> Vec<WindowId> {
        stacking::stacking_order(&self.windows)
    }

    pub fn topmost(&self) -> Option<&WindowId> {
        stacking::topmost(&self.windows)
    }

    /// Window state per open window, in open order
    pub fn window_states(&self) -> impl Iterator<Item = (&WindowId, &WindowState)> {
        self.windows.iter().map(|w| (&w.id, &w.state))
    }

    /// Take the notifications emitted since the last call
    pub fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    /// Replace a window's state and emit the changed fields
    fn commit(&mut self, index: usize, state: WindowState) {
        let window = &mut self.windows[index];
        let update = WindowStateUpdate::diff(&window.state, &state);
        window.state = state;

        if !update.is_empty() {
            self.events.push(WindowEvent::StateChanged {
                id: window.id.clone(),
                update,
            });
        }
    }

    /// Shrink `geometry` to the viewport if it is larger, then move it inside
    fn fit_into_viewport(&self, geometry: Geometry) -> Geometry {
        match self.viewport.measure() {
            Some(size) => moveresize::fit(geometry, size),
            None => geometry,
        }
    }

    /// Fit `state` to the viewport as it is now
    ///
    /// A maximized window fills it; any other window keeps its geometry
    /// when it fits and is shrunk and moved inside when it does not.
    fn refit(&self, state: &mut WindowState) {
        let geometry = match self.viewport.measure() {
            Some(size) if state.is_maximized => Geometry::new(0.0, 0.0, size.width, size.height),
            _ => self.fit_into_viewport(state.geometry()),
        };
        state.set_geometry(geometry);
    }

    /// Maximized → Normal, back to the geometry captured on maximize
    fn leave_maximized(&self, state: &mut WindowState) {
        state.is_maximized = false;
        if let Some(pre) = state.pre_maximize_state {
            state.set_geometry(pre);
        }
        self.refit(state);
    }

    /// Saved records may come from a larger screen, or be damaged
    fn repair_restored(&self, state: &mut WindowState) {
        let (min_w, min_h) = (self.layout.min_width, self.layout.min_height);
        state.set_geometry(moveresize::at_least(state.geometry(), min_w, min_h));
        state.pre_maximize_state = state
            .pre_maximize_state
            .map(|pre| moveresize::at_least(pre, min_w, min_h));
        self.refit(state);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open a window for a document, or bring it forward if already open
    ///
    /// Returns true when a new window was created.
    pub fn open(&mut self, id: impl Into<WindowId>, title: impl Into<String>) -> bool {
        let id = id.into();

        if let Some(index) = self.index_of(&id) {
            if self.icons.contains(&id) {
                self.restore(&id);
            } else {
                let mut state = self.windows[index].state.clone();
                state.z_index = stacking::next_z_index(&self.windows);
                self.commit(index, state);
            }
            return false;
        }

        let mut state = factory::create_window_state(
            &self.layout,
            &self.z_indices(),
            self.windows.len(),
            self.viewport.measure(),
        );
        self.refit(&mut state);

        info!("Opening window {} at ({}, {}) z={}", id, state.x, state.y, state.z_index);
        self.windows.push(ManagedWindow::new(id.clone(), title, state));
        self.events.push(WindowEvent::Opened { id });
        true
    }

    /// Rebuild the open-window set from persisted records
    ///
    /// Each record is overlaid on factory defaults, so records written by
    /// older versions with missing fields still produce usable geometry.
    /// The result gets the minimum size and is fitted into the viewport.
    pub fn restore_open_windows(&mut self, records: impl IntoIterator<Item = (WindowId, String, WindowStateUpdate)>) {
        for (offset_index, (id, title, record)) in records.into_iter().enumerate() {
            if self.is_open(&id) {
                continue;
            }
            let base = factory::create_window_state(&self.layout, &[], offset_index, None);
            let mut state = record.overlay(base);
            self.repair_restored(&mut state);
            debug!("Restored window {} from saved state: {:?}", id, state);
            self.windows.push(ManagedWindow::new(id, title, state));
        }
    }

    /// Close a window; the document is untouched
    pub fn close(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        info!("Closing window {}", id);
        let window = self.windows.remove(index);
        self.icons.remove(id);
        self.events.push(WindowEvent::Closed { id: window.id });
        true
    }

    pub fn set_title(&mut self, id: &str, title: impl Into<String>) {
        if let Some(index) = self.index_of(id) {
            self.windows[index].title = title.into();
        }
    }

    // ------------------------------------------------------------------
    // Stacking
    // ------------------------------------------------------------------

    /// Raise a window above all others
    ///
    /// Activating a maximized window also restores it: clicking a
    /// maximized window that is not focused both focuses and
    /// un-maximizes it. A minimized window is only raised, so its mode
    /// is unchanged when it is later restored.
    pub fn activate(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };

        let mut state = self.windows[index].state.clone();
        state.z_index = stacking::next_z_index(&self.windows);

        if state.is_maximized && !self.icons.contains(id) {
            debug!("Activating maximized window {}, restoring it", id);
            self.leave_maximized(&mut state);
        }

        self.commit(index, state);
    }

    // ------------------------------------------------------------------
    // Minimize / restore
    // ------------------------------------------------------------------

    /// Minimize a window to an icon placed clear of existing icons
    pub fn minimize(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.icons.contains(id) {
            return;
        }

        let window = &self.windows[index];
        let pre_minimize = PreMinimizeState {
            geometry: window.geometry(),
            z_index: window.state.z_index,
        };

        let (x, y) = placement::find_available_position(&self.layout, self.viewport.measure(), &self.icons);
        debug!("Minimizing window {} to icon at ({}, {})", id, x, y);

        self.icons.insert(id.to_string(), MinimizedIcon { x, y, pre_minimize });
        self.events.push(WindowEvent::Minimized { id: id.to_string(), x, y });
    }

    /// Bring a minimized window back in front of everything else
    pub fn restore(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let Some(icon) = self.icons.remove(id) else {
            return;
        };

        let mut state = self.windows[index].state.clone();
        state.set_geometry(icon.pre_minimize.geometry);
        // The viewport may have changed while minimized
        self.refit(&mut state);
        state.z_index = stacking::next_z_index(&self.windows);

        debug!("Restoring window {} from icon", id);
        self.events.push(WindowEvent::Restored { id: id.to_string() });
        self.commit(index, state);
    }

    pub fn minimize_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.iter().map(|w| w.id.clone()).collect();
        info!("Minimizing all {} windows", ids.len());
        for id in ids {
            self.minimize(&id);
        }
    }

    // ------------------------------------------------------------------
    // Maximize
    // ------------------------------------------------------------------

    /// Fill the viewport, remembering the geometry to come back to
    pub fn maximize(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.icons.contains(id) {
            debug!("Window {} is minimized, not maximizing", id);
            return;
        }
        let Some(size) = self.viewport.measure() else {
            debug!("Viewport not measurable, not maximizing {}", id);
            return;
        };

        let mut state = self.windows[index].state.clone();
        // Already maximized: refit to the viewport but keep the first snapshot
        if !state.is_maximized {
            state.pre_maximize_state = Some(state.geometry());
            state.is_maximized = true;
        }
        state.set_geometry(Geometry::new(0.0, 0.0, size.width, size.height));

        info!("Maximizing window {}", id);
        self.commit(index, state);
    }

    pub fn restore_from_maximize(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if !self.windows[index].is_maximized() || self.icons.contains(id) {
            return;
        }

        let mut state = self.windows[index].state.clone();
        self.leave_maximized(&mut state);

        info!("Restoring window {} from maximized", id);
        self.commit(index, state);
    }

    pub fn toggle_maximize(&mut self, id: &str) {
        match self.mode(id) {
            Some(WindowMode::Maximized) => self.restore_from_maximize(id),
            Some(WindowMode::Normal) => self.maximize(id),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Drag / resize
    // ------------------------------------------------------------------

    /// Drag stop. Moves the icon instead when the window is minimized;
    /// maximized windows cannot be dragged.
    pub fn move_window(&mut self, id: &str, x: f64, y: f64) {
        let Some(index) = self.index_of(id) else {
            return;
        };

        if self.icons.contains(id) {
            let (x, y) = moveresize::clamp_icon(
                x,
                y,
                self.layout.icon_width,
                self.layout.icon_height,
                self.viewport.measure(),
            );
            self.icons.move_icon(id, x, y);
            self.events.push(WindowEvent::IconMoved { id: id.to_string(), x, y });
            return;
        }
        if self.windows[index].is_maximized() {
            return;
        }

        let mut geometry = self.windows[index].geometry();
        geometry.x = x;
        geometry.y = y;
        self.apply_gesture(index, geometry);
    }

    /// Resize stop; disabled while maximized or minimized
    pub fn resize_window(&mut self, id: &str, geometry: Geometry) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if self.icons.contains(id) || self.windows[index].is_maximized() {
            return;
        }
        self.apply_gesture(index, geometry);
    }

    fn apply_gesture(&mut self, index: usize, geometry: Geometry) {
        let (min_w, min_h) = (self.layout.min_width, self.layout.min_height);
        let geometry = match self.viewport.measure() {
            Some(size) => moveresize::constrain(geometry, min_w, min_h, size),
            None => moveresize::at_least(geometry, min_w, min_h),
        };

        let mut state = self.windows[index].state.clone();
        state.set_geometry(geometry);
        self.commit(index, state);
    }

    // ------------------------------------------------------------------
    // Bulk layouts
    // ------------------------------------------------------------------

    fn visible_indices(&self) -> Vec<usize> {
        self.windows
            .iter()
            .enumerate()
            .filter(|(_, w)| !self.icons.contains(&w.id))
            .map(|(index, _)| index)
            .collect()
    }

    /// Partition the viewport into an even grid, one cell per visible window
    pub fn tile(&mut self) {
        let Some(size) = self.viewport.measure() else {
            debug!("Viewport not measurable, skipping tile");
            return;
        };
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }

        let (cols, rows) = layout::tile_grid(visible.len());
        info!("Tiling {} windows in a {}x{} grid", visible.len(), cols, rows);

        let cells = layout::tile_cells(visible.len(), size);
        for (index, cell) in visible.into_iter().zip(cells) {
            let mut state = self.windows[index].state.clone();
            state.is_maximized = false;
            state.set_geometry(cell);
            self.commit(index, state);
        }
    }

    /// Stack visible windows diagonally, renumbering z-order from 1
    pub fn cascade(&mut self) {
        let Some(size) = self.viewport.measure() else {
            debug!("Viewport not measurable, skipping cascade");
            return;
        };
        let visible = self.visible_indices();
        info!("Cascading {} windows", visible.len());

        let slots = layout::cascade_slots(visible.len(), size, &self.layout);
        for (index, (geometry, z_index)) in visible.into_iter().zip(slots) {
            let mut state = self.windows[index].state.clone();
            state.is_maximized = false;
            state.z_index = z_index;
            // Long cascades on small viewports would run off the bottom-right corner
            state.set_geometry(self.fit_into_viewport(geometry));
            self.commit(index, state);
        }
    }

    // ------------------------------------------------------------------
    // Rendering / dispatch
    // ------------------------------------------------------------------

    /// What to draw for every open window, in open order
    ///
    /// Icons are drawn at the current maximum z-index so they stay above
    /// the windows they share the viewport with.
    pub fn render_list(&self) -> Vec<RenderedWindow> {
        let max_z = stacking::max_z_index(&self.windows).unwrap_or(0);

        self.windows
            .iter()
            .map(|w| match self.icons.get(&w.id) {
                Some(icon) => RenderedWindow {
                    id: w.id.clone(),
                    title: w.title.clone(),
                    mode: WindowMode::Minimized,
                    rect: Geometry::new(icon.x, icon.y, self.layout.icon_width, self.layout.icon_height),
                    z_index: max_z,
                    resizable: false,
                    draggable: true,
                },
                None => {
                    let maximized = w.is_maximized();
                    RenderedWindow {
                        id: w.id.clone(),
                        title: w.title.clone(),
                        mode: WindowMode::from_flags(false, maximized),
                        rect: w.geometry(),
                        z_index: w.state.z_index,
                        resizable: !maximized,
                        draggable: !maximized,
                    }
                }
            })
            .collect()
    }

    pub fn dispatch(&mut self, command: WindowCommand) {
        debug!("Dispatching {:?}", command);
        match command {
            WindowCommand::TileWindows => self.tile(),
            WindowCommand::CascadeWindows => self.cascade(),
            WindowCommand::MinimizeAll => self.minimize_all(),
            WindowCommand::Activate { id } => self.activate(&id),
            WindowCommand::Minimize { id } => self.minimize(&id),
            WindowCommand::Restore { id } => self.restore(&id),
            WindowCommand::Maximize { id } => self.maximize(&id),
            WindowCommand::RestoreFromMaximize { id } => self.restore_from_maximize(&id),
            WindowCommand::ToggleMaximize { id } => self.toggle_maximize(&id),
            WindowCommand::Move { id, x, y } => self.move_window(&id, x, y),
            WindowCommand::Resize { id, x, y, width, height } => {
                self.resize_window(&id, Geometry::new(x, y, width, height))
            }
            WindowCommand::Close { id } => {
                self.close(&id);
            }
        }
    }
}
