//! Default window state for newly opened windows

use crate::config::LayoutConfig;
use crate::shared::{Size, WindowState};

/// Create the initial state for a window
///
/// Successive windows are offset diagonally by `offset_index`, capped so
/// a long run of new windows stacks at the cap instead of leaving the
/// screen. With a known container the size shrinks to `viewport_scale`
/// of it, but never grows past the nominal default.
pub fn create_window_state(
    layout: &LayoutConfig,
    existing_z_indices: &[i64],
    offset_index: usize,
    container: Option<Size>,
) -> WindowState {
    let max_z = existing_z_indices
        .iter()
        .copied()
        .max()
        .unwrap_or(layout.base_z_index);

    let offset = (layout.offset_base + layout.offset_step * offset_index as f64).min(layout.offset_cap);

    let (width, height) = match container {
        Some(size) => (
            layout.default_width.min(size.width * layout.viewport_scale),
            layout.default_height.min(size.height * layout.viewport_scale),
        ),
        None => (layout.default_width, layout.default_height),
    };

    WindowState {
        x: offset,
        y: offset,
        width,
        height,
        z_index: max_z + 1,
        is_maximized: false,
        pre_maximize_state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_z_index() {
        let state = create_window_state(&LayoutConfig::default(), &[999, 1005], 2, None);

        assert_eq!(state.x, 80.0);
        assert_eq!(state.y, 80.0);
        assert_eq!(state.width, 589.0);
        assert_eq!(state.height, 442.0);
        assert_eq!(state.z_index, 1006);
        assert!(!state.is_maximized);
        assert!(state.pre_maximize_state.is_none());
    }

    #[test]
    fn test_first_window_starts_above_base() {
        let state = create_window_state(&LayoutConfig::default(), &[], 0, None);
        assert_eq!(state.z_index, 1000);
        assert_eq!((state.x, state.y), (20.0, 20.0));
    }

    #[test]
    fn test_offset_is_capped() {
        let layout = LayoutConfig::default();
        assert_eq!(create_window_state(&layout, &[], 6, None).x, 200.0);
        assert_eq!(create_window_state(&layout, &[], 50, None).y, 200.0);
    }

    #[test]
    fn test_small_container_scales_down() {
        let state = create_window_state(&LayoutConfig::default(), &[], 0, Some(Size::new(500.0, 400.0)));
        assert!((state.width - 294.5).abs() < 1e-9);
        assert!((state.height - 235.6).abs() < 1e-9);
    }

    #[test]
    fn test_large_container_keeps_default_size() {
        let state = create_window_state(&LayoutConfig::default(), &[], 0, Some(Size::new(3840.0, 2160.0)));
        assert_eq!(state.width, 589.0);
        assert_eq!(state.height, 442.0);
    }
}
