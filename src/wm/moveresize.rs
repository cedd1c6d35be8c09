//! MoveResize Module
//!
//! Constraints applied when a drag or resize gesture stops. Results are
//! clamped into the viewport, never rejected.

use crate::shared::{Geometry, Size};

/// Keep a `width` × `height` box inside the viewport
pub fn clamp_position(x: f64, y: f64, width: f64, height: f64, viewport: Size) -> (f64, f64) {
    let max_x = (viewport.width - width).max(0.0);
    let max_y = (viewport.height - height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Cap the size at the viewport, then clamp the position
///
/// Geometry that already fits comes back unchanged.
pub fn fit(geometry: Geometry, viewport: Size) -> Geometry {
    let width = geometry.width.min(viewport.width);
    let height = geometry.height.min(viewport.height);
    let (x, y) = clamp_position(geometry.x, geometry.y, width, height, viewport);
    Geometry::new(x, y, width, height)
}

/// Minimum size and a non-negative position, for when there is no viewport to fit
pub fn at_least(geometry: Geometry, min_width: f64, min_height: f64) -> Geometry {
    Geometry::new(
        geometry.x.max(0.0),
        geometry.y.max(0.0),
        geometry.width.max(min_width),
        geometry.height.max(min_height),
    )
}

/// Apply the minimum size, cap the size at the viewport, then clamp the position
///
/// When the viewport is smaller than the minimum size the viewport wins,
/// so the window still ends up fully inside it.
pub fn constrain(geometry: Geometry, min_width: f64, min_height: f64, viewport: Size) -> Geometry {
    fit(at_least(geometry, min_width, min_height), viewport)
}

/// Position of a dragged icon, which has a fixed footprint
pub fn clamp_icon(x: f64, y: f64, icon_width: f64, icon_height: f64, viewport: Option<Size>) -> (f64, f64) {
    match viewport {
        Some(size) => clamp_position(x, y, icon_width, icon_height, size),
        None => (x.max(0.0), y.max(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_negative_position() {
        let viewport = Size::new(1000.0, 800.0);
        assert_eq!(clamp_position(-50.0, -10.0, 400.0, 300.0, viewport), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_past_far_edge() {
        let viewport = Size::new(1000.0, 800.0);
        assert_eq!(clamp_position(900.0, 700.0, 400.0, 300.0, viewport), (600.0, 500.0));
    }

    #[test]
    fn test_constrain_enforces_minimum() {
        let viewport = Size::new(1000.0, 800.0);
        let g = constrain(Geometry::new(10.0, 10.0, 50.0, 20.0), 200.0, 100.0, viewport);
        assert_eq!(g, Geometry::new(10.0, 10.0, 200.0, 100.0));
    }

    #[test]
    fn test_constrain_oversized_window() {
        let viewport = Size::new(1000.0, 800.0);
        let g = constrain(Geometry::new(300.0, 300.0, 1500.0, 900.0), 200.0, 100.0, viewport);
        assert_eq!(g, Geometry::new(0.0, 0.0, 1000.0, 800.0));
    }

    #[test]
    fn test_constrain_tiny_viewport() {
        let viewport = Size::new(150.0, 80.0);
        let g = constrain(Geometry::new(5.0, 5.0, 400.0, 300.0), 200.0, 100.0, viewport);
        assert!(g.fits_within(viewport));
    }

    #[test]
    fn test_fit_shrinks_only_when_needed() {
        let viewport = Size::new(400.0, 300.0);
        let inside = Geometry::new(10.0, 20.0, 150.0, 100.0);
        assert_eq!(fit(inside, viewport), inside);

        let g = fit(Geometry::new(350.0, 250.0, 589.0, 442.0), viewport);
        assert_eq!(g, Geometry::new(0.0, 0.0, 400.0, 300.0));

        let g = fit(Geometry::new(380.0, 10.0, 120.0, 80.0), viewport);
        assert_eq!(g, Geometry::new(280.0, 10.0, 120.0, 80.0));
    }

    #[test]
    fn test_at_least_repairs_bad_geometry() {
        let g = at_least(Geometry::new(-30.0, 5.0, -10.0, 50.0), 200.0, 100.0);
        assert_eq!(g, Geometry::new(0.0, 5.0, 200.0, 100.0));
    }

    #[test]
    fn test_clamp_icon() {
        let viewport = Some(Size::new(1000.0, 800.0));
        assert_eq!(clamp_icon(990.0, 790.0, 160.0, 32.0, viewport), (840.0, 768.0));
        assert_eq!(clamp_icon(-5.0, 12.0, 160.0, 32.0, None), (0.0, 12.0));
    }
}
