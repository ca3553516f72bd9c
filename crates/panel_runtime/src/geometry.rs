//! Pure bounds helpers that keep panel rectangles inside the viewport.

use crate::model::{Geometry, Size, ViewportBounds};

/// Returns the nearest rectangle to `geometry` that fits `viewport` and honours `min_size`.
///
/// Sizes are floored at `min_size`, the origin is clamped so the rectangle fits, and the size is
/// then capped at whatever remains from the clamped origin. When the viewport is smaller than
/// `min_size` the minimum wins and the rectangle overflows instead of collapsing.
pub fn clamp(geometry: Geometry, viewport: ViewportBounds, min_size: Size) -> Geometry {
    let (x, width) = clamp_axis(
        geometry.x,
        geometry.width,
        min_size.width,
        0.0,
        viewport.width,
    );
    let (y, height) = clamp_axis(
        geometry.y,
        geometry.height,
        min_size.height,
        viewport.reserved_top,
        viewport.usable_bottom(),
    );
    Geometry::new(x, y, width, height)
}

/// Keeps the origin of `geometry` and caps its size so the far corner stays inside `viewport`.
///
/// The origin only moves when even `min_size` cannot fit from it.
pub fn clamp_size_from_origin(
    geometry: Geometry,
    viewport: ViewportBounds,
    min_size: Size,
) -> Geometry {
    let width = geometry
        .width
        .min(viewport.width - geometry.x)
        .max(min_size.width);
    let height = geometry
        .height
        .min(viewport.usable_bottom() - geometry.y)
        .max(min_size.height);
    clamp(
        Geometry::new(geometry.x, geometry.y, width, height),
        viewport,
        min_size,
    )
}

/// Returns `true` when every field is a finite, non-negative number.
pub fn is_valid(geometry: Geometry) -> bool {
    geometry.is_valid()
}

/// Checks the placement invariant for a visible panel.
///
/// Overflow is tolerated only on an axis where the viewport is smaller than the minimum size.
pub fn fits_viewport(geometry: Geometry, viewport: ViewportBounds, min_size: Size) -> bool {
    const EPSILON: f64 = 1e-6;
    let usable_width = viewport.width;
    let usable_height = viewport.usable_bottom() - viewport.reserved_top;

    let width_ok = geometry.width + EPSILON >= min_size.width
        && (geometry.x + geometry.width <= viewport.width + EPSILON
            || usable_width < min_size.width);
    let height_ok = geometry.height + EPSILON >= min_size.height
        && (geometry.y + geometry.height <= viewport.usable_bottom() + EPSILON
            || usable_height < min_size.height);

    geometry.is_valid()
        && geometry.x >= 0.0
        && geometry.y + EPSILON >= viewport.reserved_top
        && width_ok
        && height_ok
}

fn clamp_axis(position: f64, size: f64, min: f64, low: f64, high: f64) -> (f64, f64) {
    let size = size.max(min);
    let position = position.min(high - size).max(low);
    let size = size.min(high - position).max(min);
    (position, size)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn min50() -> Size {
        Size::new(50.0, 50.0)
    }

    #[test]
    fn clamp_pulls_negative_origin_back_into_viewport() {
        let clamped = clamp(
            Geometry::new(-50.0, -50.0, 100.0, 100.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn clamp_moves_origin_left_before_shrinking() {
        let clamped = clamp(
            Geometry::new(950.0, 10.0, 100.0, 100.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(900.0, 10.0, 100.0, 100.0));
    }

    #[test]
    fn clamp_shrinks_oversized_rectangle_to_viewport() {
        let clamped = clamp(
            Geometry::new(30.0, 30.0, 1500.0, 1000.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(0.0, 0.0, 1000.0, 800.0));
    }

    #[test]
    fn clamp_floors_size_at_minimum() {
        let clamped = clamp(
            Geometry::new(10.0, 10.0, 5.0, 5.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn clamp_respects_reserved_bands() {
        let viewport = ViewportBounds::new(1000.0, 800.0).with_reserved(80.0, 40.0);
        let clamped = clamp(Geometry::new(0.0, 0.0, 200.0, 200.0), viewport, min50());
        assert_eq!(clamped.y, 80.0);

        let clamped = clamp(Geometry::new(0.0, 700.0, 200.0, 200.0), viewport, min50());
        assert_eq!(clamped, Geometry::new(0.0, 560.0, 200.0, 200.0));
    }

    #[test]
    fn clamp_overflows_when_viewport_is_smaller_than_minimum() {
        let clamped = clamp(
            Geometry::new(10.0, 10.0, 300.0, 300.0),
            ViewportBounds::new(100.0, 80.0),
            Size::new(200.0, 150.0),
        );
        assert_eq!(clamped, Geometry::new(0.0, 0.0, 200.0, 150.0));
        assert!(clamped.is_valid());
        assert!(fits_viewport(
            clamped,
            ViewportBounds::new(100.0, 80.0),
            Size::new(200.0, 150.0)
        ));
    }

    #[test]
    fn clamp_size_from_origin_keeps_origin() {
        let clamped = clamp_size_from_origin(
            Geometry::new(600.0, 500.0, 800.0, 800.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(600.0, 500.0, 400.0, 300.0));
    }

    #[test]
    fn clamp_size_from_origin_moves_origin_only_when_minimum_cannot_fit() {
        let clamped = clamp_size_from_origin(
            Geometry::new(980.0, 10.0, 300.0, 100.0),
            ViewportBounds::new(1000.0, 800.0),
            min50(),
        );
        assert_eq!(clamped, Geometry::new(950.0, 10.0, 50.0, 100.0));
    }

    #[test]
    fn fits_viewport_detects_escape() {
        let viewport = ViewportBounds::new(1000.0, 800.0);
        assert!(fits_viewport(
            Geometry::new(0.0, 0.0, 1000.0, 800.0),
            viewport,
            min50()
        ));
        assert!(!fits_viewport(
            Geometry::new(1.0, 0.0, 1000.0, 800.0),
            viewport,
            min50()
        ));
        assert!(!is_valid(Geometry::new(0.0, f64::NAN, 10.0, 10.0)));
    }
}
