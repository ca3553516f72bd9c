//! Responsive default geometry: scales authored positions and sizes down for small viewports.

use crate::{
    geometry::clamp,
    model::{Geometry, Point, Size, ViewportBounds},
};

/// Scale applied to authored geometry for `viewport`.
///
/// Capped at `1.0`: panels shrink on small screens but never grow beyond their authored size.
/// A degenerate reference design yields `1.0`.
pub fn scale_factor(viewport: ViewportBounds, reference_design: Size) -> f64 {
    if reference_design.width <= 0.0 || reference_design.height <= 0.0 {
        return 1.0;
    }
    let scale = (viewport.width / reference_design.width)
        .min(viewport.height / reference_design.height)
        .min(1.0);
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        1.0
    }
}

/// Computes a panel's default geometry for the current viewport.
///
/// The scaled rectangle is clamped into the viewport with `edge_margin` kept free along the right
/// and bottom edges, and the reserved header/footer bands respected.
pub fn scale_default(
    default_position: Point,
    default_size: Size,
    viewport: ViewportBounds,
    reference_design: Size,
    edge_margin: Size,
    min_size: Size,
) -> Geometry {
    let scale = scale_factor(viewport, reference_design);
    let scaled = Geometry::new(
        default_position.x * scale,
        default_position.y * scale,
        default_size.width * scale,
        default_size.height * scale,
    );
    clamp(scaled, viewport.inset(edge_margin), min_size)
}
