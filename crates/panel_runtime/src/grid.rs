//! Row-major grid arrangement for visible panels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Geometry, Size, ViewportBounds, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Spacing and minimum cell size used by [`arrange_grid`].
pub struct GridSettings {
    pub padding: f64,
    pub min_cell: Size,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            padding: 20.0,
            min_cell: Size::new(250.0, 200.0),
        }
    }
}

/// Column and row count for `count` panels.
///
/// Near-square by default, with wider shapes for three, four and six panels.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    match count {
        0 => (0, 0),
        3 => (3, 1),
        4 => (2, 2),
        6 => (3, 2),
        _ => {
            let mut cols = 1;
            while cols * cols < count {
                cols += 1;
            }
            (cols, count.div_ceil(cols))
        }
    }
}

/// Tiles `visible` into a grid, first id at the top-left, wrapping after each full row.
///
/// The same ids in the same order over the same viewport always produce the same mapping.
pub fn arrange_grid(
    visible: &[WindowId],
    viewport: ViewportBounds,
    settings: &GridSettings,
) -> BTreeMap<WindowId, Geometry> {
    let (cols, rows) = grid_dimensions(visible.len());
    if cols == 0 {
        return BTreeMap::new();
    }

    let padding = settings.padding;
    let available_width = viewport.width - padding * (cols as f64 + 1.0);
    let available_height = viewport.height
        - viewport.reserved_top
        - viewport.reserved_bottom
        - padding * (rows as f64 + 1.0);
    let cell_width = (available_width / cols as f64).max(settings.min_cell.width);
    let cell_height = (available_height / rows as f64).max(settings.min_cell.height);

    visible
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let col = (index % cols) as f64;
            let row = (index / cols) as f64;
            let geometry = Geometry::new(
                padding + col * (cell_width + padding),
                viewport.reserved_top + padding + row * (cell_height + padding),
                cell_width,
                cell_height,
            );
            (id.clone(), geometry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(count: usize) -> Vec<WindowId> {
        (0..count).map(|i| WindowId::new(format!("w{i}"))).collect()
    }

    fn viewport() -> ViewportBounds {
        ViewportBounds::new(1280.0, 900.0).with_reserved(80.0, 40.0)
    }

    #[test]
    fn dimensions_follow_square_rule_with_overrides() {
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (2, 1));
        assert_eq!(grid_dimensions(3), (3, 1));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(6), (3, 2));
        assert_eq!(grid_dimensions(7), (3, 3));
        assert_eq!(grid_dimensions(10), (4, 3));
    }

    #[test]
    fn empty_input_is_a_no_op() {
        assert!(arrange_grid(&[], viewport(), &GridSettings::default()).is_empty());
    }

    #[test]
    fn four_panels_form_two_by_two() {
        let ids = ids(4);
        let layout = arrange_grid(&ids, viewport(), &GridSettings::default());
        // (1280 - 60) / 2 = 610 wide; (900 - 120 - 60) / 2 = 360 tall.
        assert_eq!(layout[&ids[0]], Geometry::new(20.0, 100.0, 610.0, 360.0));
        assert_eq!(layout[&ids[1]], Geometry::new(650.0, 100.0, 610.0, 360.0));
        assert_eq!(layout[&ids[2]], Geometry::new(20.0, 480.0, 610.0, 360.0));
        assert_eq!(layout[&ids[3]], Geometry::new(650.0, 480.0, 610.0, 360.0));
    }

    #[test]
    fn three_panels_form_single_row() {
        let ids = ids(3);
        let layout = arrange_grid(&ids, viewport(), &GridSettings::default());
        let ys: Vec<f64> = ids.iter().map(|id| layout[id].y).collect();
        assert_eq!(ys, vec![100.0, 100.0, 100.0]);
        assert_eq!(layout[&ids[2]].x, 20.0 + 2.0 * (layout[&ids[0]].width + 20.0));
    }

    #[test]
    fn six_panels_form_three_by_two() {
        let ids = ids(6);
        let layout = arrange_grid(&ids, viewport(), &GridSettings::default());
        let distinct_x: std::collections::BTreeSet<i64> =
            layout.values().map(|g| g.x as i64).collect();
        let distinct_y: std::collections::BTreeSet<i64> =
            layout.values().map(|g| g.y as i64).collect();
        assert_eq!(distinct_x.len(), 3);
        assert_eq!(distinct_y.len(), 2);
    }

    #[test]
    fn cells_never_shrink_below_minimum() {
        let ids = ids(9);
        let layout = arrange_grid(
            &ids,
            ViewportBounds::new(600.0, 500.0),
            &GridSettings::default(),
        );
        assert!(layout
            .values()
            .all(|g| g.width == 250.0 && g.height == 200.0));
    }

    #[test]
    fn arrangement_is_idempotent() {
        let ids = ids(5);
        let first = arrange_grid(&ids, viewport(), &GridSettings::default());
        let second = arrange_grid(&ids, viewport(), &GridSettings::default());
        assert_eq!(first, second);
    }
}
