//! Grid duplication: drag a handle to stamp copies of the selection in a grid.

use crate::config::GridConfig;
use crate::objects::ObjectId;
use crate::store::ObjectStore;
use kurbo::{Point, Rect, Size, Vec2};

/// Grid derived from the selection bounds and the handle position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    /// Top-left of the original selection.
    pub origin: Point,
    /// Size of one cell (the selection bounds).
    pub item: Size,
    pub padding: f64,
    pub cols: u32,
    pub rows: u32,
    /// +1 or -1.
    pub x_dir: f64,
    /// +1 or -1.
    pub y_dir: f64,
}

fn direction(d: f64) -> f64 {
    if d < 0.0 { -1.0 } else { 1.0 }
}

fn cell_count(distance: f64, step: f64, max: u32) -> u32 {
    if step <= 0.0 || !distance.is_finite() {
        return 1;
    }
    let count = (distance.abs() / step).ceil() + 1.0;
    count.clamp(1.0, max.max(1) as f64) as u32
}

impl GridPlan {
    /// Plan a grid for selection `bounds` with the handle dragged to `target`.
    pub fn compute(bounds: Rect, target: Point, config: &GridConfig) -> Self {
        let item = bounds.size();
        let dx = target.x - bounds.x0;
        let dy = target.y - bounds.y0;
        Self {
            origin: bounds.origin(),
            item,
            padding: config.padding,
            cols: cell_count(dx, item.width + config.padding, config.max_cols),
            rows: cell_count(dy, item.height + config.padding, config.max_rows),
            x_dir: direction(dx),
            y_dir: direction(dy),
        }
    }

    /// Check if releasing would create any copies.
    pub fn has_copies(&self) -> bool {
        self.rows > 1 || self.cols > 1
    }

    /// Offset of cell `(row, col)` from the original.
    pub fn cell_offset(&self, row: u32, col: u32) -> Vec2 {
        Vec2::new(
            col as f64 * self.x_dir * (self.item.width + self.padding),
            row as f64 * self.y_dir * (self.item.height + self.padding),
        )
    }

    /// Offsets of every cell except the origin, row by row.
    pub fn copy_offsets(&self) -> Vec<Vec2> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&cell| cell != (0, 0))
            .map(|(r, c)| self.cell_offset(r, c))
            .collect()
    }

    /// Rectangles of all cells, origin included, for previews.
    pub fn cell_rects(&self) -> Vec<Rect> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .map(|(r, c)| Rect::from_origin_size(self.origin + self.cell_offset(r, c), self.item))
            .collect()
    }
}

/// Clone every object in `ids` once per non-origin cell, in one batch.
///
/// Returns the top-level clone ids; empty when the grid is a single cell.
pub fn materialize(store: &mut ObjectStore, ids: &[ObjectId], plan: &GridPlan) -> Vec<ObjectId> {
    if !plan.has_copies() {
        return Vec::new();
    }
    let clones = store.clone_batch(ids, &plan.copy_offsets());
    log::debug!("Grid {}x{} stamped {} object(s)", plan.cols, plan.rows, clones.len());
    clones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CanvasObject, ShapeKind};

    #[test]
    fn test_grid_count_along_x() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        let plan = GridPlan::compute(bounds, Point::new(550.0, 0.0), &GridConfig::default());
        assert_eq!(plan.cols, 4);
        assert_eq!(plan.rows, 1);
        assert_eq!(plan.copy_offsets().len(), 3);

        let mut store = ObjectStore::new();
        let id = store.add(CanvasObject::shape(bounds, ShapeKind::Rectangle));
        let clones = materialize(&mut store, &[id], &plan);
        assert_eq!(clones.len(), 3);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(clones[2]).unwrap().origin(), Point::new(630.0, 0.0));
    }

    #[test]
    fn test_grid_negative_direction() {
        let bounds = Rect::new(100.0, 100.0, 150.0, 150.0);
        let plan = GridPlan::compute(bounds, Point::new(100.0, 0.0), &GridConfig::default());
        assert_eq!(plan.cols, 1);
        assert_eq!(plan.rows, 3);
        assert!((plan.y_dir + 1.0).abs() < f64::EPSILON);
        assert_eq!(plan.cell_offset(2, 0), Vec2::new(0.0, -120.0));
    }

    #[test]
    fn test_grid_ceiling() {
        let config = GridConfig { max_rows: 3, max_cols: 2, ..GridConfig::default() };
        let plan = GridPlan::compute(Rect::new(0.0, 0.0, 10.0, 10.0), Point::new(1e6, 1e6), &config);
        assert_eq!((plan.cols, plan.rows), (2, 3));
        assert_eq!(plan.cell_rects().len(), 6);
    }

    #[test]
    fn test_single_cell_is_noop() {
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        let plan = GridPlan::compute(bounds, Point::ZERO, &GridConfig::default());
        assert!(!plan.has_copies());

        let mut store = ObjectStore::new();
        let id = store.add(CanvasObject::shape(bounds, ShapeKind::Rectangle));
        assert!(materialize(&mut store, &[id], &plan).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_degenerate_item_without_padding() {
        let config = GridConfig { padding: 0.0, ..GridConfig::default() };
        let plan = GridPlan::compute(Rect::new(5.0, 5.0, 5.0, 5.0), Point::new(500.0, 500.0), &config);
        assert!(!plan.has_copies());
    }
}
