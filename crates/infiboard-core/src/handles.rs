//! Resize and grid-duplicate handles around a selection.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    /// All eight resize handles, corners first.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
    ];

    /// Which sides of the box this handle drags: `(left, right, top, bottom)`.
    pub fn sides(self) -> (bool, bool, bool, bool) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (true, false, true, false),
            HandleKind::Corner(Corner::TopRight) => (false, true, true, false),
            HandleKind::Corner(Corner::BottomLeft) => (true, false, false, true),
            HandleKind::Corner(Corner::BottomRight) => (false, true, false, true),
            HandleKind::Edge(Edge::Top) => (false, false, true, false),
            HandleKind::Edge(Edge::Right) => (false, true, false, false),
            HandleKind::Edge(Edge::Bottom) => (false, false, false, true),
            HandleKind::Edge(Edge::Left) => (true, false, false, false),
        }
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(bounds.x0, bounds.y0),
            HandleKind::Corner(Corner::TopRight) => Point::new(bounds.x1, bounds.y0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(bounds.x0, bounds.y1),
            HandleKind::Corner(Corner::BottomRight) => Point::new(bounds.x1, bounds.y1),
            HandleKind::Edge(Edge::Top) => Point::new(center.x, bounds.y0),
            HandleKind::Edge(Edge::Right) => Point::new(bounds.x1, center.y),
            HandleKind::Edge(Edge::Bottom) => Point::new(center.x, bounds.y1),
            HandleKind::Edge(Edge::Left) => Point::new(bounds.x0, center.y),
        }
    }

    /// The point that stays fixed while this handle is dragged.
    pub fn anchor(self, bounds: Rect) -> Point {
        let opposite = match self {
            HandleKind::Corner(Corner::TopLeft) => HandleKind::Corner(Corner::BottomRight),
            HandleKind::Corner(Corner::TopRight) => HandleKind::Corner(Corner::BottomLeft),
            HandleKind::Corner(Corner::BottomLeft) => HandleKind::Corner(Corner::TopRight),
            HandleKind::Corner(Corner::BottomRight) => HandleKind::Corner(Corner::TopLeft),
            HandleKind::Edge(Edge::Top) => HandleKind::Edge(Edge::Bottom),
            HandleKind::Edge(Edge::Right) => HandleKind::Edge(Edge::Left),
            HandleKind::Edge(Edge::Bottom) => HandleKind::Edge(Edge::Top),
            HandleKind::Edge(Edge::Left) => HandleKind::Edge(Edge::Right),
        };
        opposite.position(bounds)
    }
}

/// A handle with its position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    /// `tolerance` is in canvas units, so callers divide screen tolerance by zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// The eight resize handles of `bounds`.
pub fn resize_handles(bounds: Rect) -> Vec<Handle> {
    HandleKind::ALL
        .iter()
        .map(|&kind| Handle::new(kind.position(bounds), kind))
        .collect()
}

/// Find which resize handle (if any) is hit. Corners win over edges.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    resize_handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Position of the grid-duplicate handle: just outside the bottom-right corner.
pub fn grid_handle_position(selection_bounds: Rect, offset: f64) -> Point {
    Point::new(selection_bounds.x1, selection_bounds.y1) + Vec2::new(offset, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_positions() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let handles = resize_handles(bounds);
        assert_eq!(handles.len(), 8);
        assert_eq!(
            HandleKind::Edge(Edge::Right).position(bounds),
            Point::new(100.0, 25.0)
        );
        assert_eq!(
            HandleKind::Corner(Corner::TopLeft).anchor(bounds),
            Point::new(100.0, 50.0)
        );
        assert_eq!(HandleKind::Edge(Edge::Top).anchor(bounds), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(98.0, 49.0), 5.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(bounds, Point::new(51.0, 1.0), 5.0),
            Some(HandleKind::Edge(Edge::Top))
        );
        assert_eq!(hit_test_handles(bounds, Point::new(50.0, 25.0), 5.0), None);
    }

    #[test]
    fn test_grid_handle_outside_selection() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let p = grid_handle_position(bounds, 24.0);
        assert!(!bounds.contains(p));
        assert_eq!(p, Point::new(124.0, 74.0));
    }
}
