//! The single active pointer gesture.
//!
//! Only one variant can be live at a time, so two simultaneous gestures
//! cannot be represented.

use crate::grid::GridPlan;
use crate::manipulation::{DragState, ResizeState};
use crate::objects::ObjectId;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning,
    /// The live box lives in [`Selection`](crate::selection::Selection).
    BoxSelecting,
    DraggingObjects(DragState),
    Resizing(ResizeState),
    DraggingGridHandle {
        ids: Vec<ObjectId>,
        bounds: Rect,
        plan: GridPlan,
    },
    DrawingFrame {
        start: Point,
        current: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Gesture::Panning)
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, Gesture::BoxSelecting)
    }

    pub fn is_dragging_object(&self) -> bool {
        matches!(self, Gesture::DraggingObjects(_))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, Gesture::Resizing(_))
    }

    pub fn is_dragging_handle(&self) -> bool {
        matches!(self, Gesture::DraggingGridHandle { .. })
    }

    pub fn is_drawing_frame(&self) -> bool {
        matches!(self, Gesture::DrawingFrame { .. })
    }

    /// Rectangle being drawn in frame-draw mode, in canvas coordinates.
    pub fn frame_rect(&self) -> Option<Rect> {
        match self {
            Gesture::DrawingFrame { start, current } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning => "panning",
            Gesture::BoxSelecting => "box-selecting",
            Gesture::DraggingObjects(_) => "dragging",
            Gesture::Resizing(_) => "resizing",
            Gesture::DraggingGridHandle { .. } => "grid-duplicating",
            Gesture::DrawingFrame { .. } => "drawing-frame",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_exclusive() {
        let gestures = [
            Gesture::Idle,
            Gesture::Panning,
            Gesture::BoxSelecting,
            Gesture::DrawingFrame { start: Point::ZERO, current: Point::new(10.0, 10.0) },
        ];
        for gesture in &gestures {
            let flags = [
                gesture.is_panning(),
                gesture.is_selecting(),
                gesture.is_dragging_object(),
                gesture.is_resizing(),
                gesture.is_dragging_handle(),
                gesture.is_drawing_frame(),
            ];
            assert!(flags.iter().filter(|&&f| f).count() <= 1, "{}", gesture.name());
        }
    }

    #[test]
    fn test_frame_rect_normalized() {
        let gesture = Gesture::DrawingFrame {
            start: Point::new(50.0, 50.0),
            current: Point::new(10.0, 20.0),
        };
        assert_eq!(gesture.frame_rect(), Some(Rect::new(10.0, 20.0, 50.0, 50.0)));
        assert!(Gesture::Idle.frame_rect().is_none());
    }
}
