//! Payloads for native primitives and media artifacts.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub content: String,
    pub font_size: f64,
}

impl TextContent {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    /// Rough box size for initial placement; the renderer measures the real one.
    pub fn estimated_size(&self) -> Size {
        let lines = self.content.lines().count().max(1);
        let longest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        Size::new(
            longest as f64 * self.font_size * 0.6,
            lines as f64 * self.font_size * 1.2,
        )
    }
}

/// Primitive shape outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    pub shape: ShapeKind,
    #[serde(default)]
    pub filled: bool,
}

impl ShapeContent {
    pub fn new(shape: ShapeKind) -> Self {
        Self { shape, filled: false }
    }
}

/// Freehand drawing. Points are relative to the object's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doodle {
    pub points: Vec<Point>,
    pub stroke_width: f64,
}

impl Doodle {
    pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

    /// Build a doodle from absolute canvas points, returning it with its bounds.
    pub fn from_canvas_points(points: &[Point]) -> (Self, Rect) {
        let bounds = points
            .iter()
            .fold(None, |acc: Option<Rect>, &p| match acc {
                Some(r) => Some(r.union_pt(p)),
                None => Some(Rect::from_points(p, p)),
            })
            .unwrap_or(Rect::ZERO);
        let origin = bounds.origin();
        let doodle = Self {
            points: points.iter().map(|&p| (p - origin).to_point()).collect(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
        };
        (doodle, bounds)
    }

    /// Scale all points relative to the origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for point in &mut self.points {
            point.x *= sx;
            point.y *= sy;
        }
    }
}

/// Sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticky {
    pub content: String,
}

impl Sticky {
    pub const DEFAULT_SIZE: Size = Size::new(200.0, 200.0);

    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// Web link card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), title: None }
    }
}

/// File-backed artifact (pdf, image, video, audio, document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Path or URL of the underlying file.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Media {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), title: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doodle_points_are_relative() {
        let (doodle, bounds) = Doodle::from_canvas_points(&[
            Point::new(10.0, 20.0),
            Point::new(60.0, 25.0),
            Point::new(30.0, 70.0),
        ]);
        assert_eq!(bounds, Rect::new(10.0, 20.0, 60.0, 70.0));
        assert_eq!(doodle.points[0], Point::ZERO);
        assert_eq!(doodle.points[1], Point::new(50.0, 5.0));
    }

    #[test]
    fn test_empty_doodle() {
        let (doodle, bounds) = Doodle::from_canvas_points(&[]);
        assert!(doodle.points.is_empty());
        assert_eq!(bounds, Rect::ZERO);
    }

    #[test]
    fn test_text_estimate_grows_with_lines() {
        let one = TextContent::new("hello").estimated_size();
        let two = TextContent::new("hello\nworld").estimated_size();
        assert!((two.height - one.height * 2.0).abs() < f64::EPSILON);
        assert!((two.width - one.width).abs() < f64::EPSILON);
    }
}
