//! Camera module for pan/zoom transforms.

use crate::config::ZoomConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the viewport transform between screen and canvas space.
///
/// `canvas = (screen - offset) / zoom` and `screen = canvas * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Increment used by `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&ZoomConfig::default())
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the given zoom limits.
    pub fn from_config(config: &ZoomConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(config.min, config.max),
            min_zoom: config.min,
            max_zoom: config.max,
            zoom_step: config.step,
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.zoom,
            (screen_point.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        Point::new(
            canvas_point.x * self.zoom + self.offset.x,
            canvas_point.y * self.zoom + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Clamp a zoom level into this camera's bounds.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom level, keeping the canvas point under `anchor` fixed on screen.
    ///
    /// `new_zoom` is clamped first. Returns false if the zoom did not change.
    pub fn zoom_at(&mut self, anchor: Point, new_zoom: f64) -> bool {
        let new_zoom = self.clamp_zoom(new_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        // pan' = anchor - ((anchor - pan) / zoom) * new_zoom
        let anchor = anchor.to_vec2();
        self.offset = anchor - ((anchor - self.offset) / self.zoom) * new_zoom;
        self.zoom = new_zoom;
        true
    }

    /// Multiply the zoom level by `factor`, keeping `anchor` fixed.
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) -> bool {
        self.zoom_at(anchor, self.zoom * factor)
    }

    /// Step the zoom level up by one increment around `anchor`.
    pub fn zoom_in(&mut self, anchor: Point) -> bool {
        self.zoom_at(anchor, self.zoom + self.zoom_step)
    }

    /// Step the zoom level down by one increment around `anchor`.
    pub fn zoom_out(&mut self, anchor: Point) -> bool {
        self.zoom_at(anchor, self.zoom - self.zoom_step)
    }

    /// Reset camera to 100% zoom at the origin.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.clamp_zoom(1.0);
    }

    /// Visible canvas area for a viewport of the given size.
    pub fn visible_rect(&self, viewport: Size) -> Rect {
        let top_left = self.screen_to_canvas(Point::ZERO);
        let bottom_right = self.screen_to_canvas(Point::new(viewport.width, viewport.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Fit the camera to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = self.clamp_zoom(scale_x.min(scale_y));

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let canvas = camera.screen_to_canvas(Point::new(150.0, 300.0));
        assert!(approx(canvas, Point::new(50.0, 100.0)));
    }

    #[test]
    fn test_roundtrip_conversion() {
        for &zoom in &[0.1, 0.37, 1.0, 1.5, 3.0] {
            for &pan in &[Vec2::ZERO, Vec2::new(30.0, -20.0), Vec2::new(-812.5, 4096.25)] {
                let camera = Camera { zoom, offset: pan, ..Camera::new() };
                for &p in &[Point::ZERO, Point::new(123.0, 456.0), Point::new(-9876.5, 0.125)] {
                    let back = camera.screen_to_canvas(camera.canvas_to_screen(p));
                    assert!(approx(back, p), "zoom {zoom} pan {pan:?} point {p:?}");
                }
            }
        }
    }

    #[test]
    fn test_affine_matches_direct_conversion() {
        let camera = Camera { zoom: 1.75, offset: Vec2::new(12.0, -40.0), ..Camera::new() };
        let p = Point::new(33.0, 71.0);
        assert!(approx(camera.transform() * p, camera.canvas_to_screen(p)));
        assert!(approx(camera.inverse_transform() * p, camera.screen_to_canvas(p)));
    }

    #[test]
    fn test_zoom_anchor_invariant() {
        let anchors = [Point::ZERO, Point::new(400.0, 300.0), Point::new(-25.0, 1280.0)];
        let zooms = [0.1, 0.5, 1.0, 2.2, 3.0];
        for &anchor in &anchors {
            for &from in &zooms {
                for &to in &zooms {
                    let mut camera = Camera { zoom: from, offset: Vec2::new(17.0, -3.5), ..Camera::new() };
                    let before = camera.screen_to_canvas(anchor);
                    camera.zoom_at(anchor, to);
                    let after = camera.screen_to_canvas(anchor);
                    assert!(approx(before, after), "anchor {anchor:?} {from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_by(Point::ZERO, 0.001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);

        camera.zoom_by(Point::ZERO, 1000.0);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
        assert!(!camera.zoom_in(Point::ZERO));
    }

    #[test]
    fn test_zoom_steps() {
        let mut camera = Camera::new();
        assert!(camera.zoom_in(Point::new(100.0, 100.0)));
        assert!((camera.zoom - 1.1).abs() < 1e-12);
        assert!(camera.zoom_out(Point::new(100.0, 100.0)));
        assert!(camera.zoom_out(Point::new(100.0, 100.0)));
        assert!((camera.zoom - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.zoom_at(Point::new(5.0, 5.0), 2.5);
        camera.reset();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        camera.pan(Vec2::new(-1.0e7, 3.0e7));
        assert!((camera.offset.x - (10.0 - 1.0e7)).abs() < 1e-6);
        assert!((camera.offset.y - (20.0 + 3.0e7)).abs() < 1e-6);
    }

    #[test]
    fn test_fit_to_bounds_centers_content() {
        let mut camera = Camera::new();
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        camera.fit_to_bounds(bounds, Size::new(800.0, 600.0), 50.0);
        let center = camera.canvas_to_screen(bounds.center());
        assert!(approx(center, Point::new(400.0, 300.0)));
        assert!((camera.zoom - 3.0).abs() < f64::EPSILON);
    }
}
