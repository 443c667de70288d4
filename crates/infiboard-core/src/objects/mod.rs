//! Object definitions for the canvas.
//!
//! Every placed entity is a [`CanvasObject`]: common geometry and lifecycle
//! fields plus a variant payload in [`ObjectKind`]. Frame-only data is only
//! reachable after matching [`ObjectKind::Frame`].

mod frame;
mod media;

pub use frame::{Frame, FrameLayout};
pub use media::{Doodle, Link, Media, ShapeContent, ShapeKind, Sticky, TextContent};

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for objects.
pub type ObjectId = Uuid;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Colour tag shown on an object's corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorTag {
    #[default]
    None,
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl ColorTag {
    /// Cycle to the next tag.
    pub fn next(self) -> Self {
        match self {
            ColorTag::None => ColorTag::Red,
            ColorTag::Red => ColorTag::Yellow,
            ColorTag::Yellow => ColorTag::Green,
            ColorTag::Green => ColorTag::Blue,
            ColorTag::Blue => ColorTag::Purple,
            ColorTag::Purple => ColorTag::None,
        }
    }

    /// Palette colour for the renderer (`None` draws no tag).
    pub fn color(self) -> Option<Color> {
        match self {
            ColorTag::None => None,
            ColorTag::Red => Some(Color::from_rgba8(0xe5, 0x48, 0x4d, 0xff)),
            ColorTag::Yellow => Some(Color::from_rgba8(0xf5, 0xc5, 0x18, 0xff)),
            ColorTag::Green => Some(Color::from_rgba8(0x30, 0xa4, 0x6c, 0xff)),
            ColorTag::Blue => Some(Color::from_rgba8(0x00, 0x90, 0xff, 0xff)),
            ColorTag::Purple => Some(Color::from_rgba8(0x8e, 0x4e, 0xc6, 0xff)),
        }
    }
}

/// Lifecycle of generated content, independent of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationState {
    #[default]
    Idle,
    PrePlaceholder,
    Generating,
    Error,
}

/// Timestamps and attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub created_at: u64,
    pub updated_at: u64,
    /// Generation progress in `0.0..=1.0`, present while generating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Metadata {
    fn fresh() -> Self {
        let now = now_millis();
        Self {
            created_at: now,
            updated_at: now,
            progress: None,
            created_by: None,
        }
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.created_at);
    }
}

/// Variant payloads, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectKind {
    Text(TextContent),
    Shape(ShapeContent),
    Doodle(Doodle),
    Sticky(Sticky),
    Link(Link),
    Pdf(Media),
    Image(Media),
    Video(Media),
    Audio(Media),
    Document(Media),
    Frame(Frame),
}

impl ObjectKind {
    /// The `type` discriminator as it appears in snapshots.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => "text",
            ObjectKind::Shape(_) => "shape",
            ObjectKind::Doodle(_) => "doodle",
            ObjectKind::Sticky(_) => "sticky",
            ObjectKind::Link(_) => "link",
            ObjectKind::Pdf(_) => "pdf",
            ObjectKind::Image(_) => "image",
            ObjectKind::Video(_) => "video",
            ObjectKind::Audio(_) => "audio",
            ObjectKind::Document(_) => "document",
            ObjectKind::Frame(_) => "frame",
        }
    }
}

/// A placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    pub(crate) id: ObjectId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the centre.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub color_tag: ColorTag,
    /// Back-reference to the containing frame. Maintained by the store only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<ObjectId>,
    #[serde(default)]
    pub(crate) z_index: u64,
    #[serde(default)]
    pub state: GenerationState,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub(crate) kind: ObjectKind,
}

impl CanvasObject {
    /// Create an object of the given kind spanning `rect`.
    pub fn new(kind: ObjectKind, rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            id: Uuid::new_v4(),
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            rotation: 0.0,
            color_tag: ColorTag::None,
            parent_id: None,
            z_index: 0,
            state: GenerationState::Idle,
            metadata: Metadata::fresh(),
            kind,
        }
    }

    /// Create a text object.
    pub fn text(origin: Point, content: impl Into<String>) -> Self {
        let content = TextContent::new(content);
        let size = content.estimated_size();
        Self::new(ObjectKind::Text(content), Rect::from_origin_size(origin, size))
    }

    /// Create a primitive shape.
    pub fn shape(rect: Rect, shape: ShapeKind) -> Self {
        Self::new(ObjectKind::Shape(ShapeContent::new(shape)), rect)
    }

    /// Create a sticky note with the default note size.
    pub fn sticky(origin: Point, content: impl Into<String>) -> Self {
        let rect = Rect::from_origin_size(origin, Sticky::DEFAULT_SIZE);
        Self::new(ObjectKind::Sticky(Sticky::new(content)), rect)
    }

    /// Create a doodle from absolute canvas points.
    pub fn doodle(points: &[Point]) -> Self {
        let (doodle, bounds) = Doodle::from_canvas_points(points);
        Self::new(ObjectKind::Doodle(doodle), bounds)
    }

    /// Create a link card.
    pub fn link(rect: Rect, url: impl Into<String>) -> Self {
        Self::new(ObjectKind::Link(Link::new(url)), rect)
    }

    /// Create a frame with default layout settings.
    pub fn frame(rect: Rect, padding: f64, gap: f64) -> Self {
        Self::new(ObjectKind::Frame(Frame::new(padding, gap)), rect)
    }

    /// Create a generated-artifact placeholder awaiting content.
    pub fn placeholder(kind: ObjectKind, rect: Rect) -> Self {
        let mut object = Self::new(kind, rect);
        object.state = GenerationState::PrePlaceholder;
        object
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn parent_id(&self) -> Option<ObjectId> {
        self.parent_id
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Mutable access to the variant payload.
    ///
    /// Frame membership is not exposed mutably; see [`Frame`].
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, ObjectKind::Frame(_))
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match &self.kind {
            ObjectKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_frame_mut(&mut self) -> Option<&mut Frame> {
        match &mut self.kind {
            ObjectKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Axis-aligned bounds in canvas coordinates (rotation ignored).
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Move and resize to `rect`.
    ///
    /// Doodle points are rescaled so the drawing follows its box.
    pub fn set_bounds(&mut self, rect: Rect) {
        if let ObjectKind::Doodle(doodle) = &mut self.kind {
            let sx = if self.width > 0.0 { rect.width() / self.width } else { 1.0 };
            let sy = if self.height > 0.0 { rect.height() / self.height } else { 1.0 };
            doodle.scale(sx, sy);
        }
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Check if a canvas point hits this object.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Clone with a fresh id and timestamps, detached from any frame.
    ///
    /// A duplicated frame starts empty; [`ObjectStore::clone_objects`](crate::store::ObjectStore::clone_objects)
    /// re-links cloned descendants.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.parent_id = None;
        copy.z_index = 0;
        copy.metadata = Metadata {
            created_by: self.metadata.created_by.clone(),
            progress: self.metadata.progress,
            ..Metadata::fresh()
        };
        if let Some(frame) = copy.as_frame_mut() {
            frame.children.clear();
        }
        copy
    }
}

/// Shallow partial update of common fields.
///
/// Identity, parent linkage and frame membership are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub color_tag: Option<ColorTag>,
    pub state: Option<GenerationState>,
    pub progress: Option<Option<f64>>,
}

impl ObjectPatch {
    pub fn position(mut self, point: Point) -> Self {
        self.x = Some(point.x);
        self.y = Some(point.y);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.width = Some(size.width);
        self.height = Some(size.height);
        self
    }

    pub fn rect(self, rect: Rect) -> Self {
        self.position(rect.origin()).size(rect.size())
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn color_tag(mut self, tag: ColorTag) -> Self {
        self.color_tag = Some(tag);
        self
    }

    pub fn state(mut self, state: GenerationState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn progress(mut self, progress: Option<f64>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check if the patch changes geometry.
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    /// Merge this patch into `object`.
    pub fn apply(&self, object: &mut CanvasObject) {
        if self.width.is_some() || self.height.is_some() {
            let rect = Rect::from_origin_size(
                object.origin(),
                Size::new(
                    self.width.unwrap_or(object.width),
                    self.height.unwrap_or(object.height),
                ),
            );
            object.set_bounds(rect);
        }
        if let Some(x) = self.x {
            object.x = x;
        }
        if let Some(y) = self.y {
            object.y = y;
        }
        if let Some(rotation) = self.rotation {
            object.rotation = rotation;
        }
        if let Some(tag) = self.color_tag {
            object.color_tag = tag;
        }
        if let Some(state) = self.state {
            object.state = state;
        }
        if let Some(progress) = self.progress {
            object.metadata.progress = progress.map(|p| p.clamp(0.0, 1.0));
        }
        object.metadata.touch();
    }
}
