//! Drag and resize of selected objects.

use crate::handles::{Edge, HandleKind};
use crate::objects::{ObjectId, ObjectPatch};
use crate::selection::Selection;
use crate::store::ObjectStore;
use kurbo::{Point, Rect, Size, Vec2};

/// State for moving one or more objects at once.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Objects the user is dragging.
    pub ids: Vec<ObjectId>,
    /// Everything that actually moves: `ids` plus descendants of dragged frames.
    moving: Vec<ObjectId>,
    /// Whether this is an alt-drag duplicate operation.
    pub is_duplicate: bool,
    /// Accumulated canvas-space translation.
    pub total: Vec2,
}

impl DragState {
    fn new(store: &ObjectStore, ids: Vec<ObjectId>, is_duplicate: bool) -> Self {
        let mut moving = Vec::new();
        for &id in &ids {
            for moved in std::iter::once(id).chain(store.descendants(id)) {
                if !moving.contains(&moved) {
                    moving.push(moved);
                }
            }
        }
        Self {
            ids,
            moving,
            is_duplicate,
            total: Vec2::ZERO,
        }
    }

    /// Ids that move with the drag.
    pub fn moving(&self) -> &[ObjectId] {
        &self.moving
    }
}

/// Begin dragging `id`.
///
/// An unselected `id` collapses the selection to itself; otherwise the whole
/// selection is dragged. With `duplicate`, the drag set is cloned in place and
/// the clones become both the selection and the drag set.
pub fn begin_drag(
    store: &mut ObjectStore,
    selection: &mut Selection,
    id: ObjectId,
    duplicate: bool,
) -> Option<DragState> {
    if !store.contains(id) {
        return None;
    }
    if !selection.contains(id) {
        selection.set([id]);
    }
    selection.retain_existing(store);

    let mut ids = selection.ids().to_vec();
    if duplicate {
        ids = store.clone_objects(&ids, Vec2::ZERO);
        selection.set(ids.iter().copied());
        log::debug!("Alt-drag duplicated {} object(s)", ids.len());
    }
    Some(DragState::new(store, ids, duplicate))
}

/// Move every object in the drag set by a screen-space delta.
pub fn update_drag(store: &mut ObjectStore, drag: &mut DragState, screen_delta: Vec2, zoom: f64) {
    let delta = screen_delta / zoom;
    drag.moving.retain(|&id| store.contains(id));
    drag.ids.retain(|&id| store.contains(id));
    store.translate_many(&drag.moving, delta);
    drag.total += delta;
}

/// State for resizing a single object with a handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub target: ObjectId,
    pub handle: HandleKind,
    /// Pointer position at the start, in canvas coordinates.
    pub start_point: Point,
    /// Target bounds at the start.
    pub original: Rect,
    /// Descendant bounds at the start, rescaled along with a frame.
    descendants: Vec<(ObjectId, Rect)>,
}

impl ResizeState {
    pub fn new(store: &ObjectStore, target: ObjectId, handle: HandleKind, start_point: Point) -> Option<Self> {
        let original = store.get(target)?.bounds();
        let descendants = store
            .descendants(target)
            .into_iter()
            .filter_map(|id| store.get(id).map(|o| (id, o.bounds())))
            .collect();
        Some(Self {
            target,
            handle,
            start_point,
            original,
            descendants,
        })
    }

    /// New bounds for the target and its descendants with the pointer at `current`.
    ///
    /// Always computed from the starting geometry, so repeated updates never drift.
    pub fn compute(&self, current: Point, proportional: bool, min_size: f64) -> Vec<(ObjectId, Rect)> {
        let delta = current - self.start_point;
        let floor = self.floor(min_size);
        let resized = resize_rect_with_floor(self.original, self.handle, delta, proportional, floor);
        let mut result = Vec::with_capacity(self.descendants.len() + 1);
        result.push((self.target, resized));
        for &(id, rect) in &self.descendants {
            result.push((id, rescale_within(rect, self.original, resized)));
        }
        result
    }

    /// Smallest target size that keeps every descendant at or above `min_size`.
    ///
    /// Descendants already below the floor are never shrunk further.
    fn floor(&self, min_size: f64) -> Size {
        let (w0, h0) = (self.original.width(), self.original.height());
        let mut floor = Size::new(min_size, min_size);
        for (_, rect) in &self.descendants {
            if rect.width() > 0.0 {
                floor.width = floor.width.max(w0 * min_size.min(rect.width()) / rect.width());
            }
            if rect.height() > 0.0 {
                floor.height = floor.height.max(h0 * min_size.min(rect.height()) / rect.height());
            }
        }
        floor
    }

    /// Apply the resize for pointer position `current` to the store.
    pub fn apply(&self, store: &mut ObjectStore, current: Point, proportional: bool, min_size: f64) {
        let patches: Vec<(ObjectId, ObjectPatch)> = self
            .compute(current, proportional, min_size)
            .into_iter()
            .map(|(id, rect)| (id, ObjectPatch::default().rect(rect)))
            .collect();
        store.update_many(&patches);
    }
}

/// Resize `original` by dragging `handle` by `delta`, anchored at the opposite side.
///
/// Width and height never drop below `min_size`. With `proportional` the
/// aspect ratio of `original` is kept; edge handles then grow the other axis
/// symmetrically around the centre.
pub fn resize_rect(original: Rect, handle: HandleKind, delta: Vec2, proportional: bool, min_size: f64) -> Rect {
    resize_rect_with_floor(original, handle, delta, proportional, Size::new(min_size, min_size))
}

/// [`resize_rect`] with a separate floor per axis.
pub fn resize_rect_with_floor(original: Rect, handle: HandleKind, delta: Vec2, proportional: bool, floor: Size) -> Rect {
    let (left, right, top, bottom) = handle.sides();
    let (w0, h0) = (original.width(), original.height());

    let mut width = if left {
        w0 - delta.x
    } else if right {
        w0 + delta.x
    } else {
        w0
    };
    let mut height = if top {
        h0 - delta.y
    } else if bottom {
        h0 + delta.y
    } else {
        h0
    };

    if proportional && w0 > 0.0 && h0 > 0.0 {
        let (sx, sy) = (width / w0, height / h0);
        let scale = match handle {
            HandleKind::Corner(_) => sx.max(sy),
            HandleKind::Edge(Edge::Left | Edge::Right) => sx,
            HandleKind::Edge(Edge::Top | Edge::Bottom) => sy,
        };
        let scale = scale.max(floor.width / w0).max(floor.height / h0);
        width = w0 * scale;
        height = h0 * scale;
    } else {
        width = width.max(floor.width);
        height = height.max(floor.height);
    }

    let center = original.center();
    let x0 = if left {
        original.x1 - width
    } else if right {
        original.x0
    } else {
        center.x - width / 2.0
    };
    let y0 = if top {
        original.y1 - height
    } else if bottom {
        original.y0
    } else {
        center.y - height / 2.0
    };
    Rect::new(x0, y0, x0 + width, y0 + height)
}

/// Map `rect` from `from` to `to`, scaling offset and size uniformly with the container.
pub fn rescale_within(rect: Rect, from: Rect, to: Rect) -> Rect {
    let sx = if from.width() > 0.0 { to.width() / from.width() } else { 1.0 };
    let sy = if from.height() > 0.0 { to.height() / from.height() } else { 1.0 };
    let x0 = to.x0 + (rect.x0 - from.x0) * sx;
    let y0 = to.y0 + (rect.y0 - from.y0) * sy;
    Rect::new(x0, y0, x0 + rect.width() * sx, y0 + rect.height() * sy)
}
