//! Selection state and box selection.

use crate::objects::{CanvasObject, ObjectId};
use crate::store::ObjectStore;
use kurbo::{Point, Rect};

/// A live box-selection gesture, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelection {
    pub start: Point,
    pub current: Point,
}

impl BoxSelection {
    pub fn new(start: Point) -> Self {
        Self { start, current: start }
    }

    /// Normalized query rectangle, independent of drag direction.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

/// Check if `object` is not entirely outside `query`.
///
/// Touching edges count as inside.
pub fn intersects_box(object: Rect, query: Rect) -> bool {
    let query = query.abs();
    !(object.x1 < query.x0 || object.x0 > query.x1 || object.y1 < query.y0 || object.y0 > query.y1)
}

/// Componentwise min/max over all rects, or a zero rect when there are none.
pub fn bounding_box<I: IntoIterator<Item = Rect>>(rects: I) -> Rect {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for rect in rects {
        min_x = min_x.min(rect.x0);
        min_y = min_y.min(rect.y0);
        max_x = max_x.max(rect.x1);
        max_y = max_y.max(rect.y1);
    }
    if min_x.is_finite() && max_x.is_finite() {
        Rect::new(min_x, min_y, max_x, max_y)
    } else {
        Rect::ZERO
    }
}

/// Ordered set of selected object ids plus the box-selection gesture.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<ObjectId>,
    box_selection: Option<BoxSelection>,
    /// Set when a box selection completes; swallows the following empty click.
    suppress_next_empty_click: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_multi_select(&self) -> bool {
        self.ids.len() > 1
    }

    /// The only selected id, if exactly one is selected.
    pub fn single(&self) -> Option<ObjectId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn box_selection(&self) -> Option<&BoxSelection> {
        self.box_selection.as_ref()
    }

    pub fn is_box_selecting(&self) -> bool {
        self.box_selection.is_some()
    }

    /// Replace the selection.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn add(&mut self, id: ObjectId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&s| s != id);
        self.ids.len() != before
    }

    /// Toggle membership of `id`.
    pub fn toggle(&mut self, id: ObjectId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    /// Click on an object: modifier toggles, otherwise replace unless already selected.
    pub fn click(&mut self, id: ObjectId, multi: bool) {
        self.suppress_next_empty_click = false;
        if multi {
            self.toggle(id);
        } else if !self.contains(id) {
            self.set([id]);
        }
    }

    /// Click on empty canvas. Returns true if the selection was cleared.
    pub fn click_empty(&mut self) -> bool {
        if std::mem::take(&mut self.suppress_next_empty_click) {
            return false;
        }
        let had_selection = !self.ids.is_empty();
        self.ids.clear();
        had_selection
    }

    pub fn select_all(&mut self, store: &ObjectStore) {
        self.set(store.objects().iter().map(CanvasObject::id));
    }

    /// Drop ids that no longer exist in the store. Returns true if any were removed.
    pub fn retain_existing(&mut self, store: &ObjectStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| store.contains(id));
        self.ids.len() != before
    }

    /// Selected objects that still exist.
    pub fn objects<'a>(&'a self, store: &'a ObjectStore) -> impl Iterator<Item = &'a CanvasObject> + 'a {
        self.ids.iter().filter_map(move |&id| store.get(id))
    }

    /// Bounding box of the existing selected objects (zero rect when empty).
    pub fn bounds(&self, store: &ObjectStore) -> Rect {
        bounding_box(self.objects(store).map(CanvasObject::bounds))
    }

    pub fn begin_box(&mut self, start: Point) {
        self.suppress_next_empty_click = false;
        self.box_selection = Some(BoxSelection::new(start));
    }

    /// Drop a pending empty-click guard. A new press means the click that
    /// followed the box selection has already been delivered, or never will be.
    pub fn reset_click_guard(&mut self) {
        self.suppress_next_empty_click = false;
    }

    /// Move the live corner and recompute the selected set.
    pub fn update_box(&mut self, current: Point, store: &ObjectStore) {
        let Some(selection) = self.box_selection.as_mut() else {
            return;
        };
        selection.current = current;
        let query = selection.rect();
        self.set(
            store
                .objects()
                .iter()
                .filter(|o| intersects_box(o.bounds(), query))
                .map(CanvasObject::id),
        );
    }

    /// Finish the box selection and arm the one-shot empty-click guard.
    pub fn end_box(&mut self) {
        if self.box_selection.take().is_some() {
            self.suppress_next_empty_click = true;
        }
    }

    /// Abandon the box selection without arming the guard.
    pub fn cancel_box(&mut self) {
        self.box_selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ShapeKind;

    fn store_with(rects: &[Rect]) -> (ObjectStore, Vec<ObjectId>) {
        let mut store = ObjectStore::new();
        let ids = rects
            .iter()
            .map(|&r| store.add(CanvasObject::shape(r, ShapeKind::Rectangle)))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_intersects_not_entirely_outside() {
        let query = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(intersects_box(Rect::new(90.0, 90.0, 200.0, 200.0), query));
        assert!(intersects_box(Rect::new(100.0, 0.0, 150.0, 10.0), query));
        assert!(!intersects_box(Rect::new(101.0, 0.0, 150.0, 10.0), query));
    }

    #[test]
    fn test_box_selection_symmetry() {
        let (store, ids) = store_with(&[
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(50.0, 50.0, 60.0, 60.0),
            Rect::new(200.0, 200.0, 210.0, 210.0),
        ]);
        let a = Point::new(-5.0, -5.0);
        let b = Point::new(55.0, 55.0);

        let mut forward = Selection::new();
        forward.begin_box(a);
        forward.update_box(b, &store);

        let mut backward = Selection::new();
        backward.begin_box(b);
        backward.update_box(a, &store);

        assert_eq!(forward.ids(), backward.ids());
        assert_eq!(forward.ids(), &ids[..2]);
    }

    #[test]
    fn test_click_semantics() {
        let (_, ids) = store_with(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(2.0, 2.0, 3.0, 3.0)]);
        let mut selection = Selection::new();

        selection.click(ids[0], false);
        assert_eq!(selection.ids(), &[ids[0]]);
        selection.click(ids[1], true);
        assert!(selection.is_multi_select());
        selection.click(ids[0], true);
        assert_eq!(selection.ids(), &[ids[1]]);
        selection.click(ids[0], false);
        assert_eq!(selection.single(), Some(ids[0]));
    }

    #[test]
    fn test_empty_click_guard_after_box() {
        let (store, _) = store_with(&[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let mut selection = Selection::new();
        selection.begin_box(Point::new(-1.0, -1.0));
        selection.update_box(Point::new(20.0, 20.0), &store);
        selection.end_box();

        assert!(!selection.click_empty());
        assert_eq!(selection.len(), 1);
        // Guard is one-shot
        assert!(selection.click_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_click_guard_does_not_outlive_next_press() {
        let (store, _) = store_with(&[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let mut selection = Selection::new();
        selection.begin_box(Point::new(-1.0, -1.0));
        selection.update_box(Point::new(20.0, 20.0), &store);
        selection.end_box();

        selection.reset_click_guard();
        assert!(selection.click_empty());
        assert!(selection.is_empty());

        // Starting another box also disarms it.
        selection.begin_box(Point::new(-1.0, -1.0));
        selection.update_box(Point::new(20.0, 20.0), &store);
        selection.end_box();
        selection.begin_box(Point::new(50.0, 50.0));
        selection.cancel_box();
        assert!(selection.click_empty());
    }

    #[test]
    fn test_bounds() {
        let (store, ids) = store_with(&[
            Rect::new(10.0, 20.0, 30.0, 40.0),
            Rect::new(-5.0, 25.0, 15.0, 100.0),
        ]);
        let mut selection = Selection::new();
        assert_eq!(selection.bounds(&store), Rect::ZERO);

        selection.set(ids.clone());
        assert_eq!(selection.bounds(&store), Rect::new(-5.0, 20.0, 30.0, 100.0));
    }

    #[test]
    fn test_retain_existing_filters_dangling() {
        let (mut store, ids) = store_with(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(2.0, 2.0, 3.0, 3.0)]);
        let mut selection = Selection::new();
        selection.set(ids.clone());
        store.delete(ids[0]);

        assert_eq!(selection.bounds(&store), Rect::new(2.0, 2.0, 3.0, 3.0));
        assert!(selection.retain_existing(&store));
        assert_eq!(selection.ids(), &[ids[1]]);
    }
}
