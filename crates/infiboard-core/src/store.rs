//! Object store: the authoritative collection of placed objects.
//!
//! The collection lives behind an [`Arc`]. Mutations go through
//! [`Arc::make_mut`], so a snapshot handed to an observer (history, renderer)
//! never changes after the fact: the first mutation after a snapshot was taken
//! copies the collection and edits the copy.

use crate::error::{StoreError, StoreResult};
use crate::objects::{CanvasObject, ObjectId, ObjectKind, ObjectPatch};
use kurbo::{Point, Rect, Vec2};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable view of the store at one point in time.
pub type Snapshot = Arc<Vec<CanvasObject>>;

#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    /// Objects in insertion order.
    objects: Snapshot,
    /// Bumped on every mutation.
    revision: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects_mut(&mut self) -> &mut Vec<CanvasObject> {
        self.revision += 1;
        Arc::make_mut(&mut self.objects)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Current snapshot (cheap clone of the shared collection).
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.objects)
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in draw order (back to front).
    ///
    /// Siblings are ordered by z-index (stable, so ties keep insertion order)
    /// and every frame is drawn directly before its descendants.
    pub fn ordered(&self) -> Vec<&CanvasObject> {
        let mut by_z: Vec<&CanvasObject> = self.objects.iter().collect();
        by_z.sort_by_key(|o| o.z_index);

        let mut ordered = Vec::with_capacity(by_z.len());
        let mut emitted = HashSet::new();
        for root in by_z.iter().filter(|o| self.parent_of(o.id).is_none()) {
            self.push_subtree(*root, &by_z, &mut emitted, &mut ordered);
        }
        // Anything unreachable from a root (only possible with a cycle) still gets drawn.
        for object in by_z {
            if emitted.insert(object.id) {
                ordered.push(object);
            }
        }
        ordered
    }

    fn push_subtree<'a>(
        &'a self,
        object: &'a CanvasObject,
        by_z: &[&'a CanvasObject],
        emitted: &mut HashSet<ObjectId>,
        out: &mut Vec<&'a CanvasObject>,
    ) {
        if !emitted.insert(object.id) {
            return;
        }
        out.push(object);
        if let Some(frame) = object.as_frame() {
            for child in by_z.iter().filter(|c| frame.contains(c.id) && c.parent_id == Some(object.id)) {
                self.push_subtree(*child, by_z, emitted, out);
            }
        }
    }

    pub fn max_z_index(&self) -> u64 {
        self.objects.iter().map(|o| o.z_index).max().unwrap_or(0)
    }

    /// Add an object, assigning the next z-index.
    ///
    /// Objects enter unparented and frames enter empty; membership is only
    /// established through [`attach`](Self::attach).
    pub fn add(&mut self, object: CanvasObject) -> ObjectId {
        self.add_many(vec![object]).pop().unwrap_or_default()
    }

    /// Add several objects in one mutation, with consecutive z-indices.
    pub fn add_many(&mut self, objects: Vec<CanvasObject>) -> Vec<ObjectId> {
        if objects.is_empty() {
            return Vec::new();
        }
        let mut next_z = self.max_z_index() + 1;
        let mut seen: HashSet<ObjectId> = self.objects.iter().map(|o| o.id).collect();
        let mut ids = Vec::with_capacity(objects.len());
        let list = self.objects_mut();
        for mut object in objects {
            if !seen.insert(object.id) {
                log::warn!("Object id {} already present, assigning a fresh one", object.id);
                object.id = uuid::Uuid::new_v4();
                seen.insert(object.id);
            }
            object.parent_id = None;
            if let Some(frame) = object.as_frame_mut() {
                frame.children.clear();
            }
            object.z_index = next_z;
            next_z += 1;
            ids.push(object.id);
            list.push(object);
        }
        ids
    }

    /// Shallow-merge `patch` into an object. Returns false if it does not exist.
    pub fn update(&mut self, id: ObjectId, patch: &ObjectPatch) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        patch.apply(&mut self.objects_mut()[idx]);
        true
    }

    /// Apply a closure to one object. Identity and frame membership stay crate-private.
    pub fn update_with(&mut self, id: ObjectId, f: impl FnOnce(&mut CanvasObject)) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let object = &mut self.objects_mut()[idx];
        let children = object.as_frame().map(|frame| frame.children.clone());
        f(object);
        object.metadata.touch();
        // Membership survives payload edits; a frame swapped for another kind releases its children.
        let orphaned = match (object.as_frame_mut(), children) {
            (Some(frame), kept) => {
                frame.children = kept.unwrap_or_default();
                false
            }
            (None, Some(children)) => !children.is_empty(),
            (None, None) => false,
        };
        if orphaned {
            self.repair_links();
        }
        true
    }

    /// Apply the same patch to several objects in one mutation.
    pub fn update_many(&mut self, patches: &[(ObjectId, ObjectPatch)]) -> usize {
        let indices: Vec<(usize, &ObjectPatch)> = patches
            .iter()
            .filter_map(|(id, patch)| self.index_of(*id).map(|idx| (idx, patch)))
            .collect();
        if indices.is_empty() {
            return 0;
        }
        let list = self.objects_mut();
        for &(idx, patch) in &indices {
            patch.apply(&mut list[idx]);
        }
        indices.len()
    }

    /// Translate several objects in one mutation.
    pub fn translate_many(&mut self, ids: &[ObjectId], delta: Vec2) -> usize {
        let wanted: HashSet<ObjectId> = ids.iter().copied().collect();
        if wanted.is_empty() || delta == Vec2::ZERO {
            return 0;
        }
        let mut moved = 0;
        for object in self.objects_mut().iter_mut().filter(|o| wanted.contains(&o.id)) {
            object.translate(delta);
            moved += 1;
        }
        moved
    }

    /// The ids removed by deleting `ids`: each id plus, for frames, all current
    /// descendants. Missing ids are skipped.
    pub fn cascade_set(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        for &id in ids {
            if !self.contains(id) || !seen.insert(id) {
                continue;
            }
            result.push(id);
            for descendant in self.descendants(id) {
                if seen.insert(descendant) {
                    result.push(descendant);
                }
            }
        }
        result
    }

    /// Delete one object; a frame takes all of its children with it.
    pub fn delete(&mut self, id: ObjectId) -> Vec<ObjectId> {
        self.delete_many(&[id])
    }

    /// Delete the union of every id's cascade set in one mutation.
    pub fn delete_many(&mut self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let removed = self.cascade_set(ids);
        if removed.is_empty() {
            return removed;
        }
        let gone: HashSet<ObjectId> = removed.iter().copied().collect();
        let list = self.objects_mut();
        list.retain(|o| !gone.contains(&o.id));
        for object in list.iter_mut() {
            if let Some(frame) = object.as_frame_mut() {
                frame.children.retain(|c| !gone.contains(c));
            }
        }
        log::debug!("Deleted {} object(s)", removed.len());
        removed
    }

    /// The frame `id` belongs to, if the link is intact in both directions.
    pub fn parent_of(&self, id: ObjectId) -> Option<ObjectId> {
        let parent = self.get(id)?.parent_id?;
        self.get(parent)
            .and_then(CanvasObject::as_frame)
            .filter(|frame| frame.contains(id))
            .map(|_| parent)
    }

    /// Existing children of a frame, in layout order.
    pub fn children_of(&self, frame_id: ObjectId) -> Vec<ObjectId> {
        self.get(frame_id)
            .and_then(CanvasObject::as_frame)
            .map(|frame| {
                frame
                    .children
                    .iter()
                    .copied()
                    .filter(|&c| self.contains(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All transitive children of a frame (empty for non-frames).
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut stack = self.children_of(id);
        stack.reverse();
        while let Some(child) = stack.pop() {
            if !seen.insert(child) {
                continue;
            }
            result.push(child);
            let mut grandchildren = self.children_of(child);
            grandchildren.reverse();
            stack.extend(grandchildren);
        }
        result
    }

    /// Check if `ancestor` contains `id`, directly or transitively.
    pub fn is_descendant_of(&self, id: ObjectId, ancestor: ObjectId) -> bool {
        let mut current = self.parent_of(id);
        let mut hops = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.objects.len() {
                break;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Append objects to a frame's children, detaching them from any previous frame.
    ///
    /// Missing ids, the frame itself and its ancestors are skipped. Returns the
    /// ids actually attached.
    pub fn attach(&mut self, frame_id: ObjectId, child_ids: &[ObjectId]) -> Vec<ObjectId> {
        if !self.get(frame_id).is_some_and(CanvasObject::is_frame) {
            log::warn!("Cannot attach to {frame_id}: not a frame");
            return Vec::new();
        }
        let mut accepted = Vec::new();
        for &child in child_ids {
            if child == frame_id
                || accepted.contains(&child)
                || !self.contains(child)
                || self.is_descendant_of(frame_id, child)
            {
                continue;
            }
            accepted.push(child);
        }
        if accepted.is_empty() {
            return accepted;
        }

        let moving: HashSet<ObjectId> = accepted.iter().copied().collect();
        let list = self.objects_mut();
        for object in list.iter_mut() {
            if object.id != frame_id {
                if let Some(frame) = object.as_frame_mut() {
                    frame.children.retain(|c| !moving.contains(c));
                }
            }
            if moving.contains(&object.id) {
                object.parent_id = Some(frame_id);
            }
        }
        if let Some(frame) = list
            .iter_mut()
            .find(|o| o.id == frame_id)
            .and_then(CanvasObject::as_frame_mut)
        {
            frame.children.retain(|c| !moving.contains(c));
            frame.children.extend(accepted.iter().copied());
        }
        accepted
    }

    /// Remove one object from its frame. Returns false if it had no frame.
    pub fn detach(&mut self, id: ObjectId) -> bool {
        let Some(parent) = self.get(id).and_then(|o| o.parent_id) else {
            return false;
        };
        let list = self.objects_mut();
        for object in list.iter_mut() {
            if object.id == id {
                object.parent_id = None;
            } else if object.id == parent {
                if let Some(frame) = object.as_frame_mut() {
                    frame.children.retain(|&c| c != id);
                }
            }
        }
        true
    }

    /// Empty a frame, clearing every child's back-reference.
    pub fn detach_all(&mut self, frame_id: ObjectId) -> Vec<ObjectId> {
        let children = self.children_of(frame_id);
        if children.is_empty() && !self.get(frame_id).is_some_and(CanvasObject::is_frame) {
            return children;
        }
        let list = self.objects_mut();
        for object in list.iter_mut() {
            if object.id == frame_id {
                if let Some(frame) = object.as_frame_mut() {
                    frame.children.clear();
                }
            } else if object.parent_id == Some(frame_id) {
                object.parent_id = None;
            }
        }
        children
    }

    /// Set a frame's auto-layout flag. Returns false if `id` is not a frame.
    pub(crate) fn set_auto_layout_flag(&mut self, id: ObjectId, enabled: bool) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if !self.objects[idx].is_frame() {
            return false;
        }
        let object = &mut self.objects_mut()[idx];
        if let Some(frame) = object.as_frame_mut() {
            frame.auto_layout = enabled;
        }
        object.metadata.touch();
        true
    }

    /// Fix parent/child links so both directions agree.
    ///
    /// The frame's `children` list wins: stale entries are dropped, children are
    /// claimed by the first frame that lists them, and back-references pointing
    /// at missing frames are cleared. Returns the number of repairs.
    pub fn repair_links(&mut self) -> usize {
        let ids: HashSet<ObjectId> = self.objects.iter().map(|o| o.id).collect();
        let mut owner: HashMap<ObjectId, ObjectId> = HashMap::new();
        let mut frame_children: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        let mut repairs = 0;

        for object in self.objects.iter() {
            let Some(frame) = object.as_frame() else { continue };
            let mut kept = Vec::with_capacity(frame.children.len());
            for &child in &frame.children {
                if ids.contains(&child) && child != object.id && !owner.contains_key(&child) {
                    owner.insert(child, object.id);
                    kept.push(child);
                } else {
                    repairs += 1;
                }
            }
            frame_children.insert(object.id, kept);
        }
        repairs += self
            .objects
            .iter()
            .filter(|o| o.parent_id != owner.get(&o.id).copied())
            .count();

        if repairs == 0 {
            return 0;
        }
        log::warn!("Repairing {repairs} broken frame link(s)");
        for object in self.objects_mut().iter_mut() {
            object.parent_id = owner.get(&object.id).copied();
            let id = object.id;
            if let Some(frame) = object.as_frame_mut() {
                if let Some(kept) = frame_children.remove(&id) {
                    frame.children = kept;
                }
            }
        }
        repairs
    }

    /// Replace the whole collection (history replay).
    ///
    /// Rejects snapshots with duplicate ids; repairs broken links.
    pub fn replace_all(&mut self, snapshot: Snapshot) -> StoreResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = snapshot.iter().find(|o| !seen.insert(o.id)) {
            return Err(StoreError::DuplicateId(dup.id));
        }
        self.objects = snapshot;
        self.revision += 1;
        self.repair_links();
        Ok(())
    }

    /// Deep-clone objects, offset by `delta`, and append the copies in one batch.
    ///
    /// Frames are cloned together with their descendants, which stay linked to
    /// the cloned frame. Ids already covered by a cloned ancestor are skipped.
    /// Returns the ids of the top-level clones, in input order.
    pub fn clone_objects(&mut self, ids: &[ObjectId], delta: Vec2) -> Vec<ObjectId> {
        self.clone_batch(ids, &[delta])
    }

    /// Like [`clone_objects`](Self::clone_objects), once per offset, all in a
    /// single mutation. Returns top-level clone ids grouped by offset.
    pub fn clone_batch(&mut self, ids: &[ObjectId], offsets: &[Vec2]) -> Vec<ObjectId> {
        let roots = self.clone_roots(ids);
        if roots.is_empty() || offsets.is_empty() {
            return Vec::new();
        }

        let mut copies: Vec<CanvasObject> = Vec::new();
        let mut top_level = Vec::with_capacity(roots.len() * offsets.len());
        for &delta in offsets {
            for &root in &roots {
                if let Some(new_root) = self.copy_subtree(root, delta, &mut copies) {
                    top_level.push(new_root);
                }
            }
        }

        let mut next_z = self.max_z_index() + 1;
        let list = self.objects_mut();
        for mut copy in copies {
            copy.z_index = next_z;
            next_z += 1;
            list.push(copy);
        }
        top_level
    }

    /// Existing, de-duplicated ids that are not descendants of another requested id.
    fn clone_roots(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut roots: Vec<ObjectId> = Vec::new();
        for &id in ids {
            if roots.contains(&id) || !self.contains(id) {
                continue;
            }
            if ids.iter().any(|&other| other != id && self.is_descendant_of(id, other)) {
                continue;
            }
            roots.push(id);
        }
        roots
    }

    /// Copy `root` and its descendants into `out`, re-linking the copies.
    fn copy_subtree(&self, root: ObjectId, delta: Vec2, out: &mut Vec<CanvasObject>) -> Option<ObjectId> {
        let subtree: Vec<ObjectId> = std::iter::once(root).chain(self.descendants(root)).collect();
        let mut remap: HashMap<ObjectId, ObjectId> = HashMap::new();
        let start = out.len();
        for &old in &subtree {
            let Some(original) = self.get(old) else { continue };
            let mut copy = original.duplicate();
            copy.translate(delta);
            remap.insert(old, copy.id);
            out.push(copy);
        }

        let copies = &mut out[start..];
        for &old in &subtree {
            let (Some(&new_id), Some(frame)) = (remap.get(&old), self.get(old).and_then(CanvasObject::as_frame)) else {
                continue;
            };
            let new_children: Vec<ObjectId> = frame.children.iter().filter_map(|c| remap.get(c).copied()).collect();
            for copy in copies.iter_mut() {
                if new_children.contains(&copy.id) {
                    copy.parent_id = Some(new_id);
                }
            }
            if let Some(copy_frame) = copies.iter_mut().find(|c| c.id == new_id).and_then(CanvasObject::as_frame_mut) {
                copy_frame.children = new_children;
            }
        }
        remap.get(&root).copied()
    }

    /// Objects under a canvas point, front to back.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.ordered()
            .into_iter()
            .rev()
            .filter(|o| o.hit_test(point, tolerance))
            .map(|o| o.id)
            .collect()
    }

    /// Topmost object under a point.
    pub fn topmost_at_point(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        self.objects_at_point(point, tolerance).first().copied()
    }

    /// Union of all object bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .map(CanvasObject::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Serialize the current snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.objects)
    }

    /// Replace the collection with objects decoded from JSON.
    pub fn load_json(&mut self, json: &str) -> StoreResult<()> {
        let objects: Vec<CanvasObject> = serde_json::from_str(json)?;
        self.replace_all(Arc::new(objects))
    }

    /// Ids of frames among `ids`.
    pub fn frames_in(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        ids.iter()
            .copied()
            .filter(|&id| matches!(self.get(id).map(CanvasObject::kind), Some(ObjectKind::Frame(_))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ShapeKind;

    fn rect_obj(x: f64, y: f64, w: f64, h: f64) -> CanvasObject {
        CanvasObject::shape(Rect::new(x, y, x + w, y + h), ShapeKind::Rectangle)
    }

    fn frame_obj() -> CanvasObject {
        CanvasObject::frame(Rect::new(0.0, 0.0, 500.0, 500.0), 10.0, 10.0)
    }

    #[test]
    fn test_add_assigns_increasing_z() {
        let mut store = ObjectStore::new();
        let a = store.add(rect_obj(0.0, 0.0, 10.0, 10.0));
        let b = store.add(rect_obj(5.0, 5.0, 10.0, 10.0));
        assert!(store.get(a).unwrap().z_index() < store.get(b).unwrap().z_index());
        let ordered: Vec<ObjectId> = store.ordered().iter().map(|o| o.id()).collect();
        assert_eq!(ordered, vec![a, b]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = ObjectStore::new();
        let obj = rect_obj(0.0, 0.0, 10.0, 10.0);
        let a = store.add(obj.clone());
        let b = store.add(obj);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let mut store = ObjectStore::new();
        let id = store.add(rect_obj(0.0, 0.0, 10.0, 10.0));
        let snapshot = store.snapshot();

        store.update(id, &ObjectPatch::default().position(Point::new(99.0, 99.0)));
        store.add(rect_obj(1.0, 1.0, 1.0, 1.0));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].origin(), Point::ZERO);
        assert_eq!(store.get(id).unwrap().origin(), Point::new(99.0, 99.0));
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = ObjectStore::new();
        let revision = store.revision();
        assert!(!store.update(uuid::Uuid::new_v4(), &ObjectPatch::default()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_attach_links_both_directions() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        let b = store.add(rect_obj(30.0, 10.0, 10.0, 10.0));

        assert_eq!(store.attach(frame, &[a, b]), vec![a, b]);
        assert_eq!(store.children_of(frame), vec![a, b]);
        assert_eq!(store.parent_of(a), Some(frame));
        assert_eq!(store.parent_of(b), Some(frame));
    }

    #[test]
    fn test_update_with_keeps_membership() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        store.update_with(frame, |object| {
            *object.kind_mut() = ObjectKind::Frame(crate::objects::Frame::new(4.0, 4.0));
        });
        assert_eq!(store.children_of(frame), vec![a]);
        assert_eq!(store.get(frame).unwrap().as_frame().unwrap().padding, 4.0);

        store.update_with(frame, |object| {
            *object.kind_mut() = ObjectKind::Shape(crate::objects::ShapeContent::new(ShapeKind::Ellipse));
        });
        assert_eq!(store.parent_of(a), None);
        assert_eq!(store.get(a).unwrap().parent_id(), None);
    }

    #[test]
    fn test_attach_reparents_and_rejects_cycles() {
        let mut store = ObjectStore::new();
        let outer = store.add(frame_obj());
        let inner = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));

        store.attach(outer, &[inner]);
        store.attach(inner, &[a]);
        // outer is an ancestor of inner, so it cannot become inner's child
        assert!(store.attach(inner, &[outer]).is_empty());

        store.attach(outer, &[a]);
        assert_eq!(store.parent_of(a), Some(outer));
        assert!(store.children_of(inner).is_empty());
    }

    #[test]
    fn test_frame_cascade_delete() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        let b = store.add(rect_obj(30.0, 10.0, 10.0, 10.0));
        let outside = store.add(rect_obj(900.0, 900.0, 10.0, 10.0));
        store.attach(frame, &[a, b]);

        let mut removed = store.delete(frame);
        removed.sort();
        let mut expected = vec![frame, a, b];
        expected.sort();
        assert_eq!(removed, expected);
        assert_eq!(store.len(), 1);
        assert!(store.contains(outside));
    }

    #[test]
    fn test_nested_cascade() {
        let mut store = ObjectStore::new();
        let outer = store.add(frame_obj());
        let inner = store.add(frame_obj());
        let leaf = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(outer, &[inner]);
        store.attach(inner, &[leaf]);

        assert_eq!(store.delete(outer).len(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_child_updates_frame() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        assert_eq!(store.delete(a), vec![a]);
        assert!(store.get(frame).unwrap().as_frame().unwrap().children().is_empty());
    }

    #[test]
    fn test_delete_many_unions_cascades() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        let b = store.add(rect_obj(30.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        let removed = store.delete_many(&[a, frame, b, a]);
        assert_eq!(removed.len(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_repairs_links() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        // Drop the frame from the snapshot: the child now points at nothing.
        let broken: Vec<CanvasObject> =
            store.objects().iter().filter(|o| o.id() != frame).cloned().collect();
        assert!(broken[0].parent_id().is_some());

        store.replace_all(Arc::new(broken)).unwrap();
        assert!(store.get(a).unwrap().parent_id().is_none());
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let mut store = ObjectStore::new();
        let obj = rect_obj(0.0, 0.0, 1.0, 1.0);
        let err = store
            .replace_all(Arc::new(vec![obj.clone(), obj]))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_objects_deep_clones_frames() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        let clones = store.clone_objects(&[frame, a], Vec2::new(600.0, 0.0));
        assert_eq!(clones.len(), 1);
        assert_eq!(store.len(), 4);

        let new_frame = clones[0];
        let new_children = store.children_of(new_frame);
        assert_eq!(new_children.len(), 1);
        assert_ne!(new_children[0], a);
        assert_eq!(store.parent_of(new_children[0]), Some(new_frame));
        assert_eq!(store.get(new_children[0]).unwrap().origin(), Point::new(610.0, 10.0));
        // Originals untouched
        assert_eq!(store.children_of(frame), vec![a]);
    }

    #[test]
    fn test_frames_draw_below_their_children() {
        let mut store = ObjectStore::new();
        let a = store.add(rect_obj(10.0, 10.0, 50.0, 50.0));
        let frame = store.add(frame_obj());
        store.attach(frame, &[a]);

        let ordered: Vec<ObjectId> = store.ordered().iter().map(|o| o.id()).collect();
        assert_eq!(ordered, vec![frame, a]);
        assert_eq!(store.topmost_at_point(Point::new(20.0, 20.0), 0.0), Some(a));
        assert_eq!(store.topmost_at_point(Point::new(200.0, 200.0), 0.0), Some(frame));
        assert_eq!(store.topmost_at_point(Point::new(900.0, 900.0), 0.0), None);
    }

    #[test]
    fn test_clone_batch_is_one_mutation() {
        let mut store = ObjectStore::new();
        let a = store.add(rect_obj(0.0, 0.0, 10.0, 10.0));
        let revision = store.revision();

        let offsets = [Vec2::new(20.0, 0.0), Vec2::new(40.0, 0.0), Vec2::new(60.0, 0.0)];
        let clones = store.clone_batch(&[a], &offsets);
        assert_eq!(clones.len(), 3);
        assert_eq!(store.revision(), revision + 1);
        assert_eq!(store.get(clones[2]).unwrap().origin(), Point::new(60.0, 0.0));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut store = ObjectStore::new();
        let frame = store.add(frame_obj());
        let a = store.add(rect_obj(10.0, 10.0, 10.0, 10.0));
        store.attach(frame, &[a]);

        let json = store.to_json().unwrap();
        let mut restored = ObjectStore::new();
        restored.load_json(&json).unwrap();
        assert_eq!(restored.objects(), store.objects());
        assert_eq!(restored.parent_of(a), Some(frame));
    }
}
