//! Frame grouping and auto-layout.
//!
//! Flow results are written straight into child positions and the frame's
//! size, so what is stored is always what is rendered. Turning auto-layout off
//! therefore keeps the last flow positions without a visual jump.

use crate::config::FrameConfig;
use crate::objects::{CanvasObject, Frame, FrameLayout, ObjectId};
use crate::selection::bounding_box;
use crate::store::ObjectStore;
use kurbo::{Point, Rect, Size, Vec2};

/// Computed placement for a frame's children.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    /// Top-left of each child, in children order.
    pub positions: Vec<(ObjectId, Point)>,
    /// Frame size implied by the flow.
    pub size: Size,
}

/// Lay out `children` (id and size, in order) inside a frame at `frame_rect`.
pub fn compute_flow(frame: &Frame, frame_rect: Rect, children: &[(ObjectId, Size)]) -> Flow {
    let padding = frame.padding;
    let gap = frame.gap;
    let inner = Point::new(frame_rect.x0 + padding, frame_rect.y0 + padding);
    let mut positions = Vec::with_capacity(children.len());

    if children.is_empty() {
        return Flow {
            positions,
            size: Size::new(2.0 * padding, 2.0 * padding),
        };
    }

    let size = match frame.layout {
        FrameLayout::Row => {
            let mut x = 0.0;
            let mut max_height: f64 = 0.0;
            for &(id, size) in children {
                positions.push((id, inner + Vec2::new(x, 0.0)));
                x += size.width + gap;
                max_height = max_height.max(size.height);
            }
            Size::new(x - gap + 2.0 * padding, max_height + 2.0 * padding)
        }
        FrameLayout::Column => {
            let mut y = 0.0;
            let mut max_width: f64 = 0.0;
            for &(id, size) in children {
                positions.push((id, inner + Vec2::new(0.0, y)));
                y += size.height + gap;
                max_width = max_width.max(size.width);
            }
            Size::new(max_width + 2.0 * padding, y - gap + 2.0 * padding)
        }
        FrameLayout::WrappingGrid => {
            let available = frame_rect.width() - 2.0 * padding;
            let mut cursor_x: f64 = 0.0;
            let mut row_y: f64 = 0.0;
            let mut row_height: f64 = 0.0;
            let mut max_row_width: f64 = 0.0;
            for &(id, size) in children {
                if cursor_x > 0.0 && cursor_x + size.width > available {
                    row_y += row_height + gap;
                    cursor_x = 0.0;
                    row_height = 0.0;
                }
                positions.push((id, inner + Vec2::new(cursor_x, row_y)));
                max_row_width = max_row_width.max(cursor_x + size.width);
                cursor_x += size.width + gap;
                row_height = row_height.max(size.height);
            }
            Size::new(max_row_width + 2.0 * padding, row_y + row_height + 2.0 * padding)
        }
    };
    Flow { positions, size }
}

fn flow_for(store: &ObjectStore, frame_id: ObjectId) -> Option<Flow> {
    let object = store.get(frame_id)?;
    let frame = object.as_frame()?;
    let children: Vec<(ObjectId, Size)> = store
        .children_of(frame_id)
        .into_iter()
        .filter_map(|id| rendered_size(store, id).map(|size| (id, size)))
        .collect();
    Some(compute_flow(frame, object.bounds(), &children))
}

/// The size an object is drawn at: the flow size for auto-layout frames.
pub fn rendered_size(store: &ObjectStore, id: ObjectId) -> Option<Size> {
    let object = store.get(id)?;
    match object.as_frame() {
        Some(frame) if frame.auto_layout() => flow_for(store, id).map(|flow| flow.size),
        _ => Some(object.size()),
    }
}

/// Re-apply the flow of an auto-layout frame, then of each auto-layout ancestor.
///
/// Children that are frames carry their own descendants along. Returns false if
/// `frame_id` is not an auto-layout frame.
pub fn relayout(store: &mut ObjectStore, frame_id: ObjectId) -> bool {
    let mut current = Some(frame_id);
    let mut applied = false;
    let mut hops = 0;
    while let Some(id) = current {
        if hops > store.len() {
            break;
        }
        hops += 1;
        let is_auto = store
            .get(id)
            .and_then(CanvasObject::as_frame)
            .is_some_and(Frame::auto_layout);
        if !is_auto {
            break;
        }
        apply_flow(store, id);
        applied = true;
        current = store.parent_of(id);
    }
    applied
}

fn apply_flow(store: &mut ObjectStore, frame_id: ObjectId) {
    let Some(flow) = flow_for(store, frame_id) else {
        return;
    };
    for (child, position) in flow.positions {
        let Some(origin) = store.get(child).map(CanvasObject::origin) else {
            continue;
        };
        let delta = position - origin;
        if delta != Vec2::ZERO {
            let mut moving = vec![child];
            moving.extend(store.descendants(child));
            store.translate_many(&moving, delta);
        }
    }
    let current = store.get(frame_id).map(CanvasObject::size);
    if current != Some(flow.size) {
        store.update_with(frame_id, |object| {
            object.width = flow.size.width;
            object.height = flow.size.height;
        });
    }
}

/// Re-flow the auto-layout frames that contain any of `ids`.
pub fn relayout_parents(store: &mut ObjectStore, ids: &[ObjectId]) {
    let mut parents: Vec<ObjectId> = Vec::new();
    for &id in ids {
        if let Some(parent) = store.parent_of(id) {
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
    }
    for parent in parents {
        relayout(store, parent);
    }
}

/// Wrap the given objects in a new frame sized to their bounds plus `group_padding`.
pub fn group_into_frame(store: &mut ObjectStore, ids: &[ObjectId], config: &FrameConfig) -> Option<ObjectId> {
    // Members nested under another member stay where they are.
    let members: Vec<ObjectId> = ids
        .iter()
        .copied()
        .filter(|&id| store.contains(id))
        .filter(|&id| !ids.iter().any(|&other| other != id && store.is_descendant_of(id, other)))
        .collect();
    if members.is_empty() {
        return None;
    }
    let bounds = bounding_box(members.iter().filter_map(|&id| store.get(id)).map(CanvasObject::bounds));
    let rect = bounds.inflate(config.group_padding, config.group_padding);
    let old_parents: Vec<ObjectId> = members.iter().filter_map(|&id| store.parent_of(id)).collect();

    let frame_id = store.add(CanvasObject::frame(rect, config.padding, config.gap));
    store.attach(frame_id, &members);
    for parent in old_parents {
        relayout(store, parent);
    }
    log::info!("Grouped {} object(s) into frame {frame_id}", members.len());
    Some(frame_id)
}

/// Create a frame from a drawn rectangle, adopting every non-frame object whose
/// centre lies inside it. Rectangles smaller than `min_size` are ignored.
pub fn frame_from_drawn_rect(
    store: &mut ObjectStore,
    rect: Rect,
    config: &FrameConfig,
    min_size: f64,
) -> Option<ObjectId> {
    let rect = rect.abs();
    if rect.width() < min_size || rect.height() < min_size {
        log::debug!("Frame draw too small, ignoring");
        return None;
    }
    let members: Vec<ObjectId> = store
        .ordered()
        .into_iter()
        .filter(|o| !o.is_frame() && rect.contains(o.center()))
        .map(CanvasObject::id)
        .collect();
    let old_parents: Vec<ObjectId> = members.iter().filter_map(|&id| store.parent_of(id)).collect();

    let frame_id = store.add(CanvasObject::frame(rect, config.padding, config.gap));
    store.attach(frame_id, &members);
    for parent in old_parents {
        relayout(store, parent);
    }
    log::info!("Drew frame {frame_id} around {} object(s)", members.len());
    Some(frame_id)
}

/// Turn auto-layout on or off.
///
/// Turning it off re-applies the flow once so children keep their last flow
/// positions as explicit coordinates.
pub fn set_auto_layout(store: &mut ObjectStore, frame_id: ObjectId, enabled: bool) -> bool {
    if enabled {
        if !store.set_auto_layout_flag(frame_id, true) {
            return false;
        }
        relayout(store, frame_id);
    } else {
        relayout(store, frame_id);
        if !store.set_auto_layout_flag(frame_id, false) {
            return false;
        }
    }
    true
}

/// Flip auto-layout. Returns the new state, or `None` if `frame_id` is not a frame.
pub fn toggle_auto_layout(store: &mut ObjectStore, frame_id: ObjectId) -> Option<bool> {
    let enabled = !store.get(frame_id)?.as_frame()?.auto_layout();
    set_auto_layout(store, frame_id, enabled).then_some(enabled)
}

/// Change the flow algorithm and re-flow.
pub fn set_layout(store: &mut ObjectStore, frame_id: ObjectId, layout: FrameLayout) -> bool {
    if !store.get(frame_id).is_some_and(CanvasObject::is_frame) {
        return false;
    }
    store.update_with(frame_id, |object| {
        if let Some(frame) = object.as_frame_mut() {
            frame.layout = layout;
        }
    });
    relayout(store, frame_id);
    true
}

/// Refit a frame to its children: re-flow if auto-layout, otherwise wrap the
/// children's bounds plus the frame's padding. Empty frames are left alone.
pub fn reframe(store: &mut ObjectStore, frame_id: ObjectId) -> bool {
    let Some(frame) = store.get(frame_id).and_then(CanvasObject::as_frame) else {
        return false;
    };
    if frame.auto_layout() {
        return relayout(store, frame_id);
    }
    let padding = frame.padding;
    let children = store.children_of(frame_id);
    if children.is_empty() {
        return false;
    }
    let bounds = bounding_box(children.iter().filter_map(|&id| store.get(id)).map(CanvasObject::bounds));
    let rect = bounds.inflate(padding, padding);
    store.update_with(frame_id, |object| object.set_bounds(rect));
    if let Some(parent) = store.parent_of(frame_id) {
        relayout(store, parent);
    }
    true
}

/// Remove a frame but keep its children where they are drawn.
///
/// Returns the former children, or `None` if `frame_id` is not a frame.
pub fn unframe(store: &mut ObjectStore, frame_id: ObjectId) -> Option<Vec<ObjectId>> {
    if !store.get(frame_id).is_some_and(CanvasObject::is_frame) {
        return None;
    }
    relayout(store, frame_id);
    let parent = store.parent_of(frame_id);
    let children = store.detach_all(frame_id);
    store.delete(frame_id);
    if let Some(parent) = parent {
        relayout(store, parent);
    }
    log::info!("Unframed {} object(s)", children.len());
    Some(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ShapeKind;

    fn shape(store: &mut ObjectStore, x: f64, y: f64, w: f64, h: f64) -> ObjectId {
        store.add(CanvasObject::shape(Rect::new(x, y, x + w, y + h), ShapeKind::Rectangle))
    }

    fn frame_with(store: &mut ObjectStore, layout: FrameLayout, widths: &[f64]) -> (ObjectId, Vec<ObjectId>) {
        let mut frame = CanvasObject::frame(Rect::new(0.0, 0.0, 500.0, 500.0), 10.0, 10.0);
        if let Some(f) = frame.as_frame_mut() {
            f.layout = layout;
        }
        let frame_id = store.add(frame);
        let children: Vec<ObjectId> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| shape(store, 300.0 + i as f64 * 7.0, 40.0 * i as f64, w, 40.0))
            .collect();
        store.attach(frame_id, &children);
        (frame_id, children)
    }

    fn child_positions(store: &ObjectStore, ids: &[ObjectId]) -> Vec<Point> {
        ids.iter().map(|&id| store.get(id).unwrap().origin()).collect()
    }

    #[test]
    fn test_row_layout_sizing() {
        let mut store = ObjectStore::new();
        let (frame, children) = frame_with(&mut store, FrameLayout::Row, &[50.0, 70.0, 30.0]);
        assert!(set_auto_layout(&mut store, frame, true));

        assert_eq!(store.get(frame).unwrap().size(), Size::new(190.0, 60.0));
        assert_eq!(
            child_positions(&store, &children),
            vec![Point::new(10.0, 10.0), Point::new(70.0, 10.0), Point::new(150.0, 10.0)]
        );
        assert_eq!(rendered_size(&store, frame), Some(Size::new(190.0, 60.0)));
    }

    #[test]
    fn test_column_layout() {
        let mut store = ObjectStore::new();
        let (frame, children) = frame_with(&mut store, FrameLayout::Column, &[50.0, 70.0]);
        set_auto_layout(&mut store, frame, true);

        assert_eq!(store.get(frame).unwrap().size(), Size::new(90.0, 110.0));
        assert_eq!(
            child_positions(&store, &children),
            vec![Point::new(10.0, 10.0), Point::new(10.0, 60.0)]
        );
    }

    #[test]
    fn test_wrapping_grid_wraps_at_inner_width() {
        let frame = Frame {
            layout: FrameLayout::WrappingGrid,
            ..Frame::new(10.0, 10.0)
        };
        let ids: Vec<ObjectId> = (0..3).map(|_| uuid::Uuid::new_v4()).collect();
        let children: Vec<(ObjectId, Size)> = vec![
            (ids[0], Size::new(100.0, 40.0)),
            (ids[1], Size::new(100.0, 60.0)),
            (ids[2], Size::new(100.0, 20.0)),
        ];
        // Inner width 220 fits two 100-wide children plus one gap.
        let flow = compute_flow(&frame, Rect::new(0.0, 0.0, 240.0, 10.0), &children);
        assert_eq!(flow.positions[1].1, Point::new(120.0, 10.0));
        assert_eq!(flow.positions[2].1, Point::new(10.0, 80.0));
        assert_eq!(flow.size, Size::new(230.0, 110.0));

        // Re-running with the computed width yields the same flow.
        let again = compute_flow(&frame, Rect::from_origin_size(Point::ZERO, flow.size), &children);
        assert_eq!(again, flow);
    }

    #[test]
    fn test_empty_frame_flow() {
        let flow = compute_flow(&Frame::new(12.0, 5.0), Rect::new(0.0, 0.0, 100.0, 100.0), &[]);
        assert!(flow.positions.is_empty());
        assert_eq!(flow.size, Size::new(24.0, 24.0));
    }

    #[test]
    fn test_auto_layout_idempotence() {
        for layout in [FrameLayout::Row, FrameLayout::Column, FrameLayout::WrappingGrid] {
            let mut store = ObjectStore::new();
            let (frame, children) = frame_with(&mut store, layout, &[120.0, 200.0, 90.0, 300.0]);

            set_auto_layout(&mut store, frame, true);
            let first = (child_positions(&store, &children), store.get(frame).unwrap().size());
            set_auto_layout(&mut store, frame, true);
            let second = (child_positions(&store, &children), store.get(frame).unwrap().size());
            assert_eq!(first, second, "{layout:?}");
        }
    }

    #[test]
    fn test_auto_layout_off_bakes_positions() {
        let mut store = ObjectStore::new();
        let (frame, children) = frame_with(&mut store, FrameLayout::Row, &[50.0, 70.0]);
        set_auto_layout(&mut store, frame, true);
        let flowed = child_positions(&store, &children);

        assert_eq!(toggle_auto_layout(&mut store, frame), Some(false));
        assert_eq!(child_positions(&store, &children), flowed);
        assert!(!store.get(frame).unwrap().as_frame().unwrap().auto_layout());
    }

    #[test]
    fn test_group_into_frame() {
        let mut store = ObjectStore::new();
        let a = shape(&mut store, 0.0, 0.0, 50.0, 50.0);
        let b = shape(&mut store, 100.0, 100.0, 50.0, 50.0);
        let config = FrameConfig::default();

        let frame = group_into_frame(&mut store, &[a, b], &config).unwrap();
        assert_eq!(store.get(frame).unwrap().bounds(), Rect::new(-20.0, -20.0, 170.0, 170.0));
        assert_eq!(store.children_of(frame), vec![a, b]);
        assert_eq!(store.parent_of(b), Some(frame));
    }

    #[test]
    fn test_frame_from_drawn_rect_uses_centres() {
        let mut store = ObjectStore::new();
        let inside = shape(&mut store, 10.0, 10.0, 20.0, 20.0);
        let straddling = shape(&mut store, 90.0, 10.0, 40.0, 20.0);
        let outside = shape(&mut store, 300.0, 300.0, 20.0, 20.0);

        let frame = frame_from_drawn_rect(
            &mut store,
            Rect::new(100.0, 100.0, 0.0, 0.0),
            &FrameConfig::default(),
            20.0,
        )
        .unwrap();
        assert_eq!(store.children_of(frame), vec![inside]);
        assert!(store.parent_of(straddling).is_none());
        assert!(store.parent_of(outside).is_none());

        assert!(frame_from_drawn_rect(&mut store, Rect::new(0.0, 0.0, 5.0, 5.0), &FrameConfig::default(), 20.0).is_none());
    }

    #[test]
    fn test_unframe_keeps_children() {
        let mut store = ObjectStore::new();
        let (frame, children) = frame_with(&mut store, FrameLayout::Row, &[50.0, 70.0]);
        set_auto_layout(&mut store, frame, true);
        let flowed = child_positions(&store, &children);

        assert_eq!(unframe(&mut store, frame), Some(children.clone()));
        assert!(!store.contains(frame));
        assert_eq!(child_positions(&store, &children), flowed);
        assert!(children.iter().all(|&c| store.parent_of(c).is_none()));
    }

    #[test]
    fn test_reframe_fits_children() {
        let mut store = ObjectStore::new();
        let (frame, children) = frame_with(&mut store, FrameLayout::Row, &[50.0]);
        store.update(children[0], &crate::objects::ObjectPatch::default().position(Point::new(100.0, 100.0)));

        assert!(reframe(&mut store, frame));
        assert_eq!(store.get(frame).unwrap().bounds(), Rect::new(90.0, 90.0, 160.0, 150.0));
    }

    #[test]
    fn test_nested_frames_move_with_flow() {
        let mut store = ObjectStore::new();
        let (outer, _) = frame_with(&mut store, FrameLayout::Row, &[]);
        let inner = store.add(CanvasObject::frame(Rect::new(200.0, 200.0, 300.0, 300.0), 10.0, 10.0));
        let leaf = shape(&mut store, 210.0, 210.0, 20.0, 20.0);
        store.attach(inner, &[leaf]);
        store.attach(outer, &[inner]);

        set_auto_layout(&mut store, outer, true);
        assert_eq!(store.get(inner).unwrap().origin(), Point::new(10.0, 10.0));
        assert_eq!(store.get(leaf).unwrap().origin(), Point::new(20.0, 20.0));
        assert_eq!(store.get(outer).unwrap().size(), Size::new(120.0, 120.0));
    }
}
