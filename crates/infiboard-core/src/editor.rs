//! Editor: the single entry point for pointer, keyboard and UI callbacks.
//!
//! The editor owns the store, camera, selection, toolbar and history, converts
//! screen coordinates to canvas coordinates, and routes each event to the one
//! active [`Gesture`]. Every committed mutation records a snapshot in history.
//!
//! Timers are measured against the clock passed to [`Editor::tick`], so hosts
//! should tick once per display frame.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::generation::GenerationTracker;
use crate::gesture::Gesture;
use crate::grid::{self, GridPlan};
use crate::handles::{self, Handle, HandleKind};
use crate::history::History;
use crate::input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
use crate::layout;
use crate::manipulation::{self, ResizeState};
use crate::objects::{CanvasObject, FrameLayout, ObjectId, ObjectKind, ObjectPatch};
use crate::selection::Selection;
use crate::error::StoreResult;
use crate::store::{ObjectStore, Snapshot};
use crate::toolbar::{Instant, ToolbarMachine};
use kurbo::{Point, Rect, Size, Vec2};

/// Offset of a copy made with the duplicate action, in canvas units.
pub const DUPLICATE_OFFSET: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    store: ObjectStore,
    camera: Camera,
    selection: Selection,
    gesture: Gesture,
    toolbar: ToolbarMachine,
    history: History,
    generation: GenerationTracker,
    input: InputState,
    frame_draw_mode: bool,
    viewport: Size,
    hovered: Option<ObjectId>,
    clock: Instant,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, ObjectStore::new())
    }

    /// Start editing an existing store. Its current state is the history base.
    pub fn with_store(config: EditorConfig, store: ObjectStore) -> Self {
        Self {
            camera: Camera::from_config(&config.zoom),
            toolbar: ToolbarMachine::new(&config.toolbar),
            history: History::new(store.snapshot()),
            generation: GenerationTracker::default(),
            selection: Selection::new(),
            gesture: Gesture::Idle,
            input: InputState::new(),
            frame_draw_mode: false,
            viewport: Size::new(800.0, 600.0),
            hovered: None,
            clock: Instant::now(),
            config,
            store,
        }
    }

    // --- Views for the rendering layer ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn toolbar(&self) -> &ToolbarMachine {
        &self.toolbar
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Object whose toolbar should be shown.
    pub fn toolbar_target(&self) -> Option<ObjectId> {
        self.toolbar.target()
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    pub fn is_frame_draw_mode(&self) -> bool {
        self.frame_draw_mode
    }

    pub fn is_selecting(&self) -> bool {
        self.gesture.is_selecting()
    }

    pub fn is_dragging_object(&self) -> bool {
        self.gesture.is_dragging_object()
    }

    pub fn is_resizing(&self) -> bool {
        self.gesture.is_resizing()
    }

    pub fn is_dragging_handle(&self) -> bool {
        self.gesture.is_dragging_handle()
    }

    pub fn is_panning(&self) -> bool {
        self.gesture.is_panning()
    }

    pub fn is_drawing_frame(&self) -> bool {
        self.gesture.is_drawing_frame()
    }

    /// Objects in draw order.
    pub fn ordered_objects(&self) -> Vec<&CanvasObject> {
        self.store.ordered()
    }

    /// Canvas area covered by the viewport.
    pub fn visible_rect(&self) -> Rect {
        self.camera.visible_rect(self.viewport)
    }

    /// Objects in draw order that overlap the viewport.
    pub fn visible_objects(&self) -> Vec<&CanvasObject> {
        let visible = self.visible_rect();
        self.store
            .ordered()
            .into_iter()
            .filter(|o| crate::selection::intersects_box(o.bounds(), visible))
            .collect()
    }

    /// Size an object is actually drawn at.
    pub fn rendered_size(&self, id: ObjectId) -> Option<Size> {
        layout::rendered_size(&self.store, id)
    }

    pub fn selection_bounds(&self) -> Rect {
        self.selection.bounds(&self.store)
    }

    /// Live box-selection rectangle, in canvas coordinates.
    pub fn box_rect(&self) -> Option<Rect> {
        self.selection.box_selection().map(|b| b.rect())
    }

    /// Frame being drawn, in canvas coordinates.
    pub fn frame_draw_rect(&self) -> Option<Rect> {
        self.gesture.frame_rect()
    }

    /// Cells of the grid being dragged out, origin cell included.
    pub fn grid_preview(&self) -> Vec<Rect> {
        match &self.gesture {
            Gesture::DraggingGridHandle { plan, .. } => plan.cell_rects(),
            _ => Vec::new(),
        }
    }

    /// Resize handles, shown only for a single selected object.
    pub fn resize_handles(&self) -> Vec<Handle> {
        self.selection
            .single()
            .and_then(|id| self.store.get(id))
            .map(|o| handles::resize_handles(o.bounds()))
            .unwrap_or_default()
    }

    /// Grid-duplicate handle position, shown whenever something is selected.
    pub fn grid_handle(&self) -> Option<Point> {
        if self.selection.is_empty() {
            return None;
        }
        let offset = self.config.grid_handle_offset / self.camera.zoom;
        Some(handles::grid_handle_position(self.selection_bounds(), offset))
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn hit_tolerance(&self) -> f64 {
        self.config.handle_hit_tolerance / self.camera.zoom
    }

    // --- Commit and bookkeeping ---

    /// Record the current state after a mutation.
    fn commit(&mut self) {
        self.selection.retain_existing(&self.store);
        if self.hovered.is_some_and(|id| !self.store.contains(id)) {
            self.hovered = None;
        }
        self.history.record(self.store.snapshot());
    }

    fn sync_toolbar(&mut self) {
        match self.selection.single() {
            Some(id) => self.toolbar.on_select(id),
            None => self.toolbar.on_selection_cleared(self.clock),
        }
    }

    fn forget_removed(&mut self, removed: &[ObjectId]) {
        for &id in removed {
            self.selection.remove(id);
            self.toolbar.forget(id, self.clock);
        }
    }

    /// Advance timers and generation progress. Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.clock = now;
        let store = &self.store;
        let toolbar_changed = self.toolbar.tick(now, |id| store.contains(id));
        let progressed = self.generation.advance(&mut self.store, now);
        toolbar_changed || !progressed.is_empty()
    }

    // --- Object creation and editing ---

    /// Add an object and commit.
    pub fn add_object(&mut self, object: CanvasObject) -> ObjectId {
        let id = self.store.add(object);
        self.commit();
        id
    }

    pub fn add_objects(&mut self, objects: Vec<CanvasObject>) -> Vec<ObjectId> {
        let ids = self.store.add_many(objects);
        self.commit();
        ids
    }

    /// Patch an object and commit. Auto-layout parents re-flow on geometry changes.
    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> bool {
        if !self.store.update(id, patch) {
            return false;
        }
        if patch.touches_geometry() {
            layout::relayout(&mut self.store, id);
            layout::relayout_parents(&mut self.store, &[id]);
        }
        self.commit();
        true
    }

    /// Edit an object's payload and commit.
    pub fn update_object_with(&mut self, id: ObjectId, f: impl FnOnce(&mut CanvasObject)) -> bool {
        if !self.store.update_with(id, f) {
            return false;
        }
        self.commit();
        true
    }

    // --- Rendering-layer callbacks ---

    /// Click on an object.
    pub fn select(&mut self, id: ObjectId, multi: bool) {
        if !self.store.contains(id) {
            return;
        }
        self.selection.click(id, multi);
        self.sync_toolbar();
    }

    /// Click on empty canvas.
    pub fn click_empty(&mut self) {
        if self.selection.click_empty() {
            self.sync_toolbar();
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.store);
        self.sync_toolbar();
    }

    /// Start dragging `id`, cloning the drag set first if `duplicate` is held.
    pub fn drag_start(&mut self, id: ObjectId, duplicate: bool) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(drag) = manipulation::begin_drag(&mut self.store, &mut self.selection, id, duplicate) else {
            return false;
        };
        log::debug!("Drag start: {} object(s), duplicate {duplicate}", drag.ids.len());
        self.gesture = Gesture::DraggingObjects(drag);
        true
    }

    /// Move the drag set by a screen-space delta.
    pub fn drag(&mut self, screen_dx: f64, screen_dy: f64) {
        if let Gesture::DraggingObjects(drag) = &mut self.gesture {
            manipulation::update_drag(&mut self.store, drag, Vec2::new(screen_dx, screen_dy), self.camera.zoom);
        }
    }

    pub fn drag_end(&mut self) {
        let Gesture::DraggingObjects(drag) = std::mem::take(&mut self.gesture) else {
            return;
        };
        layout::relayout_parents(&mut self.store, &drag.ids);
        if drag.is_duplicate || drag.total != Vec2::ZERO {
            self.commit();
        }
        if let Some(id) = self.selection.single() {
            self.toolbar.on_select(id);
        }
    }

    /// Start resizing the single selected object from `handle`.
    pub fn resize_start(&mut self, handle: HandleKind, screen_point: Point) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(target) = self.selection.single() else {
            return false;
        };
        let start = self.camera.screen_to_canvas(screen_point);
        let Some(state) = ResizeState::new(&self.store, target, handle, start) else {
            return false;
        };
        log::debug!("Resize start: {target} via {handle:?}");
        self.gesture = Gesture::Resizing(state);
        true
    }

    /// Update the resize with the pointer at `screen_point`.
    pub fn resize(&mut self, screen_point: Point, proportional: bool) {
        let current = self.camera.screen_to_canvas(screen_point);
        if let Gesture::Resizing(state) = &self.gesture {
            state.apply(&mut self.store, current, proportional, self.config.min_object_size);
        }
    }

    pub fn resize_end(&mut self) {
        let Gesture::Resizing(state) = std::mem::take(&mut self.gesture) else {
            return;
        };
        layout::relayout(&mut self.store, state.target);
        layout::relayout_parents(&mut self.store, &[state.target]);
        self.commit();
    }

    /// Start dragging the grid-duplicate handle of the current selection.
    pub fn duplicate_handle_start(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        self.selection.retain_existing(&self.store);
        if self.selection.is_empty() {
            return false;
        }
        let bounds = self.selection_bounds();
        let plan = GridPlan::compute(bounds, bounds.origin(), &self.config.grid);
        self.gesture = Gesture::DraggingGridHandle {
            ids: self.selection.ids().to_vec(),
            bounds,
            plan,
        };
        true
    }

    /// Update the grid with the handle at `screen_point`.
    pub fn duplicate_handle_drag(&mut self, screen_point: Point) {
        let target = self.camera.screen_to_canvas(screen_point);
        if let Gesture::DraggingGridHandle { bounds, plan, .. } = &mut self.gesture {
            *plan = GridPlan::compute(*bounds, target, &self.config.grid);
        }
    }

    /// Release the grid handle, stamping copies if the grid has more than one cell.
    pub fn duplicate_handle_end(&mut self) -> Vec<ObjectId> {
        let Gesture::DraggingGridHandle { ids, plan, .. } = std::mem::take(&mut self.gesture) else {
            return Vec::new();
        };
        let clones = grid::materialize(&mut self.store, &ids, &plan);
        if !clones.is_empty() {
            self.commit();
        }
        clones
    }

    /// Cycle the colour tag of an object.
    pub fn color_tag_change(&mut self, id: ObjectId) -> bool {
        let Some(tag) = self.store.get(id).map(|o| o.color_tag.next()) else {
            return false;
        };
        self.update_object(id, &ObjectPatch::default().color_tag(tag))
    }

    /// Delete an object, cascading through frames.
    pub fn delete(&mut self, id: ObjectId) -> Vec<ObjectId> {
        self.delete_ids(&[id])
    }

    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let ids = self.selection.ids().to_vec();
        self.delete_ids(&ids)
    }

    fn delete_ids(&mut self, ids: &[ObjectId]) -> Vec<ObjectId> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let parents: Vec<ObjectId> = ids.iter().filter_map(|&id| self.store.parent_of(id)).collect();
        let removed = self.store.delete_many(ids);
        if removed.is_empty() {
            return removed;
        }
        for parent in parents {
            layout::relayout(&mut self.store, parent);
        }
        self.forget_removed(&removed);
        self.commit();
        self.sync_toolbar();
        removed
    }

    /// Copy an object (and its descendants) next to the original and select the copy.
    pub fn duplicate(&mut self, id: ObjectId) -> Option<ObjectId> {
        let clone = self
            .store
            .clone_objects(&[id], Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
            .first()
            .copied()?;
        self.selection.set([clone]);
        self.commit();
        self.sync_toolbar();
        Some(clone)
    }

    /// Flip a frame's auto-layout. Returns the new state.
    pub fn toggle_auto_layout(&mut self, id: ObjectId) -> Option<bool> {
        let enabled = layout::toggle_auto_layout(&mut self.store, id)?;
        self.commit();
        Some(enabled)
    }

    pub fn set_frame_layout(&mut self, id: ObjectId, frame_layout: FrameLayout) -> bool {
        if !layout::set_layout(&mut self.store, id, frame_layout) {
            return false;
        }
        self.commit();
        true
    }

    /// Switch a frame to the next flow algorithm. Returns the new layout.
    pub fn cycle_frame_layout(&mut self, id: ObjectId) -> Option<FrameLayout> {
        let next = self.store.get(id)?.as_frame()?.layout.next();
        self.set_frame_layout(id, next).then_some(next)
    }

    pub fn reframe(&mut self, id: ObjectId) -> bool {
        if !layout::reframe(&mut self.store, id) {
            return false;
        }
        self.commit();
        true
    }

    /// Remove a frame, keeping its children, and select them.
    pub fn unframe(&mut self, id: ObjectId) -> Option<Vec<ObjectId>> {
        let children = layout::unframe(&mut self.store, id)?;
        self.forget_removed(&[id]);
        self.selection.set(children.iter().copied());
        self.commit();
        self.sync_toolbar();
        Some(children)
    }

    /// Wrap the selection in a new frame.
    pub fn group_selected(&mut self) -> Option<ObjectId> {
        self.selection.retain_existing(&self.store);
        let frame = layout::group_into_frame(&mut self.store, self.selection.ids(), &self.config.frame)?;
        self.selection.set([frame]);
        self.commit();
        self.sync_toolbar();
        Some(frame)
    }

    pub fn toggle_frame_draw_mode(&mut self) {
        self.frame_draw_mode = !self.frame_draw_mode;
        if self.gesture.is_drawing_frame() {
            self.gesture = Gesture::Idle;
        }
        log::debug!("Frame draw mode: {}", self.frame_draw_mode);
    }

    // --- History ---

    /// Replace the whole document from a JSON snapshot and start a fresh history.
    ///
    /// On error the current document is kept.
    pub fn load_json(&mut self, json: &str) -> StoreResult<()> {
        let mut store = ObjectStore::new();
        store.load_json(json)?;
        self.store = store;
        self.gesture = Gesture::Idle;
        self.selection.clear();
        self.hovered = None;
        self.generation = GenerationTracker::default();
        self.sync_toolbar();
        self.history.reset(self.store.snapshot());
        log::info!("Loaded document with {} object(s)", self.store.len());
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) -> bool {
        if let Err(e) = self.store.replace_all(snapshot) {
            log::warn!("Failed to restore snapshot: {e}");
            return false;
        }
        self.selection.retain_existing(&self.store);
        self.hovered = self.hovered.filter(|&id| self.store.contains(id));
        self.sync_toolbar();
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        match self.history.undo() {
            Some(snapshot) => self.restore(snapshot),
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => self.restore(snapshot),
            None => false,
        }
    }

    // --- Generation ---

    pub fn begin_generation(&mut self, id: ObjectId) -> bool {
        if !self.generation.begin(&mut self.store, id, self.clock) {
            return false;
        }
        self.commit();
        true
    }

    pub fn complete_generation(&mut self, id: ObjectId, result: Option<ObjectKind>) -> bool {
        if !self.generation.complete(&mut self.store, id, result) {
            return false;
        }
        self.commit();
        true
    }

    pub fn fail_generation(&mut self, id: ObjectId) -> bool {
        if !self.generation.fail(&mut self.store, id) {
            return false;
        }
        self.commit();
        true
    }

    // --- Zoom ---

    pub fn zoom_in(&mut self) -> bool {
        let center = self.viewport_center();
        self.camera.zoom_in(center)
    }

    pub fn zoom_out(&mut self) -> bool {
        let center = self.viewport_center();
        self.camera.zoom_out(center)
    }

    pub fn reset_zoom(&mut self) {
        self.camera.reset();
    }

    /// Fit all objects into the viewport.
    pub fn zoom_to_fit(&mut self) {
        match self.store.bounds() {
            Some(bounds) => self.camera.fit_to_bounds(bounds, self.viewport, 50.0),
            None => self.camera.reset(),
        }
    }

    // --- Raw input ---

    /// Route a pointer event. Returns true if a redraw is needed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, modifiers: Modifiers) -> bool {
        self.input.set_modifiers(modifiers);
        self.input.handle_pointer_event(&event);
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::Wheel { position, delta } => self.wheel(position, delta),
        }
    }

    fn pointer_down(&mut self, screen: Point, button: MouseButton) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        self.selection.reset_click_guard();
        if button != MouseButton::Left {
            self.gesture = Gesture::Panning;
            return false;
        }
        let canvas = self.camera.screen_to_canvas(screen);
        let modifiers = self.input.modifiers;

        if self.frame_draw_mode {
            self.gesture = Gesture::DrawingFrame { start: canvas, current: canvas };
            return true;
        }

        let tolerance = self.hit_tolerance();
        if let Some(handle) = self.grid_handle() {
            if (canvas - handle).hypot2() <= tolerance * tolerance {
                return self.duplicate_handle_start();
            }
        }
        if let Some(bounds) = self.selection.single().and_then(|id| self.store.get(id)).map(CanvasObject::bounds) {
            // Inside the body, handles shrink with the object so small objects stay draggable.
            let tolerance = if bounds.contains(canvas) {
                tolerance.min(bounds.width().min(bounds.height()) / 4.0)
            } else {
                tolerance
            };
            if let Some(handle) = handles::hit_test_handles(bounds, canvas, tolerance) {
                return self.resize_start(handle, screen);
            }
        }

        match self.store.topmost_at_point(canvas, 0.0) {
            Some(id) if modifiers.multi_select() => {
                self.select(id, true);
                true
            }
            Some(id) => {
                self.drag_start(id, modifiers.alt);
                self.sync_toolbar();
                true
            }
            None => {
                self.selection.begin_box(canvas);
                self.gesture = Gesture::BoxSelecting;
                true
            }
        }
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        let delta = self.input.pointer_delta();
        let canvas = self.camera.screen_to_canvas(screen);
        if let Gesture::DrawingFrame { current, .. } = &mut self.gesture {
            *current = canvas;
            return true;
        }
        match self.gesture {
            Gesture::Idle => self.update_hover(canvas),
            Gesture::Panning => {
                self.camera.pan(delta);
                true
            }
            Gesture::BoxSelecting => {
                self.selection.update_box(canvas, &self.store);
                true
            }
            Gesture::DraggingObjects(_) => {
                self.drag(delta.x, delta.y);
                true
            }
            Gesture::Resizing(_) => {
                self.resize(screen, self.input.modifiers.shift);
                true
            }
            Gesture::DraggingGridHandle { .. } => {
                self.duplicate_handle_drag(screen);
                true
            }
            Gesture::DrawingFrame { .. } => false,
        }
    }

    fn update_hover(&mut self, canvas: Point) -> bool {
        let hit = self.store.topmost_at_point(canvas, 0.0);
        if hit == self.hovered {
            return false;
        }
        if let Some(old) = self.hovered {
            self.toolbar.on_hover_leave(old, self.selection.contains(old), self.clock);
        }
        if let Some(new) = hit {
            self.toolbar.on_hover_enter(new, self.selection.contains(new), self.clock);
        }
        self.hovered = hit;
        true
    }

    fn pointer_up(&mut self, screen: Point) -> bool {
        let gesture_name = self.gesture.name();
        let redraw = match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning => {
                self.gesture = Gesture::Idle;
                false
            }
            Gesture::BoxSelecting => {
                let canvas = self.camera.screen_to_canvas(screen);
                // A line-shaped box still selects what it crosses.
                let moved = self
                    .selection
                    .box_selection()
                    .is_some_and(|b| b.start != b.current || b.start != canvas);
                self.gesture = Gesture::Idle;
                if moved {
                    self.selection.update_box(canvas, &self.store);
                    self.selection.end_box();
                } else {
                    self.selection.cancel_box();
                    self.selection.click_empty();
                }
                self.sync_toolbar();
                true
            }
            Gesture::DraggingObjects(_) => {
                self.drag_end();
                true
            }
            Gesture::Resizing(_) => {
                self.resize(screen, self.input.modifiers.shift);
                self.resize_end();
                true
            }
            Gesture::DraggingGridHandle { .. } => {
                self.duplicate_handle_drag(screen);
                self.duplicate_handle_end();
                true
            }
            Gesture::DrawingFrame { .. } => {
                self.finish_frame_draw();
                true
            }
        };
        if redraw {
            log::debug!("Gesture finished: {gesture_name}");
        }
        redraw
    }

    fn finish_frame_draw(&mut self) {
        let Gesture::DrawingFrame { start, current } = std::mem::take(&mut self.gesture) else {
            return;
        };
        let rect = Rect::from_points(start, current);
        if let Some(frame) =
            layout::frame_from_drawn_rect(&mut self.store, rect, &self.config.frame, self.config.min_object_size)
        {
            self.selection.set([frame]);
            self.commit();
            self.sync_toolbar();
        }
    }

    /// End the active gesture. Moves and resizes already applied are kept;
    /// pending grid copies and frame rectangles are discarded.
    pub fn cancel_gesture(&mut self) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning | Gesture::DraggingGridHandle { .. } | Gesture::DrawingFrame { .. } => {
                self.gesture = Gesture::Idle;
                true
            }
            Gesture::BoxSelecting => {
                self.gesture = Gesture::Idle;
                self.selection.end_box();
                self.sync_toolbar();
                true
            }
            Gesture::DraggingObjects(_) => {
                self.drag_end();
                true
            }
            Gesture::Resizing(_) => {
                self.resize_end();
                true
            }
        }
    }

    fn pointer_leave(&mut self) -> bool {
        if let Some(old) = self.hovered.take() {
            self.toolbar.on_hover_leave(old, self.selection.contains(old), self.clock);
        }
        self.cancel_gesture()
    }

    fn wheel(&mut self, screen: Point, delta: Vec2) -> bool {
        if delta.y == 0.0 {
            return false;
        }
        let factor = if delta.y < 0.0 {
            self.config.zoom.wheel_factor
        } else {
            1.0 / self.config.zoom.wheel_factor
        };
        self.camera.zoom_by(screen, factor)
    }

    /// Handle a key press. Returns true if it was consumed.
    pub fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> bool {
        self.input.set_modifiers(modifiers);
        match key {
            Key::Escape => {
                let cancelled = self.cancel_gesture();
                let was_drawing = std::mem::take(&mut self.frame_draw_mode);
                cancelled || was_drawing
            }
            Key::Delete | Key::Backspace => !self.delete_selected().is_empty(),
            k if modifiers.command() && k.is_char('z') => {
                if modifiers.shift {
                    self.redo()
                } else {
                    self.undo()
                }
            }
            k if modifiers.command() && k.is_char('y') => self.redo(),
            k if modifiers.command() && k.is_char('a') => {
                self.select_all();
                true
            }
            k if modifiers.command() && k.is_char('g') => {
                if modifiers.shift {
                    let frames = self.store.frames_in(self.selection.ids());
                    let mut any = false;
                    for frame in frames {
                        any |= self.unframe(frame).is_some();
                    }
                    any
                } else {
                    self.group_selected().is_some()
                }
            }
            k if modifiers.command() && k.is_char('d') => match self.selection.single() {
                Some(id) => self.duplicate(id).is_some(),
                None => false,
            },
            k if !modifiers.command() && k.is_char('f') => {
                self.toggle_frame_draw_mode();
                true
            }
            _ => false,
        }
    }
}
