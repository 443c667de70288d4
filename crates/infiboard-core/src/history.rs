//! Undo/redo as an append-only log of store snapshots with a cursor.

use crate::store::Snapshot;
use std::sync::Arc;

/// Maximum number of undo steps kept.
pub const MAX_UNDO_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the entry matching the current store state.
    cursor: usize,
}

impl History {
    /// Start a history whose base state is `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Record the state after a committed mutation.
    ///
    /// Drops any redo tail. Recording the current snapshot again is a no-op.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        if self
            .entries
            .get(self.cursor)
            .is_some_and(|current| Arc::ptr_eq(current, &snapshot))
        {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > MAX_UNDO_HISTORY + 1 {
            let excess = self.entries.len() - (MAX_UNDO_HISTORY + 1);
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back. Returns the snapshot to load into the store.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward. Returns the snapshot to load into the store.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Forget everything and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.entries = vec![snapshot];
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CanvasObject, ShapeKind};
    use crate::store::ObjectStore;
    use kurbo::Rect;

    fn add(store: &mut ObjectStore) {
        store.add(CanvasObject::shape(Rect::new(0.0, 0.0, 10.0, 10.0), ShapeKind::Rectangle));
    }

    #[test]
    fn test_undo_redo() {
        let mut store = ObjectStore::new();
        let mut history = History::new(store.snapshot());
        assert!(!history.can_undo());

        add(&mut store);
        history.record(store.snapshot());
        add(&mut store);
        history.record(store.snapshot());

        let snapshot = history.undo().unwrap();
        assert_eq!(snapshot.len(), 1);
        let snapshot = history.undo().unwrap();
        assert!(snapshot.is_empty());
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().len(), 1);
        assert!(history.can_redo());
    }

    #[test]
    fn test_record_drops_redo_tail() {
        let mut store = ObjectStore::new();
        let mut history = History::new(store.snapshot());
        add(&mut store);
        history.record(store.snapshot());
        let base = history.undo().unwrap();
        assert!(history.can_redo());

        store.replace_all(base).unwrap();
        add(&mut store);
        add(&mut store);
        history.record(store.snapshot());
        assert!(!history.can_redo());
        assert_eq!(history.undo().unwrap().len(), 0);
    }

    #[test]
    fn test_duplicate_record_ignored() {
        let mut store = ObjectStore::new();
        let mut history = History::new(store.snapshot());
        add(&mut store);
        assert!(history.record(store.snapshot()));
        assert!(!history.record(store.snapshot()));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_history_is_capped() {
        let mut store = ObjectStore::new();
        let mut history = History::new(store.snapshot());
        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            add(&mut store);
            history.record(store.snapshot());
        }
        assert_eq!(history.undo_depth(), MAX_UNDO_HISTORY);
        let mut oldest = None;
        while let Some(snapshot) = history.undo() {
            oldest = Some(snapshot);
        }
        assert_eq!(oldest.map(|s| s.len()), Some(10));
    }
}
