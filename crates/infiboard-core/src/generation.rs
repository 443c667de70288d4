//! Generated-content lifecycle: placeholder, generating, then idle or error.
//!
//! Progress is advanced once per display frame by the host. Every update
//! re-checks that the object still exists, since it may be deleted while a
//! generation is in flight.

use crate::objects::{GenerationState, ObjectId, ObjectKind, ObjectPatch};
use crate::store::ObjectStore;
use crate::toolbar::Instant;
use std::time::Duration;

/// Progress shown while waiting for a result never passes this value.
pub const MAX_PENDING_PROGRESS: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Job {
    id: ObjectId,
    started: Instant,
}

/// Tracks in-flight generations and animates their progress.
#[derive(Debug, Clone)]
pub struct GenerationTracker {
    jobs: Vec<Job>,
    /// Time after which progress reaches [`MAX_PENDING_PROGRESS`].
    expected: Duration,
}

impl Default for GenerationTracker {
    fn default() -> Self {
        Self::new(Duration::from_secs(8))
    }
}

impl GenerationTracker {
    pub fn new(expected: Duration) -> Self {
        Self {
            jobs: Vec::new(),
            expected,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn is_tracking(&self, id: ObjectId) -> bool {
        self.jobs.iter().any(|job| job.id == id)
    }

    /// Move a placeholder (or failed object) into `generating`.
    pub fn begin(&mut self, store: &mut ObjectStore, id: ObjectId, now: Instant) -> bool {
        let Some(state) = store.get(id).map(|o| o.state) else {
            return false;
        };
        if state == GenerationState::Generating {
            return false;
        }
        store.update(
            id,
            &ObjectPatch::default()
                .state(GenerationState::Generating)
                .progress(Some(0.0)),
        );
        self.jobs.retain(|job| job.id != id);
        self.jobs.push(Job { id, started: now });
        log::debug!("Generation started for {id}");
        true
    }

    /// Advance progress for every in-flight job. Jobs whose object is gone are dropped.
    ///
    /// Returns the ids that were updated.
    pub fn advance(&mut self, store: &mut ObjectStore, now: Instant) -> Vec<ObjectId> {
        self.jobs.retain(|job| {
            let alive = store.contains(job.id);
            if !alive {
                log::debug!("Dropping generation for deleted object {}", job.id);
            }
            alive
        });
        let expected = self.expected.as_secs_f64().max(f64::EPSILON);
        let patches: Vec<(ObjectId, ObjectPatch)> = self
            .jobs
            .iter()
            .map(|job| {
                let elapsed = now.saturating_duration_since(job.started).as_secs_f64();
                let progress = (elapsed / expected).min(1.0) * MAX_PENDING_PROGRESS;
                (job.id, ObjectPatch::default().progress(Some(progress)))
            })
            .collect();
        store.update_many(&patches);
        patches.into_iter().map(|(id, _)| id).collect()
    }

    /// Finish a generation, optionally replacing the payload with the result.
    ///
    /// A result that would turn the object into a frame is ignored.
    pub fn complete(&mut self, store: &mut ObjectStore, id: ObjectId, result: Option<ObjectKind>) -> bool {
        self.jobs.retain(|job| job.id != id);
        store.update_with(id, |object| {
            if let Some(kind) = result {
                if !matches!(kind, ObjectKind::Frame(_)) && !object.is_frame() {
                    *object.kind_mut() = kind;
                }
            }
            object.state = GenerationState::Idle;
            object.metadata.progress = None;
        })
    }

    /// Mark a generation as failed.
    pub fn fail(&mut self, store: &mut ObjectStore, id: ObjectId) -> bool {
        self.jobs.retain(|job| job.id != id);
        let failed = store.update(
            id,
            &ObjectPatch::default().state(GenerationState::Error).progress(None),
        );
        if failed {
            log::warn!("Generation failed for {id}");
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{CanvasObject, Media};
    use kurbo::Rect;

    fn placeholder(store: &mut ObjectStore) -> ObjectId {
        store.add(CanvasObject::placeholder(
            ObjectKind::Image(Media::new("pending")),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        ))
    }

    #[test]
    fn test_lifecycle() {
        let mut store = ObjectStore::new();
        let mut tracker = GenerationTracker::new(Duration::from_secs(2));
        let id = placeholder(&mut store);
        let t0 = Instant::now();

        assert!(tracker.begin(&mut store, id, t0));
        assert_eq!(store.get(id).unwrap().state, GenerationState::Generating);
        assert!(!tracker.begin(&mut store, id, t0));

        tracker.advance(&mut store, t0 + Duration::from_secs(1));
        let progress = store.get(id).unwrap().metadata.progress.unwrap();
        assert!((progress - 0.475).abs() < 1e-9);

        tracker.advance(&mut store, t0 + Duration::from_secs(60));
        let progress = store.get(id).unwrap().metadata.progress.unwrap();
        assert!((progress - MAX_PENDING_PROGRESS).abs() < 1e-9);

        assert!(tracker.complete(&mut store, id, Some(ObjectKind::Image(Media::new("cat.png")))));
        let object = store.get(id).unwrap();
        assert_eq!(object.state, GenerationState::Idle);
        assert!(object.metadata.progress.is_none());
        assert_eq!(object.kind(), &ObjectKind::Image(Media::new("cat.png")));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_deleted_target_is_dropped() {
        let mut store = ObjectStore::new();
        let mut tracker = GenerationTracker::default();
        let id = placeholder(&mut store);
        let t0 = Instant::now();
        tracker.begin(&mut store, id, t0);
        store.delete(id);

        assert!(tracker.advance(&mut store, t0 + Duration::from_millis(16)).is_empty());
        assert!(!tracker.is_tracking(id));
        assert!(!tracker.complete(&mut store, id, None));
    }

    #[test]
    fn test_fail_sets_error() {
        let mut store = ObjectStore::new();
        let mut tracker = GenerationTracker::default();
        let id = placeholder(&mut store);
        tracker.begin(&mut store, id, Instant::now());

        assert!(tracker.fail(&mut store, id));
        assert_eq!(store.get(id).unwrap().state, GenerationState::Error);
        // Failed objects may be retried.
        assert!(tracker.begin(&mut store, id, Instant::now()));
    }
}
