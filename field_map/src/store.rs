//! In-memory point store and active-point state machine.

use std::path::PathBuf;

use log::warn;

use crate::io::points::{load_points, save_points};
use crate::point::{MapPoint, PointPatch};
use crate::seed;

/// Owner of the point collection and the active-point reference.
///
/// The active point is held by id and resolved on every read, so a record
/// replaced by [`PointStore::update`] can never be observed through a stale
/// snapshot. Operations on an unknown id are no-ops rather than errors; the
/// UI only ever supplies ids it read from the store.
///
/// Every successful `update` synchronously rewrites the whole persisted
/// collection when the store is bound to a storage path. All other
/// operations are pure in-memory mutations.
#[derive(Debug, Default)]
pub struct PointStore {
    points: Vec<MapPoint>,
    active: Option<String>,
    storage: Option<PathBuf>,
    revision: u64,
}

impl PointStore {
    /// Creates an empty store with no storage binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that persists updates to `path`.
    pub fn with_storage(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: Some(path.into()),
            ..Self::default()
        }
    }

    /// Creates a store bound to `path`, hydrated from the persisted
    /// collection or from the built-in defaults when nothing usable is
    /// stored there.
    pub fn hydrate(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::with_storage(path);
        let points = match store.storage.as_deref().and_then(load_points) {
            Some(points) if !points.is_empty() => points,
            _ => seed::default_points(),
        };
        store.replace_points(points);
        store
    }

    /// Returns all points.
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    /// Looks up a point by id.
    pub fn point(&self, id: &str) -> Option<&MapPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Returns the id of the active point, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Resolves the active point against the current collection.
    pub fn active_point(&self) -> Option<&MapPoint> {
        self.active.as_deref().and_then(|id| self.point(id))
    }

    /// Monotonic change counter, bumped on every state transition.
    /// Consumers resynchronize derived state when they observe a bump.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the whole collection. Used once at startup to hydrate; the
    /// active reference is left alone and nothing is persisted (hydration
    /// is a read, not a write).
    pub fn replace_points(&mut self, points: Vec<MapPoint>) {
        self.points = points;
        self.revision += 1;
    }

    /// Makes the point with `id` active. No-op returning `false` when the
    /// id is not in the collection.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.point(id).is_none() {
            return false;
        }
        self.active = Some(id.to_string());
        self.revision += 1;
        true
    }

    /// Clears the active point. No-op when nothing is active.
    pub fn deactivate(&mut self) {
        if self.active.take().is_some() {
            self.revision += 1;
        }
    }

    /// Applies `patch` to the point with `id`, leaving every other record
    /// untouched, and synchronously persists the updated collection.
    /// No-op returning `false` when the id is not in the collection.
    pub fn update(&mut self, id: &str, patch: PointPatch) -> bool {
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if let Some(details) = patch.details {
            point.details = details;
        }
        if let Some(status) = patch.status {
            point.status = status;
        }
        self.revision += 1;
        self.persist();
        true
    }

    fn persist(&self) {
        if let Some(path) = &self.storage {
            if let Err(e) = save_points(path, &self.points) {
                warn!("Failed to persist points to {}: {}", path.display(), e);
            }
        }
    }
}
