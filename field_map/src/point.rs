//! Geolocated point records shown on the map.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Representation of a geolocated point with an editable comment and status
/// flag.
///
/// `id` and the coordinates are fixed at creation; only `details` and
/// `status` change afterwards, through [`crate::store::PointStore::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub id: String,
    pub details: String,
    pub status: bool,
    pub longitude: f64,
    pub latitude: f64,
}

impl MapPoint {
    /// Creates a new point record.
    pub fn new(id: &str, details: &str, status: bool, longitude: f64, latitude: f64) -> Self {
        Self {
            id: id.to_string(),
            details: details.to_string(),
            status,
            longitude,
            latitude,
        }
    }
}

/// Partial update applied to a point's editable fields.
#[derive(Debug, Clone, Default)]
pub struct PointPatch {
    pub details: Option<String>,
    pub status: Option<bool>,
}

/// Filters a freshly loaded collection down to well-formed records.
///
/// Records with an empty id or non-finite coordinates are dropped, and a
/// duplicated id keeps only its first occurrence, so the unique-id invariant
/// holds for everything that reaches the store.
pub fn normalize_points(points: Vec<MapPoint>) -> Vec<MapPoint> {
    let mut seen: HashSet<String> = HashSet::new();
    points
        .into_iter()
        .filter(|p| !p.id.is_empty() && p.longitude.is_finite() && p.latitude.is_finite())
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}
