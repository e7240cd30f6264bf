//! JSON snapshot persistence for the point collection.
//!
//! The whole collection is stored as a single JSON array; every save
//! replaces the previous snapshot (last write wins). There is no diffing,
//! versioning or migration of the stored shape.

use std::io;
use std::path::Path;

use log::warn;

use crate::point::{normalize_points, MapPoint};

/// Reads a persisted point collection.
///
/// Returns `None` when the file is missing, unreadable or does not parse as
/// the expected shape; loading never fails with an error. Parsed records are
/// normalized so malformed entries are dropped rather than propagated.
pub fn load_points(path: &Path) -> Option<Vec<MapPoint>> {
    let data = crate::io::read_to_string(path).ok()?;
    match serde_json::from_str::<Vec<MapPoint>>(&data) {
        Ok(points) => Some(normalize_points(points)),
        Err(e) => {
            warn!("Ignoring malformed point data in {}: {}", path.display(), e);
            None
        }
    }
}

/// Writes the whole point collection as a single JSON snapshot.
pub fn save_points(path: &Path, points: &[MapPoint]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(points).map_err(io::Error::other)?;
    crate::io::write_string(path, &json)
}
