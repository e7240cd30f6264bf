use assert_fs::prelude::*;
use predicates::prelude::*;

use field_map::io::points::{load_points, save_points};
use field_map::point::MapPoint;
use field_map::seed;
use field_map::store::PointStore;

fn sample() -> Vec<MapPoint> {
    vec![
        MapPoint::new("a", "first", true, 69.240562, 41.311081),
        MapPoint::new("b", "second", false, 66.975196, 39.654388),
    ]
}

#[test]
fn round_trip_preserves_every_field() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");
    let points = sample();

    save_points(file.path(), &points).unwrap();
    let mut loaded = load_points(file.path()).unwrap();
    loaded.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(loaded, points);

    file.assert(predicate::str::contains("\"longitude\""));
    file.assert(predicate::str::contains("\"latitude\""));
    file.assert(predicate::str::contains("\"details\""));
    file.assert(predicate::str::contains("\"status\""));
    dir.close().unwrap();
}

#[test]
fn load_missing_file_is_absent() {
    let dir = assert_fs::TempDir::new().unwrap();
    assert!(load_points(&dir.path().join("nothing.json")).is_none());
    dir.close().unwrap();
}

#[test]
fn load_malformed_blob_is_absent() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");
    file.write_str("{not json at all").unwrap();
    assert!(load_points(file.path()).is_none());

    // valid JSON of the wrong shape collapses to absent too
    file.write_str("{\"id\": \"a\"}").unwrap();
    assert!(load_points(file.path()).is_none());
    dir.close().unwrap();
}

#[test]
fn load_drops_malformed_records() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");
    file.write_str(
        r#"[
            {"id": "", "details": "no id", "status": false, "longitude": 1.0, "latitude": 2.0},
            {"id": "a", "details": "kept", "status": true, "longitude": 1.0, "latitude": 2.0},
            {"id": "a", "details": "duplicate", "status": false, "longitude": 3.0, "latitude": 4.0}
        ]"#,
    )
    .unwrap();

    let loaded = load_points(file.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].details, "kept");
    dir.close().unwrap();
}

#[test]
fn save_replaces_prior_snapshot() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");

    save_points(file.path(), &sample()).unwrap();
    save_points(file.path(), &sample()[..1]).unwrap();

    let loaded = load_points(file.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    file.assert(predicate::str::contains("second").not());
    dir.close().unwrap();
}

#[test]
fn hydrate_falls_back_to_seeds_when_missing() {
    let dir = assert_fs::TempDir::new().unwrap();
    let store = PointStore::hydrate(dir.path().join("absent.json"));
    assert_eq!(store.points(), seed::default_points().as_slice());
    assert!(store.active_point().is_none());
    dir.close().unwrap();
}

#[test]
fn hydrate_falls_back_to_seeds_when_empty() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");
    file.write_str("[]").unwrap();
    let store = PointStore::hydrate(file.path());
    assert_eq!(store.points(), seed::default_points().as_slice());
    dir.close().unwrap();
}

#[test]
fn hydrate_prefers_persisted_collection() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("points.json");
    save_points(file.path(), &sample()).unwrap();
    let store = PointStore::hydrate(file.path());
    assert_eq!(store.points(), sample().as_slice());
    dir.close().unwrap();
}
