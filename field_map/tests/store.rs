use field_map::io::points::load_points;
use field_map::point::{MapPoint, PointPatch};
use field_map::store::PointStore;

fn patch(details: &str, status: bool) -> PointPatch {
    PointPatch {
        details: Some(details.to_string()),
        status: Some(status),
    }
}

#[test]
fn edit_and_reactivate_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.json");
    let mut store = PointStore::with_storage(&path);
    store.replace_points(vec![MapPoint::new("p1", "old", true, 69.24, 41.31)]);

    assert!(store.activate("p1"));
    assert!(store.update("p1", patch("new", false)));

    let p1 = store.point("p1").unwrap();
    assert_eq!(p1.details, "new");
    assert!(!p1.status);

    let persisted = load_points(&path).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].details, "new");
    assert!(!persisted[0].status);

    store.deactivate();
    assert!(store.active_point().is_none());
    assert!(store.activate("p1"));
    let active = store.active_point().unwrap();
    assert_eq!(active.details, "new");
    assert!(!active.status);
}

#[test]
fn activation_is_exclusive() {
    let mut store = PointStore::new();
    store.replace_points(vec![
        MapPoint::new("a", "first", true, 1.0, 2.0),
        MapPoint::new("b", "second", false, 3.0, 4.0),
    ]);

    store.activate("a");
    store.activate("b");
    store.update("b", patch("second, edited", true));

    let active = store.active_point().unwrap();
    assert_eq!(active.id, "b");
    assert_eq!(active.details, "second, edited");
}

#[test]
fn activate_unknown_id_leaves_active_reference_unchanged() {
    let mut store = PointStore::new();
    store.replace_points(vec![MapPoint::new("a", "first", true, 1.0, 2.0)]);
    store.activate("a");
    assert!(!store.activate("nonexistent"));
    assert_eq!(store.active_id(), Some("a"));
}

#[test]
fn repeated_update_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.json");
    let mut store = PointStore::with_storage(&path);
    store.replace_points(vec![
        MapPoint::new("a", "first", true, 1.0, 2.0),
        MapPoint::new("b", "second", false, 3.0, 4.0),
    ]);

    store.update("a", patch("edited", false));
    let once = load_points(&path).unwrap();
    store.update("a", patch("edited", false));
    let twice = load_points(&path).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn update_persists_synchronously() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.json");
    let mut store = PointStore::with_storage(&path);
    store.replace_points(vec![MapPoint::new("a", "first", true, 1.0, 2.0)]);
    assert!(!path.exists());

    store.update("a", patch("edited", true));
    assert_eq!(load_points(&path).unwrap()[0].details, "edited");
}

#[test]
fn update_without_storage_is_in_memory_only() {
    let mut store = PointStore::new();
    store.replace_points(vec![MapPoint::new("a", "first", true, 1.0, 2.0)]);
    assert!(store.update("a", patch("edited", false)));
    assert_eq!(store.point("a").unwrap().details, "edited");
}
