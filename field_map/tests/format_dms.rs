use field_map::crs::{format_dms, format_lon_lat_hdms};

#[test]
fn dms_basic() {
    assert_eq!(format_dms(123.7516667), "123\u{00B0}45'6\"");
}

#[test]
fn dms_negative() {
    assert_eq!(format_dms(-0.0166667), "-0\u{00B0}1'0\"");
}

#[test]
fn hdms_hemispheres() {
    let text = format_lon_lat_hdms(-69.240562, 41.311081);
    assert!(text.ends_with('W'));
    assert!(text.starts_with("41\u{00B0}"));
    assert!(text.contains('N'));
}
