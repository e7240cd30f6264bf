//! Coordinate reference system utilities built on top of the `proj` crate.
//!
//! Points are stored in geographic degrees (WGS84); the map view renders in
//! Web Mercator. All projection math is delegated to `proj`.

use proj::Proj;

/// Representation of a coordinate reference system.
///
/// Stored internally as a definition string, an EPSG identifier such as
/// `"EPSG:4326"`. When created from an EPSG code the numeric value is
/// retained so that callers can inspect it if necessary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    definition: String,
    epsg: Option<u32>,
}

impl Crs {
    /// Creates a new CRS from the given EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self {
            definition: format!("EPSG:{}", code),
            epsg: Some(code),
        }
    }

    /// Returns the EPSG code for this CRS, if available.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Returns the underlying definition string.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Geographic degrees: WGS84 (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Map rendering plane: Web Mercator (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// Transforms an `(x, y)` coordinate from this CRS to the target CRS.
    pub fn transform_point(&self, target: &Crs, x: f64, y: f64) -> Option<(f64, f64)> {
        let proj = Proj::new_known_crs(&self.definition, &target.definition, None).ok()?;
        proj.convert((x, y)).ok()
    }
}

/// Formats a decimal angle as degrees, minutes and whole seconds.
pub fn format_dms(angle: f64) -> String {
    let sign = if angle < 0.0 { "-" } else { "" };
    let total = angle.abs();
    let mut degrees = total.floor();
    let mut minutes = ((total - degrees) * 60.0).floor();
    let mut seconds = ((total - degrees) * 3600.0 - minutes * 60.0).round();
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    format!("{}{}\u{00B0}{}'{}\"", sign, degrees, minutes, seconds)
}

/// Formats a longitude/latitude pair as hemisphere-suffixed DMS, latitude
/// first, e.g. `41°18'40"N 69°14'26"E`.
pub fn format_lon_lat_hdms(longitude: f64, latitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{}{} {}{}",
        format_dms(latitude.abs()),
        ns,
        format_dms(longitude.abs()),
        ew
    )
}
