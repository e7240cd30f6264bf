//! Built-in default point set.
//!
//! Used only when no persisted collection exists or the persisted set is
//! empty. Ids are fixed so a hydrate-edit-restart cycle keeps addressing
//! the same records.

use crate::point::MapPoint;

/// Returns the default point collection.
pub fn default_points() -> Vec<MapPoint> {
    vec![
        MapPoint::new(
            "c4f9f1ae-6a2e-4c55-9d3b-0f0e6a3b1a01",
            "Relay cabinet at the central depot",
            true,
            69.240562,
            41.311081,
        ),
        MapPoint::new(
            "8d1be7b0-41dd-49cf-b7b3-2a9f5ce2a802",
            "Registan substation, west feeder",
            true,
            66.975196,
            39.654388,
        ),
        MapPoint::new(
            "f3a6d0c2-9b74-4e1f-8f46-75cd3b9c1c03",
            "Old town pump house, pressure gauge replaced",
            false,
            64.428619,
            39.774664,
        ),
        MapPoint::new(
            "1e2fb530-58c6-4f7a-a5b8-64e2a0d3fb04",
            "Valley meter station, awaiting inspection",
            false,
            71.784327,
            40.389420,
        ),
        MapPoint::new(
            "7b8c3d94-2f15-4a60-90de-c1b47e88dd05",
            "Northern canal gate, winterized",
            true,
            59.610230,
            42.461900,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::normalize_points;

    #[test]
    fn defaults_are_well_formed() {
        let points = default_points();
        assert!(!points.is_empty());
        // seed records must survive the load-boundary normalization intact
        assert_eq!(normalize_points(points.clone()), points);
    }
}
