//! Great-circle distance and safe zone proximity filtering.

use std::f64::consts::PI;

use crate::model::SafeZone;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Search radius used when a proximity query does not name one
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Haversine distance between two points in km.
///
/// NaN inputs propagate to a NaN result.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = deg_to_rad(lat2 - lat1);
    let dlon = deg_to_rad(lon2 - lon1);

    let a = (dlat / 2.0).sin().powi(2)
        + deg_to_rad(lat1).cos() * deg_to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Zones within `radius_km` of the query point (boundary inclusive),
/// in source order.
pub fn within_radius<'a>(
    zones: impl IntoIterator<Item = &'a SafeZone>,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Vec<SafeZone> {
    zones
        .into_iter()
        .filter(|zone| haversine_km(lat, lon, zone.latitude(), zone.longitude()) <= radius_km)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoneCategory;

    fn zone(name: &str, lat: f64, lon: f64) -> SafeZone {
        SafeZone {
            name: name.to_string(),
            location: [lat, lon],
            category: ZoneCategory::Shelter,
        }
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_km(28.6139, 77.2090, 28.6139, 77.2090);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_km(28.6139, 77.2090, 27.1751, 78.0421);
        let ba = haversine_km(27.1751, 78.0421, 28.6139, 77.2090);
        assert!((ab - ba).abs() < 1e-9);
        // Delhi to Agra: ~180 km
        assert!(ab > 170.0 && ab < 190.0);
    }

    #[test]
    fn test_haversine_nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_within_radius_keeps_order() {
        let zones = vec![
            zone("far", 28.7041, 77.1025),
            zone("here", 28.6139, 77.2090),
            zone("close", 28.6200, 77.2100),
        ];

        let hits = within_radius(&zones, 28.6139, 77.2090, DEFAULT_RADIUS_KM);
        let names: Vec<_> = hits.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["here", "close"]);
    }

    #[test]
    fn test_within_radius_boundary_inclusive() {
        let zones = vec![zone("edge", 28.7041, 77.1025)];
        let exact = haversine_km(28.6139, 77.2090, 28.7041, 77.1025);

        assert_eq!(within_radius(&zones, 28.6139, 77.2090, exact).len(), 1);
        assert!(within_radius(&zones, 28.6139, 77.2090, exact - 0.001).is_empty());
    }
}
