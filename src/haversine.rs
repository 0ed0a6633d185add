//! Great-circle distances.
//!
//! Used for nearest-depot fallback assignment, per-report distances in route
//! summaries and proximity statistics. Ignores roads entirely.

use crate::model::Point;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Symmetric, and exactly zero for identical points.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Distances for every unordered pair `i < j`.
pub fn pairwise_km(points: &[Point]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, from) in points.iter().enumerate() {
        for to in &points[i + 1..] {
            distances.push(haversine_km(*from, *to));
        }
    }
    distances
}

/// Index of the point closest to `origin` and its distance in kilometers.
/// Ties go to the lower index.
pub fn nearest_km(origin: Point, points: &[Point]) -> Option<(usize, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| (index, haversine_km(origin, *point)))
        .fold(None, |best, (index, km)| match best {
            Some((_, best_km)) if best_km <= km => best,
            _ => Some((index, km)),
        })
}
