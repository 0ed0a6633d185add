//! Nearest-depot lookup for a single origin (e.g. a user's position).

use serde::Serialize;

use crate::error::ValidationError;
use crate::haversine::haversine_km;
use crate::model::{Depot, Point};
use crate::polyline::Polyline;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepotDistance {
    pub depot: Depot,
    pub distance_km: f64,
}

/// A direct drive from an origin to its closest depot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectRoute {
    pub depot: Depot,
    pub distance_km: f64,
    pub path: Polyline,
    pub total_minutes: u64,
}

/// Up to `limit` depots ordered by great-circle distance from `origin`.
/// Equal distances keep the input order.
pub fn nearest_depots(
    origin: Point,
    depots: &[Depot],
    limit: usize,
) -> Result<Vec<DepotDistance>, ValidationError> {
    origin.validate("origin")?;

    let mut ranked = Vec::with_capacity(depots.len());
    for depot in depots {
        depot.location.validate(depot.id)?;
        ranked.push(DepotDistance {
            depot: depot.clone(),
            distance_km: haversine_km(origin, depot.location),
        });
    }

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    Ok(ranked)
}
