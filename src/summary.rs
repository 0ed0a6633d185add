//! Route summary assembly and proximity statistics.

use std::collections::HashMap;

use crate::haversine::{haversine_km, pairwise_km};
use crate::model::{
    Cluster, DepotId, Point, ProximityStats, ReportDistance, RouteResult, RouteSummary,
};

/// Builds summaries for clusters that have a route result, in cluster order.
///
/// Clusters without a result are left out entirely.
pub fn build_summaries(
    clusters: &[Cluster],
    results: &HashMap<DepotId, RouteResult>,
) -> Vec<RouteSummary> {
    clusters
        .iter()
        .filter_map(|cluster| {
            let result = results.get(&cluster.depot.id)?;
            Some(summarize(cluster, result))
        })
        .collect()
}

fn summarize(cluster: &Cluster, result: &RouteResult) -> RouteSummary {
    let depot = cluster.depot.location;
    let reports = cluster
        .reports
        .iter()
        .map(|report| ReportDistance {
            report_id: report.id,
            description: report.description.clone(),
            distance_km: haversine_km(depot, report.location),
        })
        .collect();

    RouteSummary {
        depot_id: cluster.depot.id,
        depot_name: cluster.depot.name.clone(),
        path: result.path.clone(),
        total_minutes: whole_minutes(result.duration_secs),
        reports,
        proximity: proximity_stats(&cluster.waypoints()),
    }
}

/// Seconds to whole minutes, rounding half up.
pub fn whole_minutes(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds / 60.0 + 0.5).floor() as u64
}

/// Min/max/average over all pairwise distances among `points`.
pub fn proximity_stats(points: &[Point]) -> ProximityStats {
    let distances = pairwise_km(points);
    if distances.is_empty() {
        return ProximityStats::Undefined;
    }

    let (min_km, max_km, sum) = distances.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), &km| (min.min(km), max.max(km), sum + km),
    );

    ProximityStats::Measured {
        min_km,
        max_km,
        avg_km: sum / distances.len() as f64,
        pairs: distances.len(),
    }
}
