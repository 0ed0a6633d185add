//! Cluster routing: fan out one trip request per cluster, join, summarize.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::clustering::{RegionGroups, compute_clusters};
use crate::haversine::haversine_km;
use crate::error::{ClusterFailure, DirectRouteError, ProviderError, RouteError, ValidationError};
use crate::model::{Depot, DepotId, Point, Report, RouteOutcome, RouteResult};
use crate::nearest::{DirectRoute, nearest_depots};
use crate::summary::{build_summaries, proximity_stats, whole_minutes};
use crate::traits::RouteProvider;

/// Routes reports from their assigned depots through an external provider.
#[derive(Debug, Clone)]
pub struct GeoClusterRouter<P> {
    provider: P,
    groups: RegionGroups,
}

impl<P: RouteProvider> GeoClusterRouter<P> {
    pub fn new(provider: P, groups: RegionGroups) -> Self {
        Self { provider, groups }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn region_groups(&self) -> &RegionGroups {
        &self.groups
    }

    /// Clusters the reports, requests one round trip per non-empty cluster
    /// concurrently, and assembles the summaries in depot order.
    ///
    /// Depots and region groups are parallel lists and must have the same
    /// length. Failed clusters are listed in `failures` and omitted from the
    /// summaries; only when every requested cluster fails is the whole
    /// computation an error.
    pub fn compute_routes(
        &self,
        reports: &[Report],
        depots: &[Depot],
    ) -> Result<RouteOutcome, RouteError> {
        let started = Instant::now();

        if self.groups.len() != depots.len() {
            return Err(ValidationError::GroupCountMismatch {
                groups: self.groups.len(),
                depots: depots.len(),
            }
            .into());
        }

        let clusters = compute_clusters(reports, depots, &self.groups)?;

        let answers: Vec<(DepotId, Result<RouteResult, ProviderError>)> = clusters
            .par_iter()
            .filter(|cluster| !cluster.is_empty())
            .map(|cluster| {
                let waypoints = cluster.waypoints();
                let result = self.provider.trip(cluster.depot.location, &waypoints);
                (cluster.depot.id, result)
            })
            .collect();

        let attempted = answers.len();
        let mut results = HashMap::with_capacity(attempted);
        let mut failures = Vec::new();
        for (depot_id, answer) in answers {
            match answer {
                Ok(result) => {
                    results.insert(depot_id, result);
                }
                Err(error) => {
                    warn!(depot = %depot_id, %error, "cluster route request failed");
                    failures.push(ClusterFailure {
                        depot_id,
                        reason: error.to_string(),
                    });
                }
            }
        }

        if attempted > 0 && results.is_empty() {
            return Err(RouteError::AllClustersFailed { failures });
        }

        let report_points: Vec<Point> = reports.iter().map(|report| report.location).collect();
        let outcome = RouteOutcome {
            summaries: build_summaries(&clusters, &results),
            proximity: proximity_stats(&report_points),
            failures,
            elapsed: started.elapsed(),
        };

        info!(
            reports = reports.len(),
            clusters = attempted,
            routed = outcome.summaries.len(),
            failed = outcome.failures.len(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "routes computed"
        );

        Ok(outcome)
    }

    /// Runs [`compute_routes`](Self::compute_routes) under a fresh session
    /// ticket. Returns whether the result was published, i.e. no newer
    /// computation started in the meantime.
    pub fn compute_in(&self, session: &RouteSession, reports: &[Report], depots: &[Depot]) -> bool {
        let ticket = session.begin();
        let result = self.compute_routes(reports, depots);
        session.publish(ticket, result)
    }

    /// Direct route from `origin` to the closest depot.
    pub fn route_to_nearest_depot(
        &self,
        origin: Point,
        depots: &[Depot],
    ) -> Result<DirectRoute, DirectRouteError> {
        origin.validate("origin")?;
        let nearest = nearest_depots(origin, depots, 1)?
            .into_iter()
            .next()
            .ok_or(ValidationError::NoDepots { reports: 1 })?;

        self.route_to_depot(origin, &nearest.depot)
    }

    /// Direct route from `origin` to a chosen depot.
    pub fn route_to_depot(
        &self,
        origin: Point,
        depot: &Depot,
    ) -> Result<DirectRoute, DirectRouteError> {
        origin.validate("origin")?;
        depot.location.validate(depot.id)?;

        let distance_km = haversine_km(origin, depot.location);
        let result = self.provider.route(origin, depot.location)?;
        debug!(depot = %depot.id, km = distance_km, "routed to depot");

        Ok(DirectRoute {
            depot: depot.clone(),
            distance_km,
            total_minutes: whole_minutes(result.duration_secs),
            path: result.path,
        })
    }
}

/// Identifies one computation within a [`RouteSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// The most recently published computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub result: Result<RouteOutcome, RouteError>,
}

/// Holds the latest route computation for a caller that may start a new one
/// before the previous one finishes.
///
/// Every computation takes a ticket; results carrying a superseded ticket are
/// dropped on arrival so a slow old response never replaces a newer one.
#[derive(Debug, Default)]
pub struct RouteSession {
    generation: AtomicU64,
    latest: Mutex<Option<SessionSnapshot>>,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new computation, superseding any in flight.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `result` if `ticket` is still the newest; otherwise discards it.
    pub fn publish(&self, ticket: Ticket, result: Result<RouteOutcome, RouteError>) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        // Checked under the lock so two publishers cannot interleave.
        if !self.is_current(ticket) {
            debug!(
                generation = ticket.0,
                current = self.generation.load(Ordering::SeqCst),
                "discarding stale route computation"
            );
            return false;
        }
        *latest = Some(SessionSnapshot {
            generation: ticket.0,
            result,
        });
        true
    }

    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
