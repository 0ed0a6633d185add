//! Plain data handed to and produced by the router.
//!
//! Reports and depots come from the persistence layer already fetched; field
//! aliases accept its row shapes (`township`, `shelter_name`).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterFailure, ValidationError};
use crate::polyline::Polyline;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Checks the coordinate ranges, naming `what` in the error.
    pub fn validate(&self, what: impl fmt::Display) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                what: what.to_string(),
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepotId(pub u64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report {}", self.0)
    }
}

impl fmt::Display for DepotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depot {}", self.0)
    }
}

/// An incident report (lost, injured or abandoned animal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    #[serde(flatten)]
    pub location: Point,
    #[serde(alias = "township")]
    pub region: String,
    #[serde(default)]
    pub description: String,
}

impl Report {
    pub fn new(
        id: u64,
        location: Point,
        region: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ReportId(id),
            location,
            region: region.into(),
            description: description.into(),
        }
    }
}

/// A fixed origin a cluster is routed from. Its ordinal is its position in
/// the depot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub id: DepotId,
    #[serde(alias = "shelter_name", default)]
    pub name: String,
    #[serde(flatten)]
    pub location: Point,
}

impl Depot {
    pub fn new(id: u64, name: impl Into<String>, location: Point) -> Self {
        Self {
            id: DepotId(id),
            name: name.into(),
            location,
        }
    }
}

/// Reports assigned to one depot for a single computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub depot_index: usize,
    pub depot: Depot,
    pub reports: Vec<Report>,
}

impl Cluster {
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn waypoints(&self) -> Vec<Point> {
        self.reports.iter().map(|report| report.location).collect()
    }
}

/// One answer from the routing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub path: Polyline,
    pub duration_secs: f64,
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDistance {
    pub report_id: ReportId,
    pub description: String,
    pub distance_km: f64,
}

/// Min/max/average pairwise distance over a set of points.
///
/// `Undefined` when fewer than two points are available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProximityStats {
    Undefined,
    Measured {
        min_km: f64,
        max_km: f64,
        avg_km: f64,
        pairs: usize,
    },
}

impl ProximityStats {
    pub fn is_defined(&self) -> bool {
        matches!(self, ProximityStats::Measured { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub depot_id: DepotId,
    pub depot_name: String,
    pub path: Polyline,
    pub total_minutes: u64,
    pub reports: Vec<ReportDistance>,
    pub proximity: ProximityStats,
}

/// Result of one `compute_routes` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutcome {
    pub summaries: Vec<RouteSummary>,
    pub proximity: ProximityStats,
    pub failures: Vec<ClusterFailure>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RouteOutcome {
    pub fn failed_depots(&self) -> Vec<DepotId> {
        self.failures.iter().map(|failure| failure.depot_id).collect()
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
