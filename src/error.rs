//! Error types shared across the routing pipeline.

use std::{io, path::PathBuf};

use crate::model::DepotId;

/// Input that cannot be clustered or routed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{what} has coordinates out of range: lat {lat}, lng {lng}")]
    OutOfRange { what: String, lat: f64, lng: f64 },

    #[error("{reports} reports cannot be assigned without any depots")]
    NoDepots { reports: usize },

    #[error("{groups} region groups supplied for {depots} depots")]
    GroupCountMismatch { groups: usize, depots: usize },

    #[error("region {region:?} listed in groups {first} and {second}")]
    DuplicateRegion {
        region: String,
        first: usize,
        second: usize,
    },
}

/// Malformed encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("byte {byte:#04x} at position {position} is not a polyline character")]
    InvalidByte { position: usize, byte: u8 },

    #[error("polyline ends mid-value at position {position}")]
    Truncated { position: usize },

    #[error("value starting at position {position} does not fit in 64 bits")]
    Overflow { position: usize },

    #[error("vertex {vertex} decodes outside valid coordinate ranges")]
    OutOfRange { vertex: usize },
}

/// A single route request that did not produce a route.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing provider answered with HTTP {status}")]
    Status { status: u16 },

    #[error("routing provider response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("routing provider rejected the request with {code}: {message}")]
    Rejected { code: String, message: String },

    #[error("routing provider returned no route")]
    NoRoute,

    #[error("route geometry is malformed: {0}")]
    Decode(#[from] DecodeError),
}

/// Per-cluster failure captured during a computation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClusterFailure {
    pub depot_id: DepotId,
    pub reason: String,
}

/// Error surfaced by a whole route computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("all {} cluster route requests failed", .failures.len())]
    AllClustersFailed { failures: Vec<ClusterFailure> },
}

/// Error from routing a single origin to its nearest depot.
#[derive(Debug, thiserror::Error)]
pub enum DirectRouteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {error}")]
    Io { path: PathBuf, error: io::Error },

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
