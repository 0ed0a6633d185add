//! Seams between the router and its external collaborators.

use crate::error::ProviderError;
use crate::model::{Point, RouteResult};

/// A routing service able to answer driving-route queries.
///
/// Implementations must be shareable across threads: cluster requests for a
/// single computation are issued concurrently.
pub trait RouteProvider: Sync {
    /// Round trip starting and ending at `origin`, visiting every waypoint in
    /// an order chosen by the provider.
    fn trip(&self, origin: Point, waypoints: &[Point]) -> Result<RouteResult, ProviderError>;

    /// Direct route between two points.
    fn route(&self, from: Point, to: Point) -> Result<RouteResult, ProviderError>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for &P {
    fn trip(&self, origin: Point, waypoints: &[Point]) -> Result<RouteResult, ProviderError> {
        (**self).trip(origin, waypoints)
    }

    fn route(&self, from: Point, to: Point) -> Result<RouteResult, ProviderError> {
        (**self).route(from, to)
    }
}
