//! OSRM HTTP adapter for trip and route queries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::model::{Point, RouteResult};
use crate::polyline;
use crate::traits::RouteProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Per-request deadline; an expired request counts as a failed cluster.
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    pub fn trip_url(&self, origin: Point, waypoints: &[Point]) -> String {
        let coords = coordinates(std::iter::once(&origin).chain(waypoints));
        format!(
            "{}/trip/v1/{}/{}?roundtrip=true&source=first&overview=full&geometries=polyline",
            self.base_url(),
            self.config.profile,
            coords
        )
    }

    pub fn route_url(&self, from: Point, to: Point) -> String {
        let coords = coordinates([&from, &to]);
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline",
            self.base_url(),
            self.config.profile,
            coords
        )
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn fetch(&self, url: String) -> Result<OsrmResponse, ProviderError> {
        debug!(%url, "osrm request");
        let response = self.client.get(url).send()?;
        let status = response.status();
        let text = response.text()?;

        // OSRM reports query errors as 4xx with a JSON `code`, so parse
        // before looking at the status.
        match serde_json::from_str::<OsrmResponse>(&text) {
            Ok(body) if body.code != "Ok" => Err(ProviderError::Rejected {
                code: body.code,
                message: body.message.unwrap_or_default(),
            }),
            Ok(body) if status.is_success() => Ok(body),
            Err(error) if status.is_success() => Err(ProviderError::Malformed(error)),
            _ => Err(ProviderError::Status {
                status: status.as_u16(),
            }),
        }
    }
}

impl RouteProvider for OsrmClient {
    fn trip(&self, origin: Point, waypoints: &[Point]) -> Result<RouteResult, ProviderError> {
        let body = self.fetch(self.trip_url(origin, waypoints))?;
        body.trips
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRoute)?
            .into_result()
    }

    fn route(&self, from: Point, to: Point) -> Result<RouteResult, ProviderError> {
        let body = self.fetch(self.route_url(from, to))?;
        body.routes
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRoute)?
            .into_result()
    }
}

/// `lng,lat` pairs joined by `;`, as OSRM expects.
fn coordinates<'a>(points: impl IntoIterator<Item = &'a Point>) -> String {
    points
        .into_iter()
        .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    trips: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    duration: f64,
    #[serde(default)]
    distance: f64,
}

impl OsrmRoute {
    fn into_result(self) -> Result<RouteResult, ProviderError> {
        Ok(RouteResult {
            path: polyline::decode(&self.geometry)?,
            duration_secs: self.duration,
            distance_m: self.distance,
        })
    }
}
