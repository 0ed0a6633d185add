//! In-process route providers for exercising the router without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, mpsc};
use std::time::Duration;

use rescue_router::error::ProviderError;
use rescue_router::model::{Point, RouteResult};
use rescue_router::polyline::Polyline;
use rescue_router::traits::RouteProvider;

/// Answers every trip with a straight line through the waypoints, taking
/// one minute per stop. Origins listed in `failing` are rejected; origins
/// listed in `delays` answer late.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    failing: Vec<Point>,
    delays: Vec<(Point, Duration)>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, origin: Point) -> Self {
        self.failing.push(origin);
        self
    }

    pub fn delayed_at(mut self, origin: Point, delay: Duration) -> Self {
        self.delays.push((origin, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for ScriptedProvider {
    fn trip(&self, origin: Point, waypoints: &[Point]) -> Result<RouteResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some((_, delay)) = self.delays.iter().find(|(point, _)| *point == origin) {
            std::thread::sleep(*delay);
        }
        if self.failing.contains(&origin) {
            return Err(ProviderError::Rejected {
                code: "NoTrips".to_string(),
                message: "scripted failure".to_string(),
            });
        }

        let mut points = vec![origin];
        points.extend_from_slice(waypoints);
        points.push(origin);
        Ok(RouteResult {
            path: Polyline::new(points),
            duration_secs: 60.0 * waypoints.len() as f64,
            distance_m: 0.0,
        })
    }

    fn route(&self, from: Point, to: Point) -> Result<RouteResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RouteResult {
            path: Polyline::new(vec![from, to]),
            duration_secs: 300.0,
            distance_m: 0.0,
        })
    }
}

/// Blocks every request until the test releases it, announcing arrival first.
pub struct GatedProvider {
    started: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
    inner: ScriptedProvider,
}

impl GatedProvider {
    /// Returns the provider plus the "request started" receiver and the
    /// "release" sender.
    pub fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let provider = Self {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
            inner: ScriptedProvider::new(),
        };
        (provider, started_rx, release_tx)
    }
}

impl RouteProvider for GatedProvider {
    fn trip(&self, origin: Point, waypoints: &[Point]) -> Result<RouteResult, ProviderError> {
        let _ = self.started.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        self.inner.trip(origin, waypoints)
    }

    fn route(&self, from: Point, to: Point) -> Result<RouteResult, ProviderError> {
        self.inner.route(from, to)
    }
}
