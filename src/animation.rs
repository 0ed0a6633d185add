//! Marker playback along a decoded route.
//!
//! The marker advances one vertex per `step`. `position_at` jumps between
//! vertices; `interpolated_at` glides between them.

use std::time::Duration;

use serde::Serialize;

use crate::model::Point;
use crate::polyline::Polyline;

pub const DEFAULT_STEP: Duration = Duration::from_millis(200);

/// Where the marker sits `at_ms` after playback starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub at_ms: u64,
    #[serde(flatten)]
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerAnimation {
    path: Vec<Point>,
    step: Duration,
}

impl MarkerAnimation {
    pub fn new(path: &Polyline, step: Duration) -> Self {
        Self {
            path: path.points().to_vec(),
            step: step.max(Duration::from_millis(1)),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time until the marker reaches the last vertex.
    pub fn total_duration(&self) -> Duration {
        let segments = self.path.len().saturating_sub(1) as u32;
        self.step * segments
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.total_duration()
    }

    /// Vertex the marker sits on after `elapsed`.
    pub fn position_at(&self, elapsed: Duration) -> Option<Point> {
        let last = self.path.len().checked_sub(1)?;
        let index = (elapsed.as_nanos() / self.step.as_nanos()).min(last as u128) as usize;
        Some(self.path[index])
    }

    /// One frame per vertex, spaced by `step`.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        let step_ms = self.step.as_millis() as u64;
        self.path.iter().enumerate().map(move |(index, &position)| Frame {
            at_ms: step_ms * index as u64,
            position,
        })
    }

    /// Linear position between the surrounding vertices after `elapsed`.
    pub fn interpolated_at(&self, elapsed: Duration) -> Option<Point> {
        let last = self.path.len().checked_sub(1)?;
        let steps = elapsed.as_secs_f64() / self.step.as_secs_f64();
        let index = steps.floor() as usize;
        if index >= last {
            return Some(self.path[last]);
        }

        let t = steps - index as f64;
        let from = self.path[index];
        let to = self.path[index + 1];
        Some(Point::new(
            from.lat + (to.lat - from.lat) * t,
            from.lng + (to.lng - from.lng) * t,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation() -> MarkerAnimation {
        let path = Polyline::new(vec![
            Point::new(16.80, 96.10),
            Point::new(16.81, 96.11),
            Point::new(16.82, 96.12),
        ]);
        MarkerAnimation::new(&path, DEFAULT_STEP)
    }

    #[test]
    fn test_position_steps_through_vertices() {
        let anim = animation();
        assert_eq!(anim.position_at(Duration::ZERO), Some(Point::new(16.80, 96.10)));
        assert_eq!(anim.position_at(Duration::from_millis(199)), Some(Point::new(16.80, 96.10)));
        assert_eq!(anim.position_at(Duration::from_millis(200)), Some(Point::new(16.81, 96.11)));
        assert_eq!(anim.position_at(Duration::from_secs(10)), Some(Point::new(16.82, 96.12)));
    }

    #[test]
    fn test_total_duration_and_finish() {
        let anim = animation();
        assert_eq!(anim.total_duration(), Duration::from_millis(400));
        assert!(!anim.is_finished(Duration::from_millis(399)));
        assert!(anim.is_finished(Duration::from_millis(400)));
    }

    #[test]
    fn test_interpolated_midpoint() {
        let point = animation().interpolated_at(Duration::from_millis(100)).unwrap();
        assert!((point.lat - 16.805).abs() < 1e-9);
        assert!((point.lng - 96.105).abs() < 1e-9);
    }

    #[test]
    fn test_frames_follow_step() {
        let path = Polyline::new(vec![Point::new(16.80, 96.10), Point::new(16.81, 96.11)]);
        let frames: Vec<Frame> = MarkerAnimation::new(&path, Duration::from_millis(50))
            .frames()
            .collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].at_ms, 0);
        assert_eq!(frames[1].at_ms, 50);
        assert_eq!(frames[1].position, Point::new(16.81, 96.11));
    }

    #[test]
    fn test_empty_path() {
        let anim = MarkerAnimation::new(&Polyline::default(), DEFAULT_STEP);
        assert_eq!(anim.position_at(Duration::ZERO), None);
        assert_eq!(anim.interpolated_at(Duration::ZERO), None);
        assert!(anim.is_finished(Duration::ZERO));
        assert_eq!(anim.frames().count(), 0);
    }
}
