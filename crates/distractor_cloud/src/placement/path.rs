//! Path geometry consumed by the projector.
//!
//! Curve evaluation belongs to the host; these types only cover straight and
//! piecewise-linear paths so the crate can be driven without an engine.
use glam::Vec3;

use crate::error::{Error, Result};

/// A path parameterized by `t` in `[0, 1]` from start to end.
pub trait PathEvaluator {
    /// Total arc length in world units.
    fn length(&self) -> f32;

    /// World position at path parameter `t`.
    fn evaluate_position(&self, t: f32) -> Vec3;
}

impl<P: PathEvaluator + ?Sized> PathEvaluator for &P {
    fn length(&self) -> f32 {
        (**self).length()
    }

    fn evaluate_position(&self, t: f32) -> Vec3 {
        (**self).evaluate_position(t)
    }
}

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightPath {
    pub start: Vec3,
    pub end: Vec3,
}

impl StraightPath {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// A path of `length` units starting at the origin and running along +X.
    pub fn along_x(length: f32) -> Self {
        Self::new(Vec3::ZERO, Vec3::new(length, 0.0, 0.0))
    }
}

impl PathEvaluator for StraightPath {
    fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    fn evaluate_position(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t.clamp(0.0, 1.0))
    }
}

/// Piecewise-linear path through a list of waypoints, parameterized by arc length.
#[derive(Debug, Clone)]
pub struct PolylinePath {
    waypoints: Vec<Vec3>,
    /// Arc length at each waypoint; starts at 0.
    cumulative: Vec<f32>,
}

impl PolylinePath {
    pub fn new(waypoints: Vec<Vec3>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(Error::InvalidParameters(format!(
                "polyline needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }

        let mut cumulative = Vec::with_capacity(waypoints.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in waypoints.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }

        if total <= 0.0 || !total.is_finite() {
            return Err(Error::InvalidParameters(format!(
                "polyline length must be > 0, got {total}"
            )));
        }

        Ok(Self {
            waypoints,
            cumulative,
        })
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }
}

impl PathEvaluator for PolylinePath {
    fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn evaluate_position(&self, t: f32) -> Vec3 {
        let target = t.clamp(0.0, 1.0) * self.length();
        let segment = self
            .cumulative
            .partition_point(|&d| d <= target)
            .clamp(1, self.waypoints.len() - 1);

        let (d0, d1) = (self.cumulative[segment - 1], self.cumulative[segment]);
        let span = d1 - d0;
        let local = if span > 0.0 { (target - d0) / span } else { 0.0 };
        self.waypoints[segment - 1].lerp(self.waypoints[segment], local)
    }
}
