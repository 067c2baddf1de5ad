//! Poisson disk position sampling (Bridson) with optional toroidal wrapping.
use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sampling::grid::SpatialGrid;
use crate::sampling::{rand01, rand_index, rand_range, WrapMode};

/// Poisson disk sampling strategy over `[0, width) x [0, height)`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples in world units.
    pub radius: f32,
    /// Candidate attempts per active point before it is retired.
    pub max_attempts: usize,
    /// Multiply `max_attempts` by the current point count on every step.
    pub grow_attempts: bool,
    /// Edge handling for candidates and distances.
    pub wrap_mode: WrapMode,
}

impl Default for PoissonDiskSampling {
    fn default() -> Self {
        Self {
            radius: 1.0,
            max_attempts: 30,
            grow_attempts: false,
            wrap_mode: WrapMode::WrapAround,
        }
    }
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with specified radius.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_grow_attempts(mut self, grow_attempts: bool) -> Self {
        self.grow_attempts = grow_attempts;
        self
    }

    pub fn with_wrap_mode(mut self, wrap_mode: WrapMode) -> Self {
        self.wrap_mode = wrap_mode;
        self
    }

    /// Validates radius and domain extent.
    pub fn validate(&self, domain_extent: Vec2) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "radius must be > 0, got {}",
                self.radius
            )));
        }
        if domain_extent.x <= 0.0 || domain_extent.y <= 0.0 || !domain_extent.is_finite() {
            return Err(Error::InvalidParameters(format!(
                "domain extent must be > 0 in both components, got {domain_extent}"
            )));
        }
        Ok(())
    }

    /// Generate a point set from a seed. Same seed and parameters yield the same sequence.
    pub fn generate(&self, domain_extent: Vec2, seed: u64) -> Result<Vec<Vec2>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(domain_extent, &mut rng)
    }

    /// Generate a point set drawing from an existing random stream.
    pub fn generate_with_rng(&self, domain_extent: Vec2, rng: &mut dyn Rng) -> Result<Vec<Vec2>> {
        self.validate(domain_extent)?;
        let sampler = PoissonDiskSampler::new(self, domain_extent)?;
        Ok(sampler.generate(rng))
    }
}

struct PoissonDiskSampler {
    radius: f32,
    radius_squared: f32,
    max_attempts: usize,
    grow_attempts: bool,
    wrap_mode: WrapMode,
    bounds: Vec2,
    grid: SpatialGrid,
    /// Cells to search around a candidate so every point closer than `radius` is seen.
    window: usize,
    points: Vec<Vec2>,
    active_list: Vec<usize>,
}

impl PoissonDiskSampler {
    fn new(settings: &PoissonDiskSampling, bounds: Vec2) -> Result<Self> {
        let grid = SpatialGrid::for_radius(bounds.x, bounds.y, settings.radius, settings.wrap_mode)?;
        Ok(Self {
            radius: settings.radius,
            radius_squared: settings.radius * settings.radius,
            max_attempts: settings.max_attempts.max(1),
            grow_attempts: settings.grow_attempts,
            wrap_mode: settings.wrap_mode,
            bounds,
            window: grid.window_radius_for(settings.radius),
            points: Vec::with_capacity(grid.len()),
            active_list: Vec::new(),
            grid,
        })
    }

    fn restrict(&self, point: Vec2) -> Vec2 {
        match self.wrap_mode {
            WrapMode::Clamp => point.clamp(Vec2::ZERO, self.bounds),
            WrapMode::WrapAround => Vec2::new(
                wrap_coordinate(point.x, self.bounds.x),
                wrap_coordinate(point.y, self.bounds.y),
            ),
        }
    }

    #[inline]
    fn distance_squared(&self, a: Vec2, b: Vec2) -> f32 {
        let d = (a - b).abs();
        match self.wrap_mode {
            WrapMode::Clamp => d.length_squared(),
            WrapMode::WrapAround => d.min(self.bounds - d).length_squared(),
        }
    }

    fn is_valid_point(&self, candidate: Vec2) -> bool {
        if self.grid.get(self.grid.cell_index_for(candidate)).is_some() {
            return false;
        }

        !self
            .grid
            .neighbors_in_window(candidate, self.window)
            .any(|i| self.distance_squared(self.points[i], candidate) < self.radius_squared)
    }

    fn add_point(&mut self, point: Vec2) {
        let index = self.points.len();
        let cell = self.grid.cell_index_for(point);
        self.grid.set(cell, index);
        self.active_list.push(index);
        self.points.push(point);
    }

    fn generate_around_point(&self, rng: &mut dyn Rng, origin: Vec2) -> Option<Vec2> {
        let attempts = if self.grow_attempts {
            self.max_attempts.saturating_mul(self.points.len())
        } else {
            self.max_attempts
        };

        for _ in 0..attempts {
            let angle = rand01(rng) * TAU;
            let distance = rand_range(rng, self.radius, 2.0 * self.radius);
            let candidate = self.restrict(origin + Vec2::from_angle(angle) * distance);

            if self.is_valid_point(candidate) {
                return Some(candidate);
            }
        }

        None
    }

    fn generate(mut self, rng: &mut dyn Rng) -> Vec<Vec2> {
        let initial =
            self.restrict(Vec2::new(rand01(rng) * self.bounds.x, rand01(rng) * self.bounds.y));
        self.add_point(initial);

        let mut retired = 0usize;
        while !self.active_list.is_empty() {
            let slot = rand_index(rng, self.active_list.len());
            let origin = self.points[self.active_list[slot]];

            match self.generate_around_point(rng, origin) {
                Some(p) => self.add_point(p),
                None => {
                    self.active_list.swap_remove(slot);
                    retired += 1;
                }
            }
        }

        debug!(
            points = self.points.len(),
            retired,
            cells = self.grid.len(),
            "poisson disk generation finished"
        );
        self.points
    }
}

#[inline]
fn wrap_coordinate(value: f32, dimension: f32) -> f32 {
    let wrapped = value.rem_euclid(dimension);
    // rem_euclid can round up to `dimension` for tiny negative inputs.
    if wrapped >= dimension {
        0.0
    } else {
        wrapped
    }
}
