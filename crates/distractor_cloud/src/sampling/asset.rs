//! Tileable sample point assets: prioritized blue-noise point sets with their extent.
//!
//! Assets are generated once (typically offline, possibly on a worker thread)
//! and handed to the placement projector as plain immutable data. Persisting
//! them is left to the host; with the `serde` feature the record derives
//! `Serialize`/`Deserialize`.
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::error::{Error, Result};
use crate::sampling::blue_noise::{BlueNoiseOrderer, SampleRecord};
use crate::sampling::poisson_disk::PoissonDiskSampling;
use crate::sampling::seed_for_index;

/// Settings for generating a [`SamplePointAsset`].
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetGenerationSettings {
    /// Extent of the generated tile.
    pub dimensions: Vec2,
    /// Poisson disk parameters; `max_attempts` is also used per ordering step.
    pub sampling: PoissonDiskSampling,
    /// Seed for the shared random stream.
    pub seed: u64,
}

impl Default for AssetGenerationSettings {
    fn default() -> Self {
        Self {
            dimensions: Vec2::ONE,
            sampling: PoissonDiskSampling::new(0.01),
            seed: 0,
        }
    }
}

impl AssetGenerationSettings {
    pub fn new(dimensions: Vec2, sampling: PoissonDiskSampling) -> Self {
        Self {
            dimensions,
            sampling,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sampling.validate(self.dimensions)
    }
}

/// A prioritized point set over `[0, dimensions.x) x [0, dimensions.y)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePointAsset {
    pub points: Vec<SampleRecord>,
    pub dimensions: Vec2,
    /// Minimum separation the points were generated with.
    pub radius: f32,
}

impl SamplePointAsset {
    /// Wrap externally loaded data.
    pub fn from_parts(points: Vec<SampleRecord>, dimensions: Vec2, radius: f32) -> Self {
        Self {
            points,
            dimensions,
            radius,
        }
    }

    /// Generate an asset: Poisson disk sampling followed by blue-noise ordering on one random stream.
    pub fn generate(settings: &AssetGenerationSettings) -> Result<Self> {
        settings.validate()?;
        let mut rng = StdRng::seed_from_u64(settings.seed);

        let points = settings
            .sampling
            .generate_with_rng(settings.dimensions, &mut rng)?;
        let records = BlueNoiseOrderer::new(settings.sampling.max_attempts)
            .order_with_rng(points, &mut rng)?;

        info!(
            points = records.len(),
            width = settings.dimensions.x,
            height = settings.dimensions.y,
            radius = settings.sampling.radius,
            "Generated sample point asset."
        );

        Ok(Self {
            points: records,
            dimensions: settings.dimensions,
            radius: settings.sampling.radius,
        })
    }

    /// Generate `count` assets whose seeds are derived from `settings.seed`.
    pub fn generate_batch(settings: &AssetGenerationSettings, count: usize) -> Result<Vec<Self>> {
        (0..count as u64)
            .map(|i| {
                let settings = settings.clone().with_seed(seed_for_index(settings.seed, i));
                Self::generate(&settings)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points per unit area; zero for a degenerate extent.
    pub fn density(&self) -> f32 {
        let area = self.dimensions.x * self.dimensions.y;
        if area > 0.0 {
            self.points.len() as f32 / area
        } else {
            0.0
        }
    }

    /// Uniformly rescale so that the generation radius becomes `new_radius`.
    ///
    /// A stored radius of zero is treated as one. Priorities are kept.
    pub fn scaled(&self, new_radius: f32) -> Result<Self> {
        if !new_radius.is_finite() || new_radius <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "scale radius must be > 0, got {new_radius}"
            )));
        }
        let radius = if self.radius == 0.0 { 1.0 } else { self.radius };
        let factor = new_radius / radius;

        Ok(Self {
            points: self
                .points
                .iter()
                .map(|r| SampleRecord::new(r.point * factor, r.priority))
                .collect(),
            dimensions: self.dimensions * factor,
            radius: new_radius,
        })
    }

    /// Keep the points inside `[min, max]` (inclusive), re-based to `min`.
    pub fn cropped(&self, min: Vec2, max: Vec2) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|r| r.point.cmpge(min).all() && r.point.cmple(max).all())
                .map(|r| SampleRecord::new(r.point - min, r.priority))
                .collect(),
            dimensions: max - min,
            radius: self.radius,
        }
    }
}
