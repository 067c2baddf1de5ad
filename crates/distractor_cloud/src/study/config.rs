use crate::error::{Error, Result};
use crate::placement::projector::ProjectionConfig;

/// Search difficulty; selects the distractor density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskLoad {
    #[default]
    Low,
    High,
}

/// Configuration of a study session.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudyConfig {
    /// Number of targets to present before the study ends.
    pub trial_count: usize,
    /// Groups spawned ahead of the current one when not spawning everything up front.
    pub max_group_span: Option<usize>,
    pub spawn_all_groups_at_start: bool,
    /// Placements per unit area for [`TaskLoad::Low`].
    pub low_density: f32,
    /// Placements per unit area for [`TaskLoad::High`].
    pub high_density: f32,
    pub projection: ProjectionConfig,
    /// Seed for target selection.
    pub seed: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            trial_count: 20,
            max_group_span: Some(2),
            spawn_all_groups_at_start: true,
            low_density: 20.0,
            high_density: 40.0,
            projection: ProjectionConfig::default(),
            seed: 0,
        }
    }
}

impl StudyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trial_count(mut self, trial_count: usize) -> Self {
        self.trial_count = trial_count;
        self
    }

    pub fn with_max_group_span(mut self, max_group_span: Option<usize>) -> Self {
        self.max_group_span = max_group_span;
        self
    }

    pub fn with_spawn_all_groups_at_start(mut self, spawn_all: bool) -> Self {
        self.spawn_all_groups_at_start = spawn_all;
        self
    }

    pub fn with_densities(mut self, low: f32, high: f32) -> Self {
        self.low_density = low;
        self.high_density = high;
        self
    }

    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn density_for(&self, load: TaskLoad) -> f32 {
        match load {
            TaskLoad::Low => self.low_density,
            TaskLoad::High => self.high_density,
        }
    }

    /// Projection settings with the density of `load` applied.
    pub fn projection_for(&self, load: TaskLoad) -> ProjectionConfig {
        self.projection.clone().with_density(self.density_for(load))
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.trial_count == 0 {
            return Err(Error::InvalidParameters("trial_count must be > 0".into()));
        }
        for (name, density) in [("low_density", self.low_density), ("high_density", self.high_density)] {
            if !density.is_finite() || density <= 0.0 {
                return Err(Error::InvalidParameters(format!("{name} must be > 0")));
            }
        }
        self.projection.validate()
    }
}
