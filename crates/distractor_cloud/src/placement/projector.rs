//! Projection of tileable sample assets onto paths.
//!
//! Each path receives one randomly chosen asset. The asset is rescaled to the
//! configured minimum radius, a horizontal band of `band_height` is cropped at a
//! random vertical offset, and the band is stretched horizontally until its point
//! density matches the target density. The stretched band is then tiled along the
//! normalized path parameter. Points landing in the gap part of a fill/gap period,
//! or beyond the last group, are dropped; kept points carry their group index and
//! blue-noise priority.
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::placement::path::{PathEvaluator, StraightPath};
use crate::sampling::asset::SamplePointAsset;
use crate::sampling::{rand_index, rand_range};

/// Fill/gap banding along the path, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacing {
    /// Length of the populated part of each period.
    pub fill_width: f32,
    /// Length of the empty part following each fill.
    pub gap_width: f32,
}

impl Spacing {
    pub fn new(fill_width: f32, gap_width: f32) -> Self {
        Self {
            fill_width,
            gap_width,
        }
    }

    #[inline]
    pub fn period(&self) -> f32 {
        self.fill_width + self.gap_width
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new(6.0, 4.0)
    }
}

/// Configuration for [`PathSampleProjector`].
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionConfig {
    pub spacing: Spacing,
    /// Height of the band cropped out of the sample asset.
    pub band_height: f32,
    /// Minimum distance between placements; assets are rescaled to it.
    pub min_radius: f32,
    /// Target placements per unit area.
    pub density: f32,
    /// Explicit group count; derived from the longest path when `None`.
    pub group_count: Option<usize>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            spacing: Spacing::default(),
            band_height: 1.0,
            min_radius: 0.1,
            density: 20.0,
            group_count: None,
        }
    }
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_band_height(mut self, band_height: f32) -> Self {
        self.band_height = band_height;
        self
    }

    pub fn with_min_radius(mut self, min_radius: f32) -> Self {
        self.min_radius = min_radius;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_group_count(mut self, group_count: usize) -> Self {
        self.group_count = Some(group_count);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.spacing.fill_width) {
            return Err(Error::InvalidParameters("fill_width must be > 0".into()));
        }
        if !self.spacing.gap_width.is_finite() || self.spacing.gap_width < 0.0 {
            return Err(Error::InvalidParameters("gap_width must be >= 0".into()));
        }
        if !positive(self.band_height) {
            return Err(Error::InvalidParameters("band_height must be > 0".into()));
        }
        if !positive(self.min_radius) {
            return Err(Error::InvalidParameters("min_radius must be > 0".into()));
        }
        if !positive(self.density) {
            return Err(Error::InvalidParameters("density must be > 0".into()));
        }
        Ok(())
    }
}

/// A placement produced by the projector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPoint {
    /// Normalized path parameter in `[0, 1]`.
    pub t: f32,
    /// World position: path position raised by the sample's band offset.
    pub position: Vec3,
    /// Fill band index along the path.
    pub group: usize,
    /// Blue-noise priority carried over from the sample asset.
    pub priority: f32,
    /// Index of the path this placement belongs to.
    pub path_index: usize,
}

/// Group index for a path parameter, or `None` when the position must be dropped.
///
/// A position is dropped when `t` lies outside `[0, 1]`, when it falls in the
/// gap part of its period, or when its group is not below `group_count`.
pub fn classify_path_position(
    t: f32,
    path_length: f32,
    spacing: Spacing,
    group_count: usize,
) -> Option<usize> {
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let period = spacing.period();
    let distance = t * path_length;
    let group = (distance / period).floor() as usize;
    let within_period = distance % period;

    if group >= group_count || within_period > spacing.fill_width {
        return None;
    }
    Some(group)
}

/// Tiles sample assets along paths and assigns groups.
#[derive(Debug, Clone, Default)]
pub struct PathSampleProjector {
    pub config: ProjectionConfig,
}

impl PathSampleProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn try_new(config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Number of groups for a set of path lengths: the explicit override or the
    /// largest count of whole periods fitting on any path.
    pub fn group_count_for<I>(&self, path_lengths: I) -> usize
    where
        I: IntoIterator<Item = f32>,
    {
        if let Some(count) = self.config.group_count {
            return count;
        }
        let period = self.config.spacing.period();
        path_lengths
            .into_iter()
            .map(|len| (len / period).floor().max(0.0) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Project onto a straight path of `path_length` running along +X.
    pub fn project_length(
        &self,
        path_length: f32,
        asset: &SamplePointAsset,
        rng: &mut dyn Rng,
    ) -> Result<Vec<PlacementPoint>> {
        let path = StraightPath::along_x(path_length);
        self.project(&[&path], std::slice::from_ref(asset), rng)
    }

    /// Project with a fresh random stream seeded with `seed`.
    pub fn project_seeded(
        &self,
        paths: &[&dyn PathEvaluator],
        assets: &[SamplePointAsset],
        seed: u64,
    ) -> Result<Vec<PlacementPoint>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.project(paths, assets, &mut rng)
    }

    /// Project one randomly chosen asset onto every path.
    pub fn project(
        &self,
        paths: &[&dyn PathEvaluator],
        assets: &[SamplePointAsset],
        rng: &mut dyn Rng,
    ) -> Result<Vec<PlacementPoint>> {
        self.config.validate()?;
        if paths.is_empty() {
            return Err(Error::EmptyInputSet("no paths to project onto".into()));
        }
        if assets.is_empty() {
            return Err(Error::EmptyInputSet("no sample assets".into()));
        }
        if let Some(index) = assets.iter().position(SamplePointAsset::is_empty) {
            return Err(Error::EmptyInputSet(format!(
                "sample asset {index} has no points"
            )));
        }

        let mut lengths = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let length = path.length();
            if !length.is_finite() || length <= 0.0 {
                return Err(Error::InvalidParameters(format!(
                    "path {index} has non-positive length {length}"
                )));
            }
            lengths.push(length);
        }

        let group_count = self.group_count_for(lengths.iter().copied());
        if group_count == 0 {
            warn!(
                "Paths are shorter than one fill/gap period ({}); no placements possible.",
                self.config.spacing.period()
            );
        }

        let mut placements = Vec::new();
        for (path_index, (path, length)) in paths.iter().zip(lengths).enumerate() {
            let asset = &assets[rand_index(rng, assets.len())];
            let band = self.crop_band(asset, rng)?;
            self.project_band(path_index, *path, length, &band, group_count, &mut placements);
        }

        Ok(placements)
    }

    /// Rescale `asset` to the minimum radius and crop a band at a random height.
    fn crop_band(&self, asset: &SamplePointAsset, rng: &mut dyn Rng) -> Result<SamplePointAsset> {
        let band_height = self.config.band_height;
        let scaled = asset.scaled(self.config.min_radius)?;
        if scaled.dimensions.y < band_height {
            return Err(Error::AssetTooSmall {
                required: band_height,
                available: scaled.dimensions.y,
            });
        }

        let offset = rand_range(rng, 0.0, scaled.dimensions.y - band_height);
        Ok(scaled.cropped(
            Vec2::new(0.0, offset),
            Vec2::new(scaled.dimensions.x, offset + band_height),
        ))
    }

    fn project_band(
        &self,
        path_index: usize,
        path: &dyn PathEvaluator,
        path_length: f32,
        band: &SamplePointAsset,
        group_count: usize,
        out: &mut Vec<PlacementPoint>,
    ) {
        if band.is_empty() {
            warn!("Path {}: cropped sample band has no points; skipping.", path_index);
            return;
        }

        let spacing = self.config.spacing;
        // Stretch the band until it is no denser than the target; it is never compressed
        // because that would break the minimum radius.
        let band_width =
            (band.density() / self.config.density * band.dimensions.x).max(band.dimensions.x);
        let repeats_exact = path_length / band_width;
        let repeats = repeats_exact.ceil() as usize;
        let t_per_repeat = 1.0 / repeats_exact;

        let before = out.len();
        let mut rejected = 0usize;
        for repeat in 0..repeats {
            let t_start = t_per_repeat * repeat as f32;
            for record in &band.points {
                let t = t_start + t_per_repeat * (record.point.x / band.dimensions.x);
                let Some(group) = classify_path_position(t, path_length, spacing, group_count)
                else {
                    rejected += 1;
                    continue;
                };

                out.push(PlacementPoint {
                    t,
                    position: path.evaluate_position(t) + Vec3::Y * record.point.y,
                    group,
                    priority: record.priority,
                    path_index,
                });
            }
        }

        let placed = out.len() - before;
        let groups_on_path = path_length / spacing.period();
        let fill_area = groups_on_path * spacing.fill_width * self.config.band_height;
        debug!(path_index, repeats, band_width, rejected, "projected sample band");
        info!(
            "Path {}: {} placements, density {:.2} per unit area.",
            path_index,
            placed,
            if fill_area > 0.0 { placed as f32 / fill_area } else { 0.0 }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::asset::AssetGenerationSettings;
    use crate::sampling::blue_noise::SampleRecord;
    use crate::sampling::poisson_disk::PoissonDiskSampling;

    fn row_asset() -> SamplePointAsset {
        // Ten points in a 10 x 1 tile, density 1.
        SamplePointAsset::from_parts(
            (0..10)
                .map(|i| {
                    SampleRecord::new(
                        Vec2::new(i as f32 + 0.5, 0.5),
                        (10 - i) as f32 / 10.0,
                    )
                })
                .collect(),
            Vec2::new(10.0, 1.0),
            0.1,
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn classification_matches_fill_and_gap_bands() {
        let spacing = Spacing::new(6.0, 4.0);
        assert_eq!(classify_path_position(0.05, 100.0, spacing, 10), Some(0));
        assert_eq!(classify_path_position(0.08, 100.0, spacing, 10), None);
        assert_eq!(classify_path_position(0.65, 100.0, spacing, 7), Some(6));
        assert_eq!(classify_path_position(0.65, 100.0, spacing, 6), None);
        assert_eq!(classify_path_position(-0.01, 100.0, spacing, 10), None);
        assert_eq!(classify_path_position(1.01, 100.0, spacing, 10), None);
    }

    #[test]
    fn group_and_fill_test_share_one_distance() {
        let spacing = Spacing::new(6.0, 4.0);
        let path_length = 37.0;
        for i in 0..=10_000 {
            let t = i as f32 / 10_000.0;
            let distance = t * path_length;
            match classify_path_position(t, path_length, spacing, 100) {
                Some(group) => {
                    let start = group as f32 * spacing.period();
                    assert!(
                        distance >= start && distance - start <= spacing.fill_width + 1e-4,
                        "t {t}: distance {distance} tagged with group {group}"
                    );
                }
                None => assert!(distance % spacing.period() > spacing.fill_width),
            }
        }
        // Exactly on a period boundary the point opens the next fill.
        assert_eq!(classify_path_position(0.5, 20.0, spacing, 2), Some(1));
    }

    #[test]
    fn group_count_uses_longest_path_or_override() {
        let projector = PathSampleProjector::default();
        assert_eq!(projector.group_count_for([100.0, 57.0]), 10);
        assert_eq!(projector.group_count_for([9.0]), 0);

        let fixed = PathSampleProjector::new(ProjectionConfig::new().with_group_count(7));
        assert_eq!(fixed.group_count_for([100.0]), 7);
    }

    #[test]
    fn matching_density_tiles_band_without_stretching() {
        let projector = PathSampleProjector::new(
            ProjectionConfig::new().with_density(1.0),
        );
        let placements = projector
            .project_length(20.0, &row_asset(), &mut rng())
            .unwrap();

        let groups: Vec<usize> = placements.iter().map(|p| p.group).collect();
        assert_eq!(groups, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1]);
        for p in &placements {
            assert!((p.position.x - p.t * 20.0).abs() < 1e-4);
            assert!((p.position.y - 0.5).abs() < 1e-6);
        }
        assert_eq!(placements[0].priority, 1.0);
    }

    #[test]
    fn lower_target_density_stretches_band() {
        let projector = PathSampleProjector::new(
            ProjectionConfig::new().with_density(0.5),
        );
        let placements = projector
            .project_length(20.0, &row_asset(), &mut rng())
            .unwrap();

        let xs: Vec<f32> = placements.iter().map(|p| p.position.x.round()).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0, 11.0, 13.0, 15.0]);
    }

    #[test]
    fn generated_asset_respects_bands_and_density() {
        let asset = SamplePointAsset::generate(
            &AssetGenerationSettings::new(Vec2::ONE, PoissonDiskSampling::new(0.02)).with_seed(4),
        )
        .unwrap();
        let config = ProjectionConfig::new().with_density(20.0);
        let projector = PathSampleProjector::new(config.clone());
        let path_length = 100.0;
        let placements = projector
            .project_length(path_length, &asset, &mut rng())
            .unwrap();

        assert!(!placements.is_empty());
        for p in &placements {
            assert!((0.0..=1.0).contains(&p.t));
            assert!(p.group < 10);
            assert!((p.t * path_length) % 10.0 <= 6.0);
            assert!(p.position.y >= 0.0 && p.position.y <= config.band_height);
        }

        let fill_area = 10.0 * 6.0 * config.band_height;
        let density = placements.len() as f32 / fill_area;
        assert!(
            (density - 20.0).abs() < 5.0,
            "density {density} too far from target"
        );
    }

    #[test]
    fn projection_is_deterministic_per_seed() {
        let projector = PathSampleProjector::new(ProjectionConfig::new().with_density(1.0));
        let path = StraightPath::along_x(30.0);
        let assets = [row_asset()];
        let a = projector.project_seeded(&[&path], &assets, 5).unwrap();
        let b = projector.project_seeded(&[&path], &assets, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn multiple_paths_share_group_count() {
        let projector = PathSampleProjector::new(ProjectionConfig::new().with_density(1.0));
        let long = StraightPath::along_x(30.0);
        let short = StraightPath::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(20.0, 0.0, 5.0));
        let placements = projector
            .project_seeded(&[&long, &short], &[row_asset()], 1)
            .unwrap();

        assert!(placements.iter().any(|p| p.path_index == 0 && p.group == 2));
        assert!(placements
            .iter()
            .filter(|p| p.path_index == 1)
            .all(|p| p.position.z == 5.0 && p.group < 2));
    }

    #[test]
    fn too_small_asset_is_rejected() {
        let projector = PathSampleProjector::new(ProjectionConfig::new().with_band_height(2.0));
        let err = projector
            .project_length(20.0, &row_asset(), &mut rng())
            .unwrap_err();
        assert!(matches!(err, Error::AssetTooSmall { .. }));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let projector = PathSampleProjector::default();
        let path = StraightPath::along_x(20.0);
        assert!(matches!(
            projector.project(&[], &[row_asset()], &mut rng()),
            Err(Error::EmptyInputSet(_))
        ));
        assert!(matches!(
            projector.project(&[&path], &[], &mut rng()),
            Err(Error::EmptyInputSet(_))
        ));
        let empty = SamplePointAsset::from_parts(Vec::new(), Vec2::ONE, 0.1);
        assert!(matches!(
            projector.project(&[&path], &[empty], &mut rng()),
            Err(Error::EmptyInputSet(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(PathSampleProjector::try_new(ProjectionConfig::new().with_density(0.0)).is_err());
        assert!(PathSampleProjector::try_new(
            ProjectionConfig::new().with_spacing(Spacing::new(0.0, 1.0))
        )
        .is_err());
        assert!(PathSampleProjector::try_new(ProjectionConfig::new().with_min_radius(-1.0)).is_err());
        assert!(PathSampleProjector::try_new(ProjectionConfig::default()).is_ok());
    }
}
