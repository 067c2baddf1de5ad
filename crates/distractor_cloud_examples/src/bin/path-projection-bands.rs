use distractor_cloud::prelude::*;
use distractor_cloud_examples::{group_color, init_tracing, Canvas};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings =
        AssetGenerationSettings::new(Vec2::ONE, PoissonDiskSampling::new(0.01)).with_seed(7);
    let assets = SamplePointAsset::generate_batch(&settings, 3)?;

    let path = PolylinePath::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(30.0, 3.0, 0.0),
        Vec3::new(60.0, -2.0, 0.0),
        Vec3::new(100.0, 2.0, 0.0),
    ])?;

    let projector = PathSampleProjector::try_new(
        ProjectionConfig::new()
            .with_spacing(Spacing::new(6.0, 4.0))
            .with_band_height(1.5)
            .with_density(20.0),
    )?;
    let mut rng = StdRng::seed_from_u64(11);
    let placements = projector.project(&[&path], &assets, &mut rng)?;

    let groups = placements.iter().map(|p| p.group + 1).max().unwrap_or(0);
    tracing::info!(placements = placements.len(), groups, "Projected assets onto path.");

    // Three distractor variants; high priorities favor the first one.
    let variant_weights = [0.5, 0.3, 0.2];
    let variant_radius = [3, 2, 1];

    let mut canvas = Canvas::new(
        (2000, 160),
        Vec2::new(0.0, -4.0),
        Vec2::new(105.0, 8.4),
        [22, 24, 30],
    );
    // Fill zones, approximately: the path runs mostly along X.
    let spacing = projector.config.spacing;
    for group in 0..groups {
        let start = group as f32 * spacing.period();
        canvas.rect(
            Vec2::new(start, -4.0),
            Vec2::new(start + spacing.fill_width, 4.4),
            [32, 34, 44],
        );
    }
    for sample in 0..=1000 {
        let p = path.evaluate_position(sample as f32 / 1000.0);
        canvas.dot(Vec2::new(p.x, p.y), 0, [70, 70, 80]);
    }
    for placement in &placements {
        let variant = pick_kind_by_priority(&variant_weights, placement.priority).unwrap_or(0);
        canvas.dot(
            Vec2::new(placement.position.x, placement.position.y),
            variant_radius[variant],
            group_color(placement.group),
        );
    }
    canvas.save("path-projection-bands.png")?;

    Ok(())
}
