use distractor_cloud::prelude::*;
use distractor_cloud_examples::{init_tracing, priority_color, Canvas};
use glam::Vec2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Tileable unit asset: wrap-around keeps the minimum distance across edges.
    let settings = AssetGenerationSettings::new(
        Vec2::ONE,
        PoissonDiskSampling::new(0.02).with_wrap_mode(WrapMode::WrapAround),
    )
    .with_seed(42);
    let asset = SamplePointAsset::generate(&settings)?;

    tracing::info!(
        points = asset.len(),
        density = asset.density(),
        "Asset ready."
    );

    // Render a 2x2 tiling to show the seams vanish.
    let mut canvas = Canvas::new((1000, 1000), Vec2::ZERO, Vec2::splat(2.0), [24, 26, 32]);
    for tile in [Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE] {
        // Low priorities first so the important points stay on top.
        for record in asset.points.iter().rev() {
            canvas.dot(tile + record.point, 3, priority_color(record.priority));
        }
    }
    canvas.save("asset-generate-basic.png")?;

    // The first tenth of the ordering on its own.
    let mut head = Canvas::new((500, 500), Vec2::ZERO, Vec2::ONE, [24, 26, 32]);
    for record in asset.points.iter().filter(|r| r.priority > 0.9) {
        head.dot(record.point, 3, [240, 235, 200]);
    }
    head.save("asset-generate-basic-top-priorities.png")?;

    Ok(())
}
