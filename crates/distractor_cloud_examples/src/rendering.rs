use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// A raster that maps a world-space rectangle onto image pixels.
///
/// World Y points up; image rows grow downwards.
pub struct Canvas {
    image: RgbImage,
    world_min: Vec2,
    world_extent: Vec2,
}

impl Canvas {
    pub fn new(size_px: (u32, u32), world_min: Vec2, world_extent: Vec2, background: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(size_px.0.max(1), size_px.1.max(1), Rgb(background)),
            world_min,
            world_extent: world_extent.max(Vec2::splat(f32::EPSILON)),
        }
    }

    fn to_px(&self, world: Vec2) -> Vec2 {
        let uv = (world - self.world_min) / self.world_extent;
        Vec2::new(
            uv.x * self.image.width() as f32,
            (1.0 - uv.y) * self.image.height() as f32,
        )
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    /// Filled circle of `radius_px` pixels centered on a world position.
    pub fn dot(&mut self, world: Vec2, radius_px: i64, color: [u8; 3]) {
        let center = self.to_px(world);
        let (cx, cy) = (center.x as i64, center.y as i64);
        for dy in -radius_px..=radius_px {
            for dx in -radius_px..=radius_px {
                if dx * dx + dy * dy <= radius_px * radius_px {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Filled axis-aligned world rectangle.
    pub fn rect(&mut self, min: Vec2, max: Vec2, color: [u8; 3]) {
        let a = self.to_px(Vec2::new(min.x, max.y));
        let b = self.to_px(Vec2::new(max.x, min.y));
        for y in a.y as i64..b.y.ceil() as i64 {
            for x in a.x as i64..b.x.ceil() as i64 {
                self.put(x, y, color);
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.image.save(path.as_ref())?;
        tracing::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

/// Warm for high priority, cool for low.
pub fn priority_color(priority: f32) -> [u8; 3] {
    let p = priority.clamp(0.0, 1.0);
    [
        (40.0 + 215.0 * p) as u8,
        (90.0 + 120.0 * (1.0 - (2.0 * p - 1.0).abs())) as u8,
        (255.0 - 215.0 * p) as u8,
    ]
}

/// Alternating palette so neighboring groups are distinguishable.
pub fn group_color(group: usize) -> [u8; 3] {
    const PALETTE: [[u8; 3]; 4] = [
        [240, 200, 90],
        [90, 190, 240],
        [230, 110, 120],
        [140, 220, 140],
    ];
    PALETTE[group % PALETTE.len()]
}
