//! Point generation for tileable sample assets.
//!
//! This module hosts the [`grid::SpatialGrid`] acceleration structure, the
//! Bridson-style [`poisson_disk::PoissonDiskSampling`] generator, the
//! [`blue_noise::BlueNoiseOrderer`] that assigns priorities, and the persisted
//! [`asset::SamplePointAsset`] record built from both.
use rand::Rng;

pub mod asset;
pub mod blue_noise;
pub mod grid;
pub mod poisson_disk;

pub use asset::{AssetGenerationSettings, SamplePointAsset};
pub use blue_noise::{BlueNoiseOrderer, SampleRecord};
pub use grid::SpatialGrid;
pub use poisson_disk::PoissonDiskSampling;

/// How coordinates leaving the domain are brought back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapMode {
    /// Saturate coordinates to `[0, dimension]`; distances are Euclidean.
    Clamp,
    /// Treat the domain as a torus; coordinates and distances wrap at the edges.
    #[default]
    WrapAround,
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    // 24 random bits fill the f32 mantissa exactly, so the result never rounds up to 1.
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Generate a random float in the range [lo, hi).
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    let value = lo + rand01(rng) * (hi - lo);
    if value >= hi && hi > lo {
        hi.next_down()
    } else {
        value
    }
}

/// Generate a uniformly distributed index in `0..len`. `len` must be > 0.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, len: usize) -> usize {
    debug_assert!(len > 0, "len must be > 0");
    (((rng.next_u32() as u64) * (len as u64)) >> 32) as usize
}

/// Creates a deterministic seed for the `index`-th item derived from a base seed.
pub fn seed_for_index(base_seed: u64, index: u64) -> u64 {
    mix_u64(base_seed ^ index.wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..1.0).contains(&result),
                "rand01({value}) = {result} is out of range"
            );
        }
    }

    #[test]
    fn rand_index_stays_below_len() {
        for value in [0, 1, u32::MAX / 3, u32::MAX] {
            let mut rng = FixedRng { value };
            for len in [1usize, 2, 7, 1000] {
                assert!(rand_index(&mut rng, len) < len);
            }
        }
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut rng, 10), 9);
    }

    #[test]
    fn rand_range_maps_into_interval() {
        let mut rng = FixedRng {
            value: u32::MAX / 2,
        };
        let v = rand_range(&mut rng, 2.0, 4.0);
        assert!((v - 3.0).abs() < 1e-3);
    }

    #[test]
    fn largest_draw_stays_below_upper_bound() {
        let mut rng = FixedRng { value: u32::MAX };
        assert!(rand01(&mut rng) < 1.0);
        for (lo, hi) in [(1.0, 2.0), (0.25, 0.5), (0.0, 3.0), (0.01, 0.02)] {
            let v = rand_range(&mut rng, lo, hi);
            assert!(v >= lo && v < hi, "rand_range({lo}, {hi}) = {v}");
        }
        assert_eq!(rand_range(&mut rng, 0.5, 0.5), 0.5);
    }

    #[test]
    fn seed_for_index_is_stable_and_distinct() {
        assert_eq!(seed_for_index(7, 3), seed_for_index(7, 3));
        assert_ne!(seed_for_index(7, 3), seed_for_index(7, 4));
        assert_ne!(seed_for_index(7, 3), seed_for_index(8, 3));
    }
}
