//! Blue-noise ordering of a Poisson disk point set.
//!
//! The orderer walks the point set by repeatedly drawing a handful of random
//! candidates and emitting the one closest to the previously emitted point.
//! Consecutive records therefore stay spatially close while the walk still
//! visits every point. Each record gets a priority `remaining / total`, so the
//! first record has priority 1 and the last `1 / total`.
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sampling::rand_index;

/// A sample point together with its normalized priority in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRecord {
    pub point: Vec2,
    pub priority: f32,
}

impl SampleRecord {
    pub fn new(point: Vec2, priority: f32) -> Self {
        Self { point, priority }
    }
}

/// Closest-of-random-candidates traversal that assigns priorities.
#[derive(Debug, Clone)]
pub struct BlueNoiseOrderer {
    /// Random candidates drawn per emitted point.
    pub attempts_per_step: usize,
}

impl Default for BlueNoiseOrderer {
    fn default() -> Self {
        Self {
            attempts_per_step: 30,
        }
    }
}

impl BlueNoiseOrderer {
    pub fn new(attempts_per_step: usize) -> Self {
        Self {
            attempts_per_step: attempts_per_step.max(1),
        }
    }

    /// Order `points` using a fresh random stream seeded with `seed`.
    pub fn order(&self, points: Vec<Vec2>, seed: u64) -> Result<Vec<SampleRecord>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.order_with_rng(points, &mut rng)
    }

    /// Order `points` drawing from an existing random stream.
    pub fn order_with_rng(
        &self,
        mut remaining: Vec<Vec2>,
        rng: &mut dyn Rng,
    ) -> Result<Vec<SampleRecord>> {
        if remaining.is_empty() {
            return Err(Error::EmptyInputSet(
                "blue-noise ordering needs at least one point".into(),
            ));
        }

        let attempts = self.attempts_per_step.max(1);
        let total = remaining.len() as f32;
        let mut ordered = Vec::with_capacity(remaining.len());

        let start = rand_index(rng, remaining.len());
        let priority = remaining.len() as f32 / total;
        let mut current = remaining.swap_remove(start);
        ordered.push(SampleRecord::new(current, priority));

        while !remaining.is_empty() {
            let draws = attempts.min(remaining.len());
            let mut best_index = 0;
            let mut best_distance = f32::INFINITY;

            for draw in 0..draws {
                let candidate = rand_index(rng, remaining.len());
                let distance = current.distance_squared(remaining[candidate]);
                if draw == 0 || distance < best_distance {
                    best_index = candidate;
                    best_distance = distance;
                }
            }

            let priority = remaining.len() as f32 / total;
            current = remaining.swap_remove(best_index);
            ordered.push(SampleRecord::new(current, priority));
        }

        debug!(count = ordered.len(), attempts, "blue-noise ordering finished");
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::poisson_disk::PoissonDiskSampling;
    use crate::sampling::tests::FixedRng;

    #[test]
    fn priorities_decrease_to_reciprocal_of_total() {
        let points = PoissonDiskSampling::new(0.2)
            .generate(Vec2::new(2.0, 2.0), 3)
            .unwrap();
        let total = points.len();
        let records = BlueNoiseOrderer::default().order(points, 9).unwrap();

        assert_eq!(records.len(), total);
        assert_eq!(records[0].priority, 1.0);
        assert_eq!(records[total - 1].priority, 1.0 / total as f32);
        for pair in records.windows(2) {
            assert!(pair[0].priority > pair[1].priority);
        }
    }

    #[test]
    fn output_is_a_permutation_of_input() {
        let points: Vec<Vec2> = (0..50)
            .map(|i| Vec2::new(i as f32, (i * 7 % 13) as f32))
            .collect();
        let records = BlueNoiseOrderer::new(5).order(points.clone(), 1).unwrap();

        let mut emitted: Vec<(f32, f32)> = records.iter().map(|r| (r.point.x, r.point.y)).collect();
        let mut expected: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
        emitted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(emitted, expected);
    }

    #[test]
    fn fixed_stream_follows_swap_removal() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        ];
        let mut rng = FixedRng { value: 0 };
        let records = BlueNoiseOrderer::new(3)
            .order_with_rng(points, &mut rng)
            .unwrap();

        let xs: Vec<f32> = records.iter().map(|r| r.point.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 2.0, 1.0]);
        let priorities: Vec<f32> = records.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let points: Vec<Vec2> = (0..40).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let a = BlueNoiseOrderer::default().order(points.clone(), 5).unwrap();
        let b = BlueNoiseOrderer::default().order(points, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_point_has_full_priority() {
        let records = BlueNoiseOrderer::default()
            .order(vec![Vec2::new(0.5, 0.5)], 0)
            .unwrap();
        assert_eq!(records, vec![SampleRecord::new(Vec2::new(0.5, 0.5), 1.0)]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            BlueNoiseOrderer::default().order(Vec::new(), 0),
            Err(Error::EmptyInputSet(_))
        ));
    }
}
