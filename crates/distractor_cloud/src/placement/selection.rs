//! Helpers applied to projected placements.
//!
//! - [pick_kind_by_priority]: deterministic weighted choice of a distractor variant,
//!   rolled from a placement's priority instead of a random stream.
//! - [placements_in_groups]: the placements whose group lies in a scheduler window.
//! - [group_bounds]: index range of one group inside a group-sorted slice.
use std::ops::{Range, RangeInclusive};

use crate::placement::projector::PlacementPoint;

/// Choose a kind index from `weights` using `priority` in `[0, 1]` as the roll.
///
/// The roll is `priority * sum(weights)` over the positive weights. A single kind
/// is always chosen; `None` is returned when no weight is positive.
pub fn pick_kind_by_priority(weights: &[f32], priority: f32) -> Option<usize> {
    if weights.len() == 1 {
        return Some(0);
    }

    let total_weight: f32 = weights.iter().filter(|w| **w > 0.0).sum();
    if total_weight <= 0.0 {
        return None;
    }

    let mut roll = priority.clamp(0.0, 1.0) * total_weight;
    let mut last = None;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        roll -= weight;
        if roll <= 0.0 {
            return Some(index);
        }
        last = Some(index);
    }

    // Float drift can leave a tiny positive remainder at priority 1.
    last
}

/// Placements whose group lies in the inclusive `window`, in input order.
pub fn placements_in_groups(
    points: &[PlacementPoint],
    window: RangeInclusive<usize>,
) -> Vec<PlacementPoint> {
    points
        .iter()
        .filter(|p| window.contains(&p.group))
        .copied()
        .collect()
}

/// Index range covered by `group` in `sorted`, which must be ordered by group.
pub fn group_bounds(sorted: &[PlacementPoint], group: usize) -> Range<usize> {
    let start = sorted.partition_point(|p| p.group < group);
    let end = sorted.partition_point(|p| p.group <= group);
    start..end
}
