//! Placement of sample assets along paths.
//!
//! A [`path::PathEvaluator`] supplies the path geometry, the
//! [`projector::PathSampleProjector`] tiles prioritized sample assets along it
//! and tags each kept point with its group, and [`selection`] provides helpers
//! for windowed spawning and variant choice.
pub mod path;
pub mod projector;
pub mod selection;

pub use path::{PathEvaluator, PolylinePath, StraightPath};
pub use projector::{
    classify_path_position, PathSampleProjector, PlacementPoint, ProjectionConfig, Spacing,
};
pub use selection::{group_bounds, pick_kind_by_priority, placements_in_groups};
