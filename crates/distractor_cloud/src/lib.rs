#![forbid(unsafe_code)]
//! distractor_cloud: blue-noise distractor placement along paths and grouped target scheduling.
//!
//! Modules:
//! - sampling: spatial grid, Poisson disk generation, blue-noise ordering, tileable sample assets
//! - placement: paths, projection of sample assets onto paths, spawn windows, kind selection
//! - study: group traversal scheduling, study events, and the trial-driving session
//!
//! For examples, see the `distractor_cloud_examples` crate.
pub mod error;
pub mod placement;
pub mod sampling;
pub mod study;

/// Convenient re-exports for common types. Import with `use distractor_cloud::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::placement::path::{PathEvaluator, PolylinePath, StraightPath};
    pub use crate::placement::projector::{
        classify_path_position, PathSampleProjector, PlacementPoint, ProjectionConfig, Spacing,
    };
    pub use crate::placement::selection::{pick_kind_by_priority, placements_in_groups};
    pub use crate::sampling::asset::{AssetGenerationSettings, SamplePointAsset};
    pub use crate::sampling::blue_noise::{BlueNoiseOrderer, SampleRecord};
    pub use crate::sampling::grid::SpatialGrid;
    pub use crate::sampling::poisson_disk::PoissonDiskSampling;
    pub use crate::sampling::WrapMode;
    pub use crate::study::config::{StudyConfig, TaskLoad};
    pub use crate::study::events::{EventSink, FnSink, MultiSink, StudyEvent, VecSink};
    pub use crate::study::scheduler::{
        Direction, GroupStep, GroupTraversalScheduler, PathEnd, SchedulerState, TraversalStep,
    };
    pub use crate::study::session::StudySession;
}
