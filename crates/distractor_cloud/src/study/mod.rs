//! Trial driving for the search study.
//!
//! [`scheduler::GroupTraversalScheduler`] walks the groups of a path back and forth,
//! [`session::StudySession`] turns its steps into target selections, and
//! [`events`] reports what happened to any [`events::EventSink`].
pub mod config;
pub mod events;
pub mod scheduler;
pub mod session;

pub use config::{StudyConfig, TaskLoad};
pub use events::{EventSink, FnSink, MultiSink, StudyEvent, VecSink};
pub use scheduler::{
    Direction, GroupStep, GroupTraversalScheduler, PathEnd, SchedulerState, TraversalStep,
};
pub use session::StudySession;
