//! The trial driver of a search study.
//!
//! A [`StudySession`] owns the placements of one configuration, asks the
//! [`GroupTraversalScheduler`] which group the next target comes from, draws the
//! target from that group and reports everything as [`StudyEvent`]s. The host
//! forwards the participant's selections via [`StudySession::submit_selection`].
use std::time::{Duration, Instant};

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::placement::projector::PlacementPoint;
use crate::placement::selection::{group_bounds, placements_in_groups};
use crate::sampling::rand_index;
use crate::study::config::StudyConfig;
use crate::study::events::{EventSink, StudyEvent};
use crate::study::scheduler::{GroupStep, GroupTraversalScheduler, TraversalStep};

pub struct StudySession {
    config: StudyConfig,
    /// Sorted by group, stable with respect to the input order.
    placements: Vec<PlacementPoint>,
    scheduler: GroupTraversalScheduler,
    rng: StdRng,
    current_target: Option<usize>,
    current_step: Option<GroupStep>,
    started_at: Instant,
}

impl StudySession {
    pub fn new(config: StudyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: GroupTraversalScheduler::new(0, config.trial_count)
                .with_max_group_span(config.max_group_span),
            rng: StdRng::seed_from_u64(config.seed),
            placements: Vec::new(),
            current_target: None,
            current_step: None,
            started_at: Instant::now(),
            config,
        })
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    pub fn placements(&self) -> &[PlacementPoint] {
        &self.placements
    }

    pub fn scheduler(&self) -> &GroupTraversalScheduler {
        &self.scheduler
    }

    pub fn current_step(&self) -> Option<&GroupStep> {
        self.current_step.as_ref()
    }

    pub fn current_target_index(&self) -> Option<usize> {
        self.current_target
    }

    pub fn current_target(&self) -> Option<&PlacementPoint> {
        self.current_target.map(|i| &self.placements[i])
    }

    pub fn is_running(&self) -> bool {
        self.current_target.is_some()
    }

    /// Time since the session was created or last started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Placements the host should have spawned for the current step.
    pub fn active_placements(&self) -> Vec<PlacementPoint> {
        if self.config.spawn_all_groups_at_start {
            return self.placements.clone();
        }
        match &self.current_step {
            Some(step) => placements_in_groups(&self.placements, step.window.clone()),
            None => Vec::new(),
        }
    }

    /// Begin a study over `placements` and select the first target.
    pub fn start(
        &mut self,
        mut placements: Vec<PlacementPoint>,
        sink: &mut dyn EventSink,
    ) -> Option<PlacementPoint> {
        placements.sort_by_key(|p| p.group);
        let group_count = placements.last().map_or(0, |p| p.group + 1);

        self.placements = placements;
        self.scheduler = GroupTraversalScheduler::new(group_count, self.config.trial_count)
            .with_max_group_span(self.config.max_group_span);
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.current_target = None;
        self.current_step = None;
        self.started_at = Instant::now();

        info!(
            group_count,
            placements = self.placements.len(),
            trials = self.config.trial_count,
            "Study started."
        );
        sink.send(StudyEvent::StudyStarted {
            timestamp: self.elapsed(),
            group_count,
            placement_count: self.placements.len(),
            trial_count: self.config.trial_count,
        });

        self.select_next_target(sink)
    }

    /// Report a selection. A valid selection moves on to the next target, an
    /// invalid one keeps the current target. Returns the target to search next.
    pub fn submit_selection(
        &mut self,
        valid: bool,
        sink: &mut dyn EventSink,
    ) -> Option<PlacementPoint> {
        let Some(index) = self.current_target else {
            warn!("Selection submitted without an active target; ignoring.");
            sink.send(StudyEvent::Warning {
                timestamp: self.elapsed(),
                context: "selection".into(),
                message: "no active target".into(),
            });
            return None;
        };

        let target = self.placements[index];
        sink.send(StudyEvent::SelectionMade {
            timestamp: self.elapsed(),
            trial: self.current_step.as_ref().map_or(0, |s| s.trial),
            valid,
            target_position: target.position,
        });

        if valid {
            self.select_next_target(sink)
        } else {
            Some(target)
        }
    }

    /// Report that the host moved the path.
    pub fn record_repositioning(
        &self,
        old_position: Vec3,
        new_position: Vec3,
        old_orientation: Quat,
        new_orientation: Quat,
        sink: &mut dyn EventSink,
    ) {
        debug!(?old_position, ?new_position, "Path repositioned.");
        sink.send(StudyEvent::PathRepositioned {
            timestamp: self.elapsed(),
            old_position,
            new_position,
            old_orientation,
            new_orientation,
        });
    }

    fn select_next_target(&mut self, sink: &mut dyn EventSink) -> Option<PlacementPoint> {
        loop {
            let step = match self.scheduler.advance() {
                TraversalStep::Finished => {
                    self.finish(sink);
                    return None;
                }
                TraversalStep::Group(step) => step,
            };

            if let Some(end) = step.end_of_path {
                sink.send(StudyEvent::PathEndReached {
                    timestamp: self.elapsed(),
                    end,
                });
            }

            let bounds = group_bounds(&self.placements, step.group);
            if bounds.is_empty() {
                warn!("Group {} has no placements; skipping trial {}.", step.group, step.trial);
                sink.send(StudyEvent::Warning {
                    timestamp: self.elapsed(),
                    context: format!("group {}", step.group),
                    message: "group has no placements".into(),
                });
                self.current_step = Some(step);
                continue;
            }

            let index = bounds.start + rand_index(&mut self.rng, bounds.len());
            let target = self.placements[index];
            sink.send(StudyEvent::TargetSelected {
                timestamp: self.elapsed(),
                trial: step.trial,
                group: step.group,
                target_index: index,
                position: target.position,
            });

            self.current_target = Some(index);
            self.current_step = Some(step);
            return Some(target);
        }
    }

    fn finish(&mut self, sink: &mut dyn EventSink) {
        let trials_completed = self.scheduler.trials_completed().saturating_sub(1);
        info!(trials_completed, elapsed = ?self.elapsed(), "Study ended.");
        sink.send(StudyEvent::StudyEnded {
            timestamp: self.elapsed(),
            trials_completed,
        });
        self.current_target = None;
        self.current_step = None;
        self.scheduler.reset();
    }
}
