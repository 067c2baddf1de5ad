//! Back-and-forth traversal of path groups across a fixed number of trials.
//!
//! Every [`GroupTraversalScheduler::advance`] call is one trial. The current group
//! moves one step in the travel direction; stepping past either end reverses the
//! direction and places the group one step in from that end, so the boundary
//! group is not visited twice in a row. Once more trials were requested than the
//! limit allows, the scheduler is finished and stays finished until [`reset`].
//!
//! [`reset`]: GroupTraversalScheduler::reset
use std::ops::RangeInclusive;

use tracing::{debug, info};

/// Travel direction along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Which end of the path a traversal bounced off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    Start,
    End,
}

impl PathEnd {
    /// Normalized path parameter of this end.
    pub fn value(self) -> f32 {
        match self {
            PathEnd::Start => 0.0,
            PathEnd::End => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Advancing,
    Finished,
}

/// Outcome of a successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStep {
    /// One-based trial number.
    pub trial: usize,
    pub group: usize,
    /// Groups to spawn for windowed consumers, clamped to the valid range.
    pub window: RangeInclusive<usize>,
    /// Direction after this step.
    pub direction: Direction,
    /// Set when this step bounced off a path end.
    pub end_of_path: Option<PathEnd>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalStep {
    Group(GroupStep),
    Finished,
}

impl TraversalStep {
    pub fn group_step(&self) -> Option<&GroupStep> {
        match self {
            TraversalStep::Group(step) => Some(step),
            TraversalStep::Finished => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupTraversalScheduler {
    current_group: isize,
    direction: Direction,
    trials_completed: usize,
    group_count: usize,
    trial_limit: usize,
    /// Extra groups exposed ahead of the current one; `None` exposes all groups.
    max_group_span: Option<usize>,
    state: SchedulerState,
}

impl GroupTraversalScheduler {
    pub fn new(group_count: usize, trial_limit: usize) -> Self {
        Self {
            current_group: -1,
            direction: Direction::Forward,
            trials_completed: 0,
            group_count,
            trial_limit,
            max_group_span: None,
            state: SchedulerState::Idle,
        }
    }

    pub fn with_max_group_span(mut self, max_group_span: Option<usize>) -> Self {
        self.max_group_span = max_group_span;
        self
    }

    pub fn current_group(&self) -> Option<usize> {
        usize::try_from(self.current_group).ok()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn trials_completed(&self) -> usize {
        self.trials_completed
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn trial_limit(&self) -> usize {
        self.trial_limit
    }

    pub fn max_group_span(&self) -> Option<usize> {
        self.max_group_span
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SchedulerState::Finished
    }

    /// Run one trial step.
    pub fn advance(&mut self) -> TraversalStep {
        if self.is_finished() {
            return TraversalStep::Finished;
        }

        self.trials_completed += 1;
        if self.trials_completed > self.trial_limit || self.group_count == 0 {
            self.state = SchedulerState::Finished;
            info!(
                trials = self.trials_completed - 1,
                groups = self.group_count,
                "Group traversal finished."
            );
            return TraversalStep::Finished;
        }
        self.state = SchedulerState::Advancing;

        let last = self.group_count as isize - 1;
        let mut group = self.current_group + self.direction.step();
        let mut end_of_path = None;

        // Reverse first, then place the group one step in from the end that was hit.
        if group > last || group < 0 {
            end_of_path = Some(match self.direction {
                Direction::Forward => PathEnd::End,
                Direction::Backward => PathEnd::Start,
            });
            group = match self.direction {
                Direction::Forward => last - 1,
                Direction::Backward => 1,
            }
            .clamp(0, last);
            self.direction = self.direction.reversed();
            debug!(group, ?end_of_path, "Reached end of path, reversing.");
        }
        self.current_group = group;

        let group = group as usize;
        TraversalStep::Group(GroupStep {
            trial: self.trials_completed,
            group,
            window: self.window_for(group),
            direction: self.direction,
            end_of_path,
        })
    }

    fn window_for(&self, group: usize) -> RangeInclusive<usize> {
        let last = self.group_count.saturating_sub(1);
        match (self.max_group_span, self.direction) {
            (None, _) => 0..=last,
            (Some(span), Direction::Forward) => group..=group.saturating_add(span).min(last),
            (Some(span), Direction::Backward) => group.saturating_sub(span)..=group,
        }
    }

    /// Back to the initial position, direction and trial count.
    pub fn reset(&mut self) {
        self.current_group = -1;
        self.direction = Direction::Forward;
        self.trials_completed = 0;
        self.state = SchedulerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(scheduler: &mut GroupTraversalScheduler, n: usize) -> Vec<(usize, Option<PathEnd>)> {
        (0..n)
            .map(|_| {
                let step = scheduler.advance();
                let step = step.group_step().expect("not finished");
                (step.group, step.end_of_path)
            })
            .collect()
    }

    #[test]
    fn bounces_one_step_in_from_each_end() {
        let mut scheduler = GroupTraversalScheduler::new(5, 100);
        let visited = groups(&mut scheduler, 10);
        assert_eq!(
            visited,
            vec![
                (0, None),
                (1, None),
                (2, None),
                (3, None),
                (4, None),
                (3, Some(PathEnd::End)),
                (2, None),
                (1, None),
                (0, None),
                (1, Some(PathEnd::Start)),
            ]
        );
        assert_eq!(scheduler.direction(), Direction::Forward);
        assert_eq!(PathEnd::End.value(), 1.0);
        assert_eq!(PathEnd::Start.value(), 0.0);
    }

    #[test]
    fn trial_limit_finishes_and_sticks() {
        let mut scheduler = GroupTraversalScheduler::new(5, 3);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        groups(&mut scheduler, 3);
        assert_eq!(scheduler.state(), SchedulerState::Advancing);

        assert_eq!(scheduler.advance(), TraversalStep::Finished);
        assert!(scheduler.is_finished());
        assert_eq!(scheduler.advance(), TraversalStep::Finished);
        assert_eq!(scheduler.trials_completed(), 4);
        assert_eq!(scheduler.current_group(), Some(2));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut scheduler = GroupTraversalScheduler::new(3, 2);
        groups(&mut scheduler, 2);
        scheduler.advance();
        scheduler.reset();

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.current_group(), None);
        assert_eq!(scheduler.trials_completed(), 0);
        assert_eq!(groups(&mut scheduler, 2), vec![(0, None), (1, None)]);
    }

    #[test]
    fn single_group_stays_at_zero() {
        let mut scheduler = GroupTraversalScheduler::new(1, 4);
        assert_eq!(
            groups(&mut scheduler, 3),
            vec![(0, None), (0, Some(PathEnd::End)), (0, Some(PathEnd::Start))]
        );
    }

    #[test]
    fn zero_groups_finish_immediately() {
        let mut scheduler = GroupTraversalScheduler::new(0, 4);
        assert_eq!(scheduler.advance(), TraversalStep::Finished);
        assert!(scheduler.is_finished());
    }

    #[test]
    fn windows_follow_direction_and_clamp() {
        let mut scheduler = GroupTraversalScheduler::new(4, 100).with_max_group_span(Some(2));
        let windows: Vec<_> = (0..6)
            .map(|_| scheduler.advance().group_step().map(|s| s.window.clone()))
            .collect();
        assert_eq!(
            windows,
            vec![
                Some(0..=2),
                Some(1..=3),
                Some(2..=3),
                Some(3..=3),
                Some(0..=2),
                Some(0..=1),
            ]
        );
    }

    #[test]
    fn without_span_window_covers_all_groups() {
        let mut scheduler = GroupTraversalScheduler::new(3, 1);
        let step = scheduler.advance();
        assert_eq!(step.group_step().map(|s| s.window.clone()), Some(0..=2));
    }
}
