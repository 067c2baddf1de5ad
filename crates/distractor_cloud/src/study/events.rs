//! Event types and sinks for observing a study session.
//!
//! [`StudyEvent`]s are emitted by [`crate::study::session::StudySession`] and carry
//! the time elapsed since the session was created. Sinks collect, forward or drop
//! them; the host typically writes them to its study log.
use std::time::Duration;

use glam::{Quat, Vec3};

use crate::study::scheduler::PathEnd;

/// Describes events emitted while running a study.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum StudyEvent {
    /// Emitted when a session starts with a fresh set of placements.
    StudyStarted {
        timestamp: Duration,
        /// Number of groups along the path.
        group_count: usize,
        /// Number of placements handed to the session.
        placement_count: usize,
        /// Number of trials to run.
        trial_count: usize,
    },

    /// Emitted when a new target is chosen.
    TargetSelected {
        timestamp: Duration,
        /// One-based trial number.
        trial: usize,
        group: usize,
        /// Index into the session's placements.
        target_index: usize,
        position: Vec3,
    },

    /// Emitted when the participant makes a selection.
    SelectionMade {
        timestamp: Duration,
        trial: usize,
        /// Whether the selected object was the target.
        valid: bool,
        target_position: Vec3,
    },

    /// Emitted when the traversal bounces off one end of the path.
    PathEndReached { timestamp: Duration, end: PathEnd },

    /// Emitted when the host moved or rotated the path.
    PathRepositioned {
        timestamp: Duration,
        old_position: Vec3,
        new_position: Vec3,
        old_orientation: Quat,
        new_orientation: Quat,
    },

    /// Emitted once all trials are done.
    StudyEnded {
        timestamp: Duration,
        trials_completed: usize,
    },

    /// Non-fatal warning generated during the study.
    Warning {
        timestamp: Duration,
        /// Context string (e.g. group index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl StudyEvent {
    pub fn timestamp(&self) -> Duration {
        match self {
            StudyEvent::StudyStarted { timestamp, .. }
            | StudyEvent::TargetSelected { timestamp, .. }
            | StudyEvent::SelectionMade { timestamp, .. }
            | StudyEvent::PathEndReached { timestamp, .. }
            | StudyEvent::PathRepositioned { timestamp, .. }
            | StudyEvent::StudyEnded { timestamp, .. }
            | StudyEvent::Warning { timestamp, .. } => *timestamp,
        }
    }
}

/// Receiver for the study log.
///
/// The session calls [`EventSink::send`] synchronously, in the order things happen,
/// so a sink sees a trial's `TargetSelected` before its `SelectionMade`.
pub trait EventSink {
    fn send(&mut self, event: StudyEvent);

    /// Replay several events, e.g. a log recorded by another sink.
    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = StudyEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// Drops every event; for hosts that only read the returned targets.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: StudyEvent) {}
}

/// Hands each event to a closure, e.g. to write study log lines as they happen.
pub struct FnSink<F>
where
    F: FnMut(StudyEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(StudyEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(StudyEvent),
{
    #[inline]
    fn send(&mut self, event: StudyEvent) {
        (self.f)(event);
    }
}

/// Keeps the whole study log in memory, in emission order.
#[derive(Default)]
pub struct VecSink {
    events: Vec<StudyEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<StudyEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[StudyEvent] {
        &self.events
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&StudyEvent> {
        self.events.last()
    }

    /// Outcomes of all `SelectionMade` events, in order.
    pub fn selection_outcomes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StudyEvent::SelectionMade { valid, .. } => Some(*valid),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: StudyEvent) {
        self.events.push(event);
    }
}

/// Copies every event into several sinks of the same kind, e.g. a per-participant
/// log and a session-wide one.
pub struct MultiSink<S: EventSink> {
    sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn into_sinks(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: StudyEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> StudyEvent {
        StudyEvent::Warning {
            timestamp: Duration::from_millis(5),
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send_many([warning("a"), warning("b")]);
        assert_eq!(sink.len(), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        for sink in multi.sinks() {
            assert_eq!(sink.as_slice(), &[warning("ctx")]);
        }
    }

    #[test]
    fn empty_multi_sink_drops_events() {
        let mut multi: MultiSink<VecSink> = MultiSink::default();
        multi.send(warning("ctx"));
        assert!(multi.is_empty());
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        sink.send(StudyEvent::PathEndReached {
            timestamp: Duration::ZERO,
            end: PathEnd::End,
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn vec_sink_reports_selection_outcomes() {
        let mut sink = VecSink::new();
        assert!(sink.last().is_none());
        for valid in [true, false, true] {
            sink.send(StudyEvent::SelectionMade {
                timestamp: Duration::ZERO,
                trial: 1,
                valid,
                target_position: glam::Vec3::ZERO,
            });
        }
        sink.send(warning("tail"));
        assert_eq!(sink.selection_outcomes(), vec![true, false, true]);
        assert_eq!(sink.last(), Some(&warning("tail")));
    }

    #[test]
    fn timestamp_is_exposed_for_every_variant() {
        assert_eq!(warning("a").timestamp(), Duration::from_millis(5));
        let ended = StudyEvent::StudyEnded {
            timestamp: Duration::from_secs(2),
            trials_completed: 20,
        };
        assert_eq!(ended.timestamp(), Duration::from_secs(2));
    }
}
