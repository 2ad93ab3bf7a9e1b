//! Notifier port for engine events.
//!
//! The engine never writes to a console or file. It emits an [`Event`] for
//! each decision and action, and the caller decides how to render it.

use crate::domain::{ContestId, Decision, EntryId, RunSummary};
use crate::port::outbound::backend::BoostRejection;

/// Events emitted by a voting run.
#[derive(Debug, Clone)]
pub enum Event {
    /// Contest list fetched, work about to begin.
    RunStarted {
        backend: &'static str,
        contests: usize,
    },
    /// A contest snapshot was evaluated.
    ContestEvaluated(DecisionEvent),
    /// Boost applied to an entry.
    BoostApplied {
        contest_id: ContestId,
        entry_id: EntryId,
    },
    /// Backend declined the boost.
    BoostRejected {
        contest_id: ContestId,
        reason: BoostRejection,
    },
    /// Boost request failed; the contest continues.
    BoostFailed {
        contest_id: ContestId,
        error: String,
    },
    /// A vote batch was accepted.
    VotesSubmitted(VoteEvent),
    /// Voting was due but nothing could be submitted.
    VotingSkipped {
        contest_id: ContestId,
        reason: String,
    },
    /// A backend failure ended work on this contest.
    ContestFailed {
        contest_id: ContestId,
        error: String,
    },
    /// Run reached the end of the contest list.
    RunCompleted(RunSummary),
    /// Run stopped on request.
    RunCancelled(RunSummary),
    /// Run could not proceed.
    RunFailed { error: String },
}

/// Decision taken for one contest.
#[derive(Debug, Clone)]
pub struct DecisionEvent {
    pub contest_id: ContestId,
    pub title: String,
    pub exposure: f64,
    pub decision: Decision,
}

/// Vote submission details.
#[derive(Debug, Clone)]
pub struct VoteEvent {
    pub contest_id: ContestId,
    pub votes: usize,
    pub exposure_before: f64,
    /// Exposure the batch is expected to reach.
    pub exposure_projected: f64,
    pub exposure_target: f64,
}

/// Trait for receiving engine events.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

/// A no-op notifier for when events are not needed.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}
