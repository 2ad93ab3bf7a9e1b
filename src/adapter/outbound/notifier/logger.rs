//! Notifier that renders engine events through `tracing`.

use tracing::{info, warn};

use crate::port::{Event, Notifier};

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::RunStarted { backend, contests } => {
                info!(backend, contests, "Run started");
            }
            Event::ContestEvaluated(e) => {
                info!(
                    contest_id = %e.contest_id,
                    title = %e.title,
                    exposure = e.exposure,
                    vote = e.decision.should_vote,
                    boost = e.decision.should_boost,
                    reason = %e.decision.reason(),
                    "Contest evaluated"
                );
            }
            Event::BoostApplied {
                contest_id,
                entry_id,
            } => {
                info!(contest_id = %contest_id, entry_id = %entry_id, "Boost applied");
            }
            Event::BoostRejected { contest_id, reason } => {
                info!(contest_id = %contest_id, reason = %reason, "Boost rejected");
            }
            Event::BoostFailed { contest_id, error } => {
                warn!(contest_id = %contest_id, error = %error, "Boost failed");
            }
            Event::VotesSubmitted(e) => {
                info!(
                    contest_id = %e.contest_id,
                    votes = e.votes,
                    exposure_before = e.exposure_before,
                    exposure_projected = e.exposure_projected,
                    target = e.exposure_target,
                    "Votes submitted"
                );
            }
            Event::VotingSkipped { contest_id, reason } => {
                info!(contest_id = %contest_id, reason = %reason, "Voting skipped");
            }
            Event::ContestFailed { contest_id, error } => {
                warn!(contest_id = %contest_id, error = %error, "Contest failed");
            }
            Event::RunCompleted(summary) => {
                info!(
                    contests = summary.contests_processed,
                    boosts = summary.boosts_applied,
                    votes = summary.votes_cast,
                    skipped = summary.contests_skipped,
                    failed = summary.contests_failed,
                    "Run completed"
                );
            }
            Event::RunCancelled(summary) => {
                info!(contests = summary.contests_processed, "Run cancelled");
            }
            Event::RunFailed { error } => {
                warn!(error = %error, "Run failed");
            }
        }
    }
}
