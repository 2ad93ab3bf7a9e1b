//! The voting run.
//!
//! One run walks the active contests strictly in order. For each contest it
//! resolves settings, evaluates the snapshot, applies a due boost, casts due
//! votes and then pauses before the next contest. Failures inside a contest are
//! reported and skipped; failing to list contests, an authentication failure
//! or a configuration error ends the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::cancel::Cancellation;
use super::outcome::{ExposureTarget, FailureKind, RunOutcome};
use super::pacing::Pacing;
use crate::application::decision::evaluate;
use crate::application::selector::{select, SelectionStatus};
use crate::application::settings::SettingsStore;
use crate::domain::{Contest, EffectiveSettings, RunSummary, SettingKey, Token};
use crate::error::{BackendError, ConfigError};
use crate::port::{
    BoostOutcome, Clock, ContestBackend, DecisionEvent, Event, Notifier, NullNotifier,
    SystemClock, VoteBatch, VoteEvent,
};

/// Drives voting and boosting across a user's active contests.
pub struct VotingEngine {
    backend: Arc<dyn ContestBackend>,
    settings: Arc<SettingsStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    pacing: Pacing,
    cancel: Cancellation,
    running: AtomicBool,
}

/// What the loop does after a contest.
enum Flow {
    Continue,
    Cancelled,
}

/// Conditions that end the whole run.
enum Abort {
    Config(ConfigError),
    Auth(BackendError),
}

impl Abort {
    fn into_outcome(self) -> RunOutcome {
        let (kind, error) = match self {
            Self::Config(err) => (FailureKind::Config, err.to_string()),
            Self::Auth(err) => (FailureKind::Auth, err.to_string()),
        };
        RunOutcome::Failed { kind, error }
    }
}

enum VoteStep {
    Submitted,
    Skipped,
    Cancelled,
}

/// Clears the single-run flag when a run ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl VotingEngine {
    /// Create an engine with the system clock, no events, default pacing and
    /// a fresh cancellation handle.
    pub fn new(backend: Arc<dyn ContestBackend>, settings: Arc<SettingsStore>) -> Self {
        Self {
            backend,
            settings,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(NullNotifier),
            pacing: Pacing::default(),
            cancel: Cancellation::new(),
            running: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub const fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that stops the current run at its next checkpoint.
    #[must_use]
    pub const fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn ContestBackend> {
        &self.backend
    }

    /// Settings for a contest with the run's target override applied.
    pub fn effective_settings(
        &self,
        contest: &Contest,
        target: &ExposureTarget,
    ) -> Result<EffectiveSettings, ConfigError> {
        let mut settings = self.settings.effective(&contest.id)?;
        if let Some(value) = target.for_contest(contest) {
            let value = SettingKey::ExposureTarget.validate(value.into())?;
            if let Some(value) = value.as_number() {
                settings.exposure_target = value;
            }
        }
        Ok(settings)
    }

    /// Run once over every active contest.
    ///
    /// Only one run may be active per engine; an overlapping call fails
    /// immediately without touching the backend.
    pub async fn run(&self, token: &Token, target: &ExposureTarget) -> RunOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Run requested while another run is active");
            return RunOutcome::Failed {
                kind: FailureKind::Busy,
                error: "run already in progress".to_string(),
            };
        }
        let _guard = RunGuard(&self.running);

        let outcome = self.run_contests(token, target).await;
        self.notifier.notify(match &outcome {
            RunOutcome::Completed(summary) => Event::RunCompleted(*summary),
            RunOutcome::Cancelled(summary) => Event::RunCancelled(*summary),
            RunOutcome::Failed { error, .. } => Event::RunFailed {
                error: error.clone(),
            },
        });
        outcome
    }

    async fn run_contests(&self, token: &Token, target: &ExposureTarget) -> RunOutcome {
        let mut summary = RunSummary::default();
        if self.cancel.is_cancelled() {
            return RunOutcome::Cancelled(summary);
        }

        let contests = match self.backend.list_active_contests(token).await {
            Ok(contests) => contests,
            Err(err) => {
                let kind = if err.is_auth() {
                    FailureKind::Auth
                } else {
                    FailureKind::Listing
                };
                return RunOutcome::Failed {
                    kind,
                    error: err.to_string(),
                };
            }
        };
        summary.contests_seen = contests.len();
        self.notifier.notify(Event::RunStarted {
            backend: self.backend.name(),
            contests: contests.len(),
        });

        for (index, contest) in contests.iter().enumerate() {
            match self.process_contest(contest, token, target, &mut summary).await {
                Ok(Flow::Continue) => summary.contests_processed += 1,
                Ok(Flow::Cancelled) => return RunOutcome::Cancelled(summary),
                Err(abort) => return abort.into_outcome(),
            }

            let is_last = index + 1 == contests.len();
            if !is_last && self.pause().await {
                return RunOutcome::Cancelled(summary);
            }
        }

        RunOutcome::Completed(summary)
    }

    async fn process_contest(
        &self,
        contest: &Contest,
        token: &Token,
        target: &ExposureTarget,
        summary: &mut RunSummary,
    ) -> Result<Flow, Abort> {
        let settings = self.effective_settings(contest, target).map_err(Abort::Config)?;
        if self.cancel.is_cancelled() {
            return Ok(Flow::Cancelled);
        }

        let decision = evaluate(contest, &settings, self.clock.now());
        debug!(contest_id = %contest.id, reason = %decision.reason(), "Contest evaluated");
        self.notifier.notify(Event::ContestEvaluated(DecisionEvent {
            contest_id: contest.id.clone(),
            title: contest.title.clone(),
            exposure: contest.exposure_factor,
            decision,
        }));

        let mut skipped = false;

        if decision.should_boost {
            if !self.boost(contest, token, summary).await? {
                skipped = true;
            }
            if self.cancel.is_cancelled() {
                return Ok(Flow::Cancelled);
            }
        }

        if decision.should_vote {
            match self.vote(contest, &settings, token, summary).await {
                Ok(VoteStep::Submitted) => {}
                Ok(VoteStep::Skipped) => skipped = true,
                Ok(VoteStep::Cancelled) => return Ok(Flow::Cancelled),
                Err(err) if err.is_auth() => return Err(Abort::Auth(err)),
                Err(err) => {
                    warn!(contest_id = %contest.id, error = %err, "Voting failed");
                    summary.contests_failed += 1;
                    self.notifier.notify(Event::ContestFailed {
                        contest_id: contest.id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        // The contest is done; a pending cancellation stops the run at the pause.
        if skipped {
            summary.contests_skipped += 1;
        }
        Ok(Flow::Continue)
    }

    /// Apply the boost. Returns false when the backend declined or failed.
    async fn boost(
        &self,
        contest: &Contest,
        token: &Token,
        summary: &mut RunSummary,
    ) -> Result<bool, Abort> {
        match self.backend.apply_boost(contest, token).await {
            Ok(BoostOutcome::Applied { entry_id }) => {
                summary.boosts_applied += 1;
                self.notifier.notify(Event::BoostApplied {
                    contest_id: contest.id.clone(),
                    entry_id,
                });
                Ok(true)
            }
            Ok(BoostOutcome::Rejected(reason)) => {
                self.notifier.notify(Event::BoostRejected {
                    contest_id: contest.id.clone(),
                    reason,
                });
                Ok(false)
            }
            Err(err) if err.is_auth() => Err(Abort::Auth(err)),
            Err(err) => {
                warn!(contest_id = %contest.id, error = %err, "Boost failed");
                self.notifier.notify(Event::BoostFailed {
                    contest_id: contest.id.clone(),
                    error: err.to_string(),
                });
                Ok(false)
            }
        }
    }

    async fn vote(
        &self,
        contest: &Contest,
        settings: &EffectiveSettings,
        token: &Token,
        summary: &mut RunSummary,
    ) -> Result<VoteStep, BackendError> {
        let pool = self.backend.fetch_votable_items(contest, token).await?;
        if self.cancel.is_cancelled() {
            return Ok(VoteStep::Cancelled);
        }
        let Some(pool) = pool else {
            self.skip_voting(contest, "no vote pool");
            return Ok(VoteStep::Skipped);
        };

        let selection = select(&pool.items, pool.starting_exposure, settings.exposure_target);
        match selection.status {
            SelectionStatus::NoItems => {
                self.skip_voting(contest, "vote pool is empty");
                return Ok(VoteStep::Skipped);
            }
            _ if selection.is_empty() => {
                self.skip_voting(contest, "exposure target already reached");
                return Ok(VoteStep::Skipped);
            }
            SelectionStatus::PoolExhausted => {
                debug!(contest_id = %contest.id, items = pool.len(), "Vote pool exhausted before target");
            }
            SelectionStatus::TargetReached => {}
        }

        let exposure_projected = selection.projected_exposure;
        let batch = VoteBatch {
            items: selection.items,
            exposure_target: settings.exposure_target,
        };
        let ack = self.backend.submit_votes(&batch, contest, token).await?;

        summary.vote_batches += 1;
        summary.votes_cast += ack.accepted;
        self.notifier.notify(Event::VotesSubmitted(VoteEvent {
            contest_id: contest.id.clone(),
            votes: ack.accepted,
            exposure_before: pool.starting_exposure,
            exposure_projected,
            exposure_target: settings.exposure_target,
        }));
        Ok(VoteStep::Submitted)
    }

    fn skip_voting(&self, contest: &Contest, reason: &str) {
        self.notifier.notify(Event::VotingSkipped {
            contest_id: contest.id.clone(),
            reason: reason.to_string(),
        });
    }

    /// Wait out the pacing delay. Returns true if cancelled.
    async fn pause(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        let delay = self.pacing.next_delay();
        if delay.is_zero() {
            return self.cancel.is_cancelled();
        }
        tokio::select! {
            () = tokio::time::sleep(delay) => self.cancel.is_cancelled(),
            () = self.cancel.cancelled() => true,
        }
    }
}
