//! Repeats engine runs on a fixed interval.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::application::orchestration::{ExposureTarget, FailureKind, RunOutcome, VotingEngine};
use crate::domain::{RunSummary, Token};

/// How often the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A single run.
    Once,
    /// A run every interval until shutdown. The first run starts immediately.
    Every(Duration),
}

/// Run the engine according to `schedule`.
///
/// Shutdown goes through the engine's cancellation handle: it interrupts an
/// in-flight run at its next checkpoint and stops further ticks. A run that
/// fails on authentication or configuration also stops the schedule, since
/// the next tick would fail the same way. Returns the outcome of the last run
/// started.
pub async fn run_scheduled(
    engine: &VotingEngine,
    token: &Token,
    target: &ExposureTarget,
    schedule: Schedule,
) -> RunOutcome {
    let every = match schedule {
        Schedule::Once => return engine.run(token, target).await,
        Schedule::Every(every) => every,
    };

    let cancel = engine.cancellation().clone();
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last = RunOutcome::Cancelled(RunSummary::default());
    let mut runs: u64 = 0;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(runs, "Scheduler stopping");
                break;
            }
            _ = ticker.tick() => {}
        }

        runs += 1;
        last = engine.run(token, target).await;
        match &last {
            RunOutcome::Cancelled(_) => break,
            RunOutcome::Failed {
                kind: FailureKind::Auth | FailureKind::Config,
                error,
            } => {
                warn!(run = runs, error = %error, "Scheduled run failed, stopping");
                break;
            }
            RunOutcome::Failed { error, .. } => {
                warn!(run = runs, error = %error, "Scheduled run failed");
            }
            RunOutcome::Completed(_) => {
                info!(run = runs, result = %last.message(), "Scheduled run finished");
            }
        }
    }
    last
}
