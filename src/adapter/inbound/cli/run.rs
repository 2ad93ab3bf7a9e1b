//! Handler for the `run` command.

use serde_json::json;
use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{output, session};
use crate::application::orchestration::{ExposureTarget, RunOutcome};
use crate::error::{Error, Result};
use crate::infrastructure::scheduler::{run_scheduled, Schedule};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = session::load_config(&args.config, args.synthetic)?;
    let (engine, token) = session::connect(&config).await?;

    let target = args
        .exposure_target
        .map_or(ExposureTarget::FromSettings, ExposureTarget::Fixed);
    let schedule = if args.watch {
        Schedule::Every(config.interval())
    } else {
        Schedule::Once
    };

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Backend", engine.backend().name());
    match schedule {
        Schedule::Once => output::field("Schedule", "once"),
        Schedule::Every(every) => output::field("Schedule", format!("every {}s", every.as_secs())),
    }
    if let Some(target) = args.exposure_target {
        output::field("Exposure target", target);
    }

    let cancel = engine.cancellation().clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            cancel.cancel();
        }
    });
    let outcome = run_scheduled(&engine, &token, &target, schedule).await;
    interrupt.abort();

    report(&outcome);
    match outcome {
        RunOutcome::Failed { error, .. } => Err(Error::RunFailed(error)),
        RunOutcome::Completed(_) | RunOutcome::Cancelled(_) => Ok(()),
    }
}

fn report(outcome: &RunOutcome) {
    if output::is_json() {
        output::json_output(&json!({
            "command": "run",
            "success": outcome.success(),
            "cancelled": outcome.is_cancelled(),
            "message": outcome.message(),
            "summary": outcome.summary(),
        }));
        return;
    }

    output::section("Result");
    if let Some(summary) = outcome.summary() {
        output::field("Contests seen", summary.contests_seen);
        output::field("Contests processed", summary.contests_processed);
        output::field("Boosts applied", summary.boosts_applied);
        output::field("Votes cast", summary.votes_cast);
        output::field("Vote batches", summary.vote_batches);
        output::field("Contests skipped", summary.contests_skipped);
        output::field("Contests failed", summary.contests_failed);
    }
    match outcome {
        RunOutcome::Completed(_) => output::success(&outcome.message()),
        RunOutcome::Cancelled(_) => output::warning("run cancelled"),
        RunOutcome::Failed { .. } => {}
    }
}
