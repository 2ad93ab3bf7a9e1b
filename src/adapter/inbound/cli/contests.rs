//! Handler for the `contests` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ContestsArgs;
use crate::adapter::inbound::cli::{output, session};
use crate::application::decision::evaluate;
use crate::application::orchestration::ExposureTarget;
use crate::domain::Decision;
use crate::error::Result;
use crate::port::{Clock, SystemClock};

#[derive(Tabled)]
struct ContestRow {
    #[tabled(rename = "Contest")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Exposure")]
    exposure: String,
    #[tabled(rename = "Closes In")]
    closes_in: String,
    #[tabled(rename = "Boost")]
    boost: &'static str,
    #[tabled(rename = "Next")]
    next: String,
}

/// Execute the contests command.
pub async fn execute(args: &ContestsArgs) -> Result<()> {
    let config = session::load_config(&args.config, args.synthetic)?;
    let (engine, token) = session::connect(&config).await?;
    let contests = engine.backend().list_active_contests(&token).await?;
    let now = SystemClock.now();

    let mut rows = Vec::with_capacity(contests.len());
    for contest in &contests {
        let settings = engine.effective_settings(contest, &ExposureTarget::FromSettings)?;
        let decision = evaluate(contest, &settings, now);
        rows.push((contest, settings.exposure_target, decision));
    }

    if output::is_json() {
        let contests: Vec<_> = rows
            .iter()
            .map(|(contest, target, decision)| {
                json!({
                    "id": contest.id.as_str(),
                    "title": contest.title,
                    "exposure": contest.exposure_factor,
                    "exposure_target": target,
                    "closes_in": contest.remaining(now),
                    "boost": contest.boost,
                    "should_vote": decision.should_vote,
                    "should_boost": decision.should_boost,
                    "reason": decision.reason(),
                })
            })
            .collect();
        output::json_output(&json!({
            "command": "contests",
            "backend": engine.backend().name(),
            "contests": contests,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Active contests ({})", contests.len()));
    if rows.is_empty() {
        output::note("(none)");
        return Ok(());
    }

    let table = rows
        .iter()
        .map(|(contest, target, decision)| ContestRow {
            id: contest.id.to_string(),
            title: contest.title.clone(),
            exposure: format!("{:.1} / {target:.0}", contest.exposure_factor),
            closes_in: format_duration(contest.remaining(now)),
            boost: contest.boost.label(),
            next: next_action(decision),
        })
        .collect::<Vec<_>>();
    output::lines(&Table::new(table).to_string());
    output::hint(&format!(
        "run {} to act on these contests",
        output::highlight("votepilot run")
    ));
    Ok(())
}

fn next_action(decision: &Decision) -> String {
    match (decision.should_boost, decision.should_vote) {
        (true, true) => "boost + vote".to_string(),
        (true, false) => "boost".to_string(),
        (false, true) => "vote".to_string(),
        (false, false) => decision.vote_reason.to_string(),
    }
}

/// Render seconds as `1d 02h`, `3h 05m` or `42m`.
fn format_duration(secs: i64) -> String {
    if secs <= 0 {
        return "closed".to_string();
    }
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    if days > 0 {
        format!("{days}d {hours:02}h")
    } else if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}
