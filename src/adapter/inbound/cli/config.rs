//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::SettingKey;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let overrides = config.voting.contests.len();

    if output::is_json() {
        output::json_output(&json!({
            "command": "config.validate",
            "valid": true,
            "path": path.display().to_string(),
            "contest_overrides": overrides,
        }));
        return Ok(());
    }

    output::success(&format!("{} is valid", path.display()));
    output::field("Backend", config.backend.mode);
    output::field("Contest overrides", overrides);
    if config.credentials.token.is_none() && config.credentials.login().is_none() {
        output::hint("no credentials in the environment; only synthetic mode can run");
    }
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let store = config.settings_store()?;
    let globals = store.effective_global()?;

    if output::is_json() {
        let defaults: serde_json::Map<_, _> = SettingKey::ALL
            .iter()
            .map(|key| {
                (key.as_str().to_string(), json!(store.resolve_global(*key)))
            })
            .collect();
        output::json_output(&json!({
            "command": "config.show",
            "backend": {
                "mode": config.backend.mode.as_str(),
                "api_url": config.backend.live.api_url,
                "timeout_ms": config.backend.live.timeout_ms,
            },
            "pacing": {
                "min_delay_ms": config.pacing.min_delay_ms,
                "max_delay_ms": config.pacing.max_delay_ms,
            },
            "schedule": { "interval_secs": config.schedule.interval_secs },
            "voting": {
                "defaults": defaults,
                "contests": config.voting.contests,
            },
        }));
        return Ok(());
    }

    output::section("Backend");
    output::field("Mode", config.backend.mode);
    output::field("API", &config.backend.live.api_url);
    output::field("Timeout", format!("{}ms", config.backend.live.timeout_ms));
    if let Some(seed) = config.backend.synthetic.seed {
        output::field("Synthetic seed", seed);
    }

    output::section("Pacing");
    output::field(
        "Delay",
        format!(
            "{}-{}ms",
            config.pacing.min_delay_ms, config.pacing.max_delay_ms
        ),
    );
    output::field("Watch interval", format!("{}s", config.schedule.interval_secs));

    output::section("Voting defaults");
    output::field("exposure_target", globals.exposure_target);
    output::field("boost_lead_time", format!("{}s", globals.boost_lead_time));
    output::field("only_boost", globals.only_boost);
    output::field("vote_only_in_final_window", globals.vote_only_in_final_window);
    output::field(
        "final_window_threshold",
        format!("{}s", globals.final_window_threshold),
    );

    if !config.voting.contests.is_empty() {
        output::section("Contest overrides");
        for (contest_id, values) in &config.voting.contests {
            let rendered = values
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            output::field(contest_id, rendered);
        }
    }
    Ok(())
}
