//! Setup shared by commands that talk to a backend.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::inbound::cli::output;
use crate::application::orchestration::VotingEngine;
use crate::domain::Token;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::{BackendMode, Config};
use crate::port::SystemClock;

/// Load configuration, apply the `--synthetic` switch and start logging.
pub fn load_config(path: &Path, synthetic: bool) -> Result<Config> {
    let mut config = Config::load(path)?;
    if synthetic {
        config.backend.mode = BackendMode::Synthetic;
    }

    let logging = match output::current().log_level() {
        Some(level) => config.logging.clone().with_level(level),
        None => config.logging.clone(),
    };
    logging.init();
    Ok(config)
}

/// Build the engine and log in.
pub async fn connect(config: &Config) -> Result<(VotingEngine, Token)> {
    let backend = bootstrap::build_backend(config, Arc::new(SystemClock))?;
    let token =
        bootstrap::acquire_token(&config.credentials, config.backend.mode, backend.as_ref())
            .await?;
    let engine = bootstrap::build_engine(config, backend)?;
    Ok((engine, token))
}
