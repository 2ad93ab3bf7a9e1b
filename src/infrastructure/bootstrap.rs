//! Composition root: builds the backend, session token and engine from
//! configuration.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::outbound::live::LiveBackend;
use crate::adapter::outbound::notifier::LogNotifier;
use crate::adapter::outbound::synthetic::SyntheticBackend;
use crate::application::orchestration::VotingEngine;
use crate::domain::Token;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::{
    BackendMode, Config, Credentials, IDENTITY_ENV, SECRET_ENV,
};
use crate::port::{Clock, ContestBackend, Notifier, NotifierRegistry, SystemClock};

/// Build the configured backend.
pub fn build_backend(config: &Config, clock: Arc<dyn Clock>) -> Result<Arc<dyn ContestBackend>> {
    let backend: Arc<dyn ContestBackend> = match config.backend.mode {
        BackendMode::Live => Arc::new(LiveBackend::from_config(&config.backend.live)?),
        BackendMode::Synthetic => Arc::new(SyntheticBackend::new(
            config.backend.synthetic.clone(),
            clock,
        )),
    };
    info!(backend = backend.name(), "Backend ready");
    Ok(backend)
}

/// Build the notifier registry used by the engine.
#[must_use]
pub fn build_notifier_registry() -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry
}

/// Obtain a session token.
///
/// A pre-issued token wins; otherwise the identity and secret are exchanged
/// with the backend. The synthetic backend accepts a placeholder login so it
/// can run without any credentials.
pub async fn acquire_token(
    credentials: &Credentials,
    mode: BackendMode,
    backend: &dyn ContestBackend,
) -> Result<Token> {
    if let Some(token) = &credentials.token {
        debug!("Using pre-issued token");
        return Ok(Token::new(token.as_str()));
    }
    let (identity, secret) = match (credentials.login(), mode) {
        (Some(login), _) => login,
        (None, BackendMode::Synthetic) => ("synthetic", "synthetic"),
        (None, BackendMode::Live) => {
            let field = if credentials.identity.is_none() {
                IDENTITY_ENV
            } else {
                SECRET_ENV
            };
            return Err(ConfigError::MissingField { field }.into());
        }
    };
    let token = backend.authenticate(identity, secret).await?;
    info!(backend = backend.name(), "Authenticated");
    Ok(token)
}

/// Build an engine over `backend` using the configured settings and pacing.
pub fn build_engine(config: &Config, backend: Arc<dyn ContestBackend>) -> Result<VotingEngine> {
    let settings = Arc::new(config.settings_store()?);
    let notifier: Arc<dyn Notifier> = Arc::new(build_notifier_registry());
    Ok(VotingEngine::new(backend, settings)
        .with_clock(Arc::new(SystemClock))
        .with_notifier(notifier)
        .with_pacing(config.pacing()))
}
