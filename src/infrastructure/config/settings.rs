//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; credentials only ever come from
//! the environment (`VOTEPILOT_IDENTITY`, `VOTEPILOT_SECRET`, `VOTEPILOT_TOKEN`).
//!
//! # Example
//!
//! ```no_run
//! use votepilot::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("votepilot.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::live::LiveConfig;
use crate::adapter::outbound::synthetic::SyntheticConfig;
use crate::application::orchestration::Pacing;
use crate::application::settings::SettingsStore;
use crate::domain::{ContestId, SettingKey, SettingValue};
use crate::error::{ConfigError, Result};

/// Environment variable holding the account identity.
pub const IDENTITY_ENV: &str = "VOTEPILOT_IDENTITY";
/// Environment variable holding the account secret.
pub const SECRET_ENV: &str = "VOTEPILOT_SECRET";
/// Environment variable holding a pre-issued session token.
pub const TOKEN_ENV: &str = "VOTEPILOT_TOKEN";

/// Which backend implementation serves contest data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// The remote contest service.
    #[default]
    Live,
    /// Generated offline data.
    Synthetic,
}

impl BackendMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend selection plus per-implementation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,

    /// HTTP settings, read from the `[backend]` table itself.
    #[serde(flatten)]
    pub live: LiveConfig,

    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Randomized delay between contests.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

const fn default_min_delay_ms() -> u64 {
    1_000
}

const fn default_max_delay_ms() -> u64 {
    3_000
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Repeat interval for watch mode.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

const fn default_interval_secs() -> u64 {
    600
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

/// Global setting values and per-contest overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VotingConfig {
    #[serde(default)]
    pub defaults: BTreeMap<SettingKey, SettingValue>,
    #[serde(default)]
    pub contests: BTreeMap<String, BTreeMap<SettingKey, SettingValue>>,
}

/// Account credentials taken from the environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub identity: Option<String>,
    pub secret: Option<String>,
    pub token: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment, ignoring blank values.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            identity: read(IDENTITY_ENV),
            secret: read(SECRET_ENV),
            token: read(TOKEN_ENV),
        }
    }

    /// Identity and secret when both are present.
    #[must_use]
    pub fn login(&self) -> Option<(&str, &str)> {
        match (&self.identity, &self.secret) {
            (Some(identity), Some(secret)) => Some((identity, secret)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &redact(&self.secret))
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Contest backend selection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Delay between contests within one run.
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Watch mode interval.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Voting settings layers.
    #[serde(default)]
    pub voting: VotingConfig,

    /// Populated from the environment by [`Config::load`].
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    ///
    /// Credentials are left empty; [`Config::load`] fills them from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, names an unknown setting
    /// or fails validation.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and credentials from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Config::parse_toml`]
    /// fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        config.credentials = Credentials::from_env();
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.backend.mode == BackendMode::Live && self.backend.live.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.backend.live.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= min_delay_ms".to_string(),
            }
            .into());
        }
        if self.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        for (contest_id, values) in &self.voting.contests {
            if contest_id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "voting.contests",
                    reason: "contest id must not be empty".to_string(),
                }
                .into());
            }
            for (key, value) in values {
                key.validate(*value)?;
            }
        }
        for (key, value) in &self.voting.defaults {
            key.validate(*value)?;
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with the logging configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Build the settings store from the `[voting]` tables.
    pub fn settings_store(&self) -> Result<SettingsStore> {
        let mut store = SettingsStore::new();
        for (key, value) in &self.voting.defaults {
            store.set_global(*key, *value)?;
        }
        for (contest_id, values) in &self.voting.contests {
            let contest_id = ContestId::new(contest_id.as_str());
            for (key, value) in values {
                store.set_override(&contest_id, *key, *value)?;
            }
        }
        Ok(store)
    }

    /// Pacing between contests.
    #[must_use]
    pub fn pacing(&self) -> Pacing {
        Pacing::new(
            Duration::from_millis(self.pacing.min_delay_ms),
            Duration::from_millis(self.pacing.max_delay_ms),
        )
    }

    /// Interval between runs in watch mode.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_secs)
    }
}
