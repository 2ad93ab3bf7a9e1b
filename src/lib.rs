//! Votepilot - automated voting and boosting for time-boxed photo contests.
//!
//! A run walks the user's active contests, decides per contest whether to
//! apply the one-time boost and whether to cast votes toward an exposure
//! target, and performs those actions against a contest backend.
//!
//! # Architecture
//!
//! - **`domain`** - Contests, settings schema, decisions and run counters
//! - **`port`** - Traits for the contest backend, clock and notifiers
//! - **`application`** - Settings resolution, the decision evaluator, vote
//!   selection and the run loop
//! - **`adapter`** - Live REST and synthetic backends, log notifier, CLI
//! - **`infrastructure`** - Configuration, logging, wiring and scheduling
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use votepilot::adapter::outbound::synthetic::{SyntheticBackend, SyntheticConfig};
//! use votepilot::application::orchestration::{ExposureTarget, VotingEngine};
//! use votepilot::application::settings::SettingsStore;
//! use votepilot::domain::Token;
//! use votepilot::port::SystemClock;
//!
//! # async fn demo() {
//! let backend = Arc::new(SyntheticBackend::new(
//!     SyntheticConfig::default(),
//!     Arc::new(SystemClock),
//! ));
//! let engine = VotingEngine::new(backend, Arc::new(SettingsStore::new()));
//! let outcome = engine
//!     .run(&Token::new("offline"), &ExposureTarget::Fixed(80.0))
//!     .await;
//! println!("{}", outcome.message());
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
