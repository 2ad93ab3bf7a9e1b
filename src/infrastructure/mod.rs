//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing voting
//! logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`scheduler`] - Interval runs with shutdown

pub mod bootstrap;
pub mod config;
pub mod scheduler;
