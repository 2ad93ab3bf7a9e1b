//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`] - A settable [`Clock`](crate::port::Clock).
//! - [`domain`] - Builders for contests and vote pools.
//! - [`notifier`] - An event-recording [`Notifier`](crate::port::Notifier).

pub mod clock;
pub mod domain;
pub mod notifier;
