//! Outbound adapters (driven side).

pub mod live;
pub mod notifier;
pub mod synthetic;
