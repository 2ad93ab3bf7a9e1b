//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's dependencies on the remote contest
//! service, the clock and event delivery.

pub mod backend;
pub mod clock;
pub mod notifier;
