//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving adapters: the command-line interface.
//! - [`outbound`] - Driven adapters: contest backends and notifiers.

pub mod inbound;
pub mod outbound;
