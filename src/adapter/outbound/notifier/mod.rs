//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for event sinks.

mod logger;

pub use logger::LogNotifier;
