//! Live contest service adapter.

mod client;
mod dto;
mod settings;

pub use client::LiveBackend;
pub use settings::LiveConfig;
