//! Offline contest backend for dry runs and tests.

mod backend;
mod settings;

pub use backend::{Operation, SyntheticBackend};
pub use settings::SyntheticConfig;
