//! Run orchestration: the contest loop, its pacing and cancellation.

mod cancel;
mod engine;
mod outcome;
mod pacing;

pub use cancel::Cancellation;
pub use engine::VotingEngine;
pub use outcome::{ExposureTarget, FailureKind, RunOutcome};
pub use pacing::Pacing;
