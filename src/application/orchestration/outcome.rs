//! Terminal result of a run and the exposure-target indirection.

use std::fmt;
use std::sync::Arc;

use crate::domain::{Contest, RunSummary};

/// Why a run could not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The token was refused. Retrying with it cannot succeed.
    Auth,
    /// The contest list could not be fetched.
    Listing,
    /// A setting or target override was invalid.
    Config,
    /// Another run was already active on the engine.
    Busy,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every contest was visited.
    Completed(RunSummary),
    /// Cancellation was requested; remaining contests were not touched.
    Cancelled(RunSummary),
    /// The run could not proceed.
    Failed { kind: FailureKind, error: String },
}

impl RunOutcome {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// True when the run stopped because the backend refused the token.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                kind: FailureKind::Auth,
                ..
            }
        )
    }

    /// Short human-readable result.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Completed(summary) => format!(
                "processed {} of {} contests: {} boosts, {} votes in {} batches",
                summary.contests_processed,
                summary.contests_seen,
                summary.boosts_applied,
                summary.votes_cast,
                summary.vote_batches
            ),
            Self::Cancelled(_) => "cancelled".to_string(),
            Self::Failed { error, .. } => error.clone(),
        }
    }

    /// Counters, unless the run failed before producing any.
    #[must_use]
    pub const fn summary(&self) -> Option<&RunSummary> {
        match self {
            Self::Completed(summary) | Self::Cancelled(summary) => Some(summary),
            Self::Failed { .. } => None,
        }
    }
}

type TargetFn = dyn Fn(&Contest) -> f64 + Send + Sync;

/// Where a run takes each contest's exposure target from.
#[derive(Clone, Default)]
pub enum ExposureTarget {
    /// Use the resolved `exposure_target` setting.
    #[default]
    FromSettings,
    /// Same target for every contest.
    Fixed(f64),
    /// Computed per contest by the caller.
    PerContest(Arc<TargetFn>),
}

impl ExposureTarget {
    pub fn per_contest<F>(f: F) -> Self
    where
        F: Fn(&Contest) -> f64 + Send + Sync + 'static,
    {
        Self::PerContest(Arc::new(f))
    }

    /// Target override for `contest`, if any.
    #[must_use]
    pub fn for_contest(&self, contest: &Contest) -> Option<f64> {
        match self {
            Self::FromSettings => None,
            Self::Fixed(target) => Some(*target),
            Self::PerContest(f) => Some(f(contest)),
        }
    }
}

impl fmt::Debug for ExposureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromSettings => f.write_str("FromSettings"),
            Self::Fixed(target) => f.debug_tuple("Fixed").field(target).finish(),
            Self::PerContest(_) => f.write_str("PerContest(..)"),
        }
    }
}

impl From<f64> for ExposureTarget {
    fn from(target: f64) -> Self {
        Self::Fixed(target)
    }
}
