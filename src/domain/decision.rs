//! Outcome of evaluating one contest snapshot.

use std::fmt;

/// Why voting was or was not chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoteReason {
    OnlyBoost,
    TargetReached { exposure: f64, target: f64 },
    NotStarted { starts_in: i64 },
    OutsideFinalWindow { remaining: i64, threshold: i64 },
    BelowTarget { exposure: f64, target: f64 },
}

impl fmt::Display for VoteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnlyBoost => f.write_str("only-boost mode"),
            Self::TargetReached { exposure, target } => {
                write!(f, "exposure {exposure} already at target {target}")
            }
            Self::NotStarted { starts_in } => write!(f, "contest opens in {starts_in}s"),
            Self::OutsideFinalWindow {
                remaining,
                threshold,
            } => write!(f, "{remaining}s left, final window is {threshold}s"),
            Self::BelowTarget { exposure, target } => {
                write!(f, "exposure {exposure} below target {target}")
            }
        }
    }
}

/// Why the boost was or was not chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostReason {
    NotAvailable,
    DeadlinePassed,
    TooEarly { deadline_in: i64, lead_time: i64 },
    WithinLeadTime { deadline_in: i64 },
}

impl fmt::Display for BoostReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => f.write_str("boost not available"),
            Self::DeadlinePassed => f.write_str("boost deadline passed"),
            Self::TooEarly {
                deadline_in,
                lead_time,
            } => write!(f, "boost deadline in {deadline_in}s, lead time {lead_time}s"),
            Self::WithinLeadTime { deadline_in } => {
                write!(f, "boost deadline in {deadline_in}s")
            }
        }
    }
}

/// Whether to vote and whether to boost, with the reasons behind each.
///
/// The reasons are for observability only; control flow reads the flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub should_vote: bool,
    pub should_boost: bool,
    pub vote_reason: VoteReason,
    pub boost_reason: BoostReason,
}

impl Decision {
    /// Human-readable explanation combining both branches.
    #[must_use]
    pub fn reason(&self) -> String {
        format!("vote: {}; boost: {}", self.vote_reason, self.boost_reason)
    }

    /// True when neither action is due.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.should_vote && !self.should_boost
    }
}
