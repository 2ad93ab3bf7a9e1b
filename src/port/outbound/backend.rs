//! Contest backend port.
//!
//! Every operation maps to exactly one remote action. Implementations surface
//! failures as [`BackendError`] without retrying; expected domain outcomes
//! (boost already used, missing vote pool) come back as values.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Contest, EntryId, Token, VotableItem, VotePool};
use crate::error::BackendError;

/// Votes to cast in one contest, with the target they aim for.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteBatch {
    pub items: Vec<VotableItem>,
    pub exposure_target: f64,
}

impl VoteBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Summed exposure increment of the batch.
    #[must_use]
    pub fn exposure_gain(&self) -> f64 {
        self.items.iter().map(|item| item.exposure_ratio).sum()
    }
}

/// Acknowledgement of a vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Number of votes the service accepted.
    pub accepted: usize,
}

/// Why a boost request did not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostRejection {
    AlreadyUsed,
    Unavailable,
    NoEligibleEntry,
}

impl fmt::Display for BoostRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyUsed => f.write_str("boost already used"),
            Self::Unavailable => f.write_str("boost unavailable"),
            Self::NoEligibleEntry => f.write_str("no entry eligible for boost"),
        }
    }
}

/// Result of a boost request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoostOutcome {
    Applied { entry_id: EntryId },
    Rejected(BoostRejection),
}

impl BoostOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Remote contest service.
///
/// The orchestration loop depends only on this trait, so the live client and
/// the offline simulation are interchangeable.
#[async_trait]
pub trait ContestBackend: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Token, BackendError>;

    /// Contests the user is currently taking part in.
    async fn list_active_contests(&self, token: &Token) -> Result<Vec<Contest>, BackendError>;

    /// Candidate items for voting, or `None` when the contest has no pool.
    async fn fetch_votable_items(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<Option<VotePool>, BackendError>;

    /// Cast votes for every item in the batch.
    async fn submit_votes(
        &self,
        batch: &VoteBatch,
        contest: &Contest,
        token: &Token,
    ) -> Result<Ack, BackendError>;

    /// Apply the contest's one-time boost to an eligible entry.
    async fn apply_boost(&self, contest: &Contest, token: &Token)
        -> Result<BoostOutcome, BackendError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}
