//! Offline contest backend.
//!
//! Generates plausible contests and vote pools on first request and caches
//! them for the lifetime of the instance, so repeated polls within a session
//! see stable data. Votes and boosts update the cached contests the way the
//! live service would. The cache belongs to one instance and is cleared with
//! [`SyntheticBackend::reset`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

use super::settings::SyntheticConfig;
use crate::domain::{
    BoostState, Contest, ContestId, Entry, Token, VotableItem, VotePool, MAX_EXPOSURE,
};
use crate::error::BackendError;
use crate::port::{Ack, BoostOutcome, BoostRejection, Clock, ContestBackend, VoteBatch};

/// Backend operation, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchVotableItems,
    SubmitVotes,
    ApplyBoost,
}

/// Generated data for one session.
#[derive(Debug, Default)]
struct Session {
    contests: Option<Vec<Contest>>,
    pools: HashMap<ContestId, Vec<VotableItem>>,
}

impl Session {
    fn contest_mut(&mut self, id: &ContestId) -> Option<&mut Contest> {
        self.contests
            .as_mut()
            .and_then(|contests| contests.iter_mut().find(|c| &c.id == id))
    }
}

/// Deterministic in-process stand-in for the contest service.
pub struct SyntheticBackend {
    config: SyntheticConfig,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    session: Mutex<Session>,
    faults: Mutex<HashSet<(ContestId, Operation)>>,
    listing_fails: AtomicBool,
}

impl SyntheticBackend {
    #[must_use]
    pub fn new(config: SyntheticConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            clock,
            rng: Mutex::new(rng),
            session: Mutex::new(Session::default()),
            faults: Mutex::new(HashSet::new()),
            listing_fails: AtomicBool::new(false),
        }
    }

    /// Seed the session with fixed contests instead of generated ones.
    #[must_use]
    pub fn with_contests(self, contests: Vec<Contest>) -> Self {
        self.session.lock().contests = Some(contests);
        self
    }

    /// Seed a fixed vote pool for one contest.
    #[must_use]
    pub fn with_vote_pool(self, contest_id: &ContestId, items: Vec<VotableItem>) -> Self {
        self.session.lock().pools.insert(contest_id.clone(), items);
        self
    }

    /// Make one operation on one contest fail with a transport error.
    pub fn fail_on(&self, contest_id: &ContestId, operation: Operation) {
        self.faults.lock().insert((contest_id.clone(), operation));
    }

    /// Make contest listing fail with a transport error.
    pub fn fail_listing(&self, fail: bool) {
        self.listing_fails.store(fail, Ordering::Release);
    }

    /// Drop all generated data and injected faults.
    pub fn reset(&self) {
        *self.session.lock() = Session::default();
        self.faults.lock().clear();
        self.listing_fails.store(false, Ordering::Release);
    }

    /// Current session state of a contest.
    #[must_use]
    pub fn contest(&self, id: &ContestId) -> Option<Contest> {
        self.session.lock().contest_mut(id).cloned()
    }

    fn check_token(token: &Token) -> Result<(), BackendError> {
        if token.is_empty() {
            return Err(BackendError::Auth("missing or invalid token".into()));
        }
        Ok(())
    }

    fn check_fault(&self, contest_id: &ContestId, operation: Operation) -> Result<(), BackendError> {
        if self.faults.lock().contains(&(contest_id.clone(), operation)) {
            return Err(BackendError::Transport(format!(
                "injected {operation:?} failure for {contest_id}"
            )));
        }
        Ok(())
    }

    fn generate_contests(&self) -> Vec<Contest> {
        let now = self.clock.now();
        let mut rng = self.rng.lock();
        (0..self.config.contests)
            .map(|index| {
                let id = ContestId::new(format!("syn-{}", index + 1));
                let boost = match rng.gen_range(0..3) {
                    0 => BoostState::Available {
                        deadline: now + rng.gen_range(300..7_200),
                    },
                    1 => BoostState::Used,
                    _ => BoostState::Unavailable,
                };
                let entries = (0..rng.gen_range(1..=4))
                    .map(|n| Entry::new(format!("{id}-e{}", n + 1), false))
                    .collect::<Vec<_>>();
                let mut contest = Contest {
                    title: format!("Synthetic contest {}", index + 1),
                    start_time: now - rng.gen_range(3_600..172_800),
                    close_time: now + rng.gen_range(600..259_200),
                    boost,
                    exposure_factor: f64::from(rng.gen_range(0..1_000_u32)) / 10.0,
                    entries,
                    id,
                };
                if contest.boost == BoostState::Used {
                    if let Some(first) = contest.entries.first_mut() {
                        first.boosted = true;
                    }
                }
                contest
            })
            .collect()
    }

    fn generate_pool(&self, contest_id: &ContestId, index: usize) -> Vec<VotableItem> {
        let every = self.config.empty_pool_every;
        if every > 0 && (index + 1) % every == 0 {
            return Vec::new();
        }
        let mut rng = self.rng.lock();
        (0..self.config.pool_size)
            .map(|n| {
                let ratio = f64::from(rng.gen_range(5..50_u32)) / 10.0;
                VotableItem::new(format!("{contest_id}-p{}", n + 1), ratio)
            })
            .collect()
    }
}

#[async_trait]
impl ContestBackend for SyntheticBackend {
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Token, BackendError> {
        if identity.trim().is_empty() || secret.is_empty() {
            return Err(BackendError::Auth("identity and secret are required".into()));
        }
        Ok(Token::new(format!("synthetic-{}", Uuid::new_v4())))
    }

    async fn list_active_contests(&self, token: &Token) -> Result<Vec<Contest>, BackendError> {
        Self::check_token(token)?;
        if self.listing_fails.load(Ordering::Acquire) {
            return Err(BackendError::Transport("injected listing failure".into()));
        }

        let cached = self.session.lock().contests.clone();
        if let Some(contests) = cached {
            return Ok(contests);
        }
        let contests = self.generate_contests();
        debug!(count = contests.len(), "Generated synthetic contests");
        let mut session = self.session.lock();
        Ok(session.contests.get_or_insert(contests).clone())
    }

    async fn fetch_votable_items(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<Option<VotePool>, BackendError> {
        Self::check_token(token)?;
        self.check_fault(&contest.id, Operation::FetchVotableItems)?;

        let (index, exposure, cached) = {
            let session = self.session.lock();
            let Some((index, current)) = session
                .contests
                .iter()
                .flatten()
                .enumerate()
                .find(|(_, c)| c.id == contest.id)
            else {
                return Ok(None);
            };
            (
                index,
                current.exposure_factor,
                session.pools.get(&contest.id).cloned(),
            )
        };

        let items = match cached {
            Some(items) => items,
            None => {
                let items = self.generate_pool(&contest.id, index);
                self.session
                    .lock()
                    .pools
                    .entry(contest.id.clone())
                    .or_insert(items)
                    .clone()
            }
        };

        Ok(Some(VotePool {
            items,
            starting_exposure: exposure,
        }))
    }

    async fn submit_votes(
        &self,
        batch: &VoteBatch,
        contest: &Contest,
        token: &Token,
    ) -> Result<Ack, BackendError> {
        Self::check_token(token)?;
        self.check_fault(&contest.id, Operation::SubmitVotes)?;

        let mut session = self.session.lock();
        let Some(current) = session.contest_mut(&contest.id) else {
            return Err(BackendError::Status {
                status: 404,
                body: format!("unknown contest {}", contest.id),
            });
        };
        current.exposure_factor =
            (current.exposure_factor + batch.exposure_gain()).min(MAX_EXPOSURE);
        Ok(Ack {
            accepted: batch.len(),
        })
    }

    async fn apply_boost(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<BoostOutcome, BackendError> {
        Self::check_token(token)?;
        self.check_fault(&contest.id, Operation::ApplyBoost)?;

        let now = self.clock.now();
        let mut session = self.session.lock();
        let Some(current) = session.contest_mut(&contest.id) else {
            return Err(BackendError::Status {
                status: 404,
                body: format!("unknown contest {}", contest.id),
            });
        };

        match current.boost {
            BoostState::Used => return Ok(BoostOutcome::Rejected(BoostRejection::AlreadyUsed)),
            BoostState::Unavailable => {
                return Ok(BoostOutcome::Rejected(BoostRejection::Unavailable))
            }
            BoostState::Available { deadline } if deadline <= now => {
                return Ok(BoostOutcome::Rejected(BoostRejection::Unavailable))
            }
            BoostState::Available { .. } => {}
        }

        let Some(entry) = current.entries.iter_mut().find(|e| !e.boosted) else {
            return Ok(BoostOutcome::Rejected(BoostRejection::NoEligibleEntry));
        };
        entry.boosted = true;
        let entry_id = entry.id.clone();
        current.boost = BoostState::Used;
        Ok(BoostOutcome::Applied { entry_id })
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock::FixedClock;

    const NOW: i64 = 1_700_000_000;

    fn backend(config: SyntheticConfig) -> SyntheticBackend {
        SyntheticBackend::new(config, Arc::new(FixedClock::new(NOW)))
    }

    fn seeded() -> SyntheticConfig {
        SyntheticConfig {
            seed: Some(42),
            ..SyntheticConfig::default()
        }
    }

    fn token() -> Token {
        Token::new("t")
    }

    #[tokio::test]
    async fn repeated_polls_are_stable() {
        let backend = backend(seeded());
        let first = backend.list_active_contests(&token()).await.unwrap();
        let second = backend.list_active_contests(&token()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);

        let pool_a = backend.fetch_votable_items(&first[0], &token()).await.unwrap();
        let pool_b = backend.fetch_votable_items(&first[0], &token()).await.unwrap();
        assert_eq!(pool_a, pool_b);
    }

    #[tokio::test]
    async fn same_seed_gives_same_session() {
        let a = backend(seeded()).list_active_contests(&token()).await.unwrap();
        let b = backend(seeded()).list_active_contests(&token()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn reset_clears_the_session() {
        let backend = backend(SyntheticConfig::default()).with_contests(vec![]);
        assert!(backend.list_active_contests(&token()).await.unwrap().is_empty());
        backend.reset();
        assert_eq!(backend.list_active_contests(&token()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let backend = backend(seeded());
        let err = backend
            .list_active_contests(&Token::new(""))
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn authenticate_requires_credentials() {
        let backend = backend(seeded());
        assert!(backend.authenticate("", "pw").await.unwrap_err().is_auth());
        let issued = backend.authenticate("me", "pw").await.unwrap();
        assert!(issued.as_str().starts_with("synthetic-"));
    }

    #[tokio::test]
    async fn every_nth_pool_is_empty() {
        let backend = backend(SyntheticConfig {
            empty_pool_every: 2,
            ..seeded()
        });
        let contests = backend.list_active_contests(&token()).await.unwrap();
        let second = backend
            .fetch_votable_items(&contests[1], &token())
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_empty());
        let first = backend
            .fetch_votable_items(&contests[0], &token())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.len(), 12);
    }

    #[tokio::test]
    async fn votes_raise_exposure_up_to_the_cap() {
        let backend = backend(seeded());
        let contests = backend.list_active_contests(&token()).await.unwrap();
        let contest = &contests[0];
        let batch = VoteBatch {
            items: vec![VotableItem::new("x", 500.0)],
            exposure_target: 100.0,
        };
        let ack = backend.submit_votes(&batch, contest, &token()).await.unwrap();
        assert_eq!(ack.accepted, 1);
        assert_eq!(backend.contest(&contest.id).unwrap().exposure_factor, MAX_EXPOSURE);
    }

    #[tokio::test]
    async fn boost_applies_once_then_reports_used() {
        let contest = Contest {
            id: ContestId::from("c1"),
            title: "Boostable".into(),
            start_time: NOW - 10,
            close_time: NOW + 10_000,
            boost: BoostState::Available { deadline: NOW + 600 },
            exposure_factor: 10.0,
            entries: vec![Entry::new("e1", false)],
        };
        let backend = backend(seeded()).with_contests(vec![contest.clone()]);

        let first = backend.apply_boost(&contest, &token()).await.unwrap();
        assert!(first.is_applied());
        assert_eq!(backend.contest(&contest.id).unwrap().boost, BoostState::Used);

        let second = backend.apply_boost(&contest, &token()).await.unwrap();
        assert_eq!(second, BoostOutcome::Rejected(BoostRejection::AlreadyUsed));
    }

    #[tokio::test]
    async fn injected_faults_surface_as_transport_errors() {
        let backend = backend(seeded());
        let contests = backend.list_active_contests(&token()).await.unwrap();
        backend.fail_on(&contests[0].id, Operation::FetchVotableItems);
        let err = backend
            .fetch_votable_items(&contests[0], &token())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));

        backend.fail_listing(true);
        assert!(backend.list_active_contests(&token()).await.is_err());
    }

    #[tokio::test]
    async fn unknown_contest_has_no_pool() {
        let backend = backend(seeded()).with_contests(vec![]);
        let stray = Contest {
            id: ContestId::from("ghost"),
            title: String::new(),
            start_time: 0,
            close_time: 0,
            boost: BoostState::Unavailable,
            exposure_factor: 0.0,
            entries: vec![],
        };
        assert!(backend
            .fetch_votable_items(&stray, &token())
            .await
            .unwrap()
            .is_none());
    }
}
