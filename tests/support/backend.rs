//! Backend wrapper for observing and steering engine runs.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use votepilot::application::orchestration::Cancellation;
use votepilot::domain::{Contest, ContestId, Token, VotePool};
use votepilot::error::BackendError;
use votepilot::port::{Ack, BoostOutcome, ContestBackend, VoteBatch};

/// One backend call as seen by the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Fetch(ContestId),
    Submit(ContestId),
    Boost(ContestId),
}

impl Call {
    pub fn contest(&self) -> Option<&ContestId> {
        match self {
            Self::List => None,
            Self::Fetch(id) | Self::Submit(id) | Self::Boost(id) => Some(id),
        }
    }
}

/// Records every call before delegating to `inner`.
///
/// Can also cancel a run right after votes are submitted for a chosen
/// contest, or park `list_active_contests` until released.
pub struct RecordingBackend {
    inner: Arc<dyn ContestBackend>,
    calls: Mutex<Vec<Call>>,
    cancel_after_submit: Mutex<Option<(ContestId, Cancellation)>>,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
}

impl RecordingBackend {
    pub fn new(inner: Arc<dyn ContestBackend>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            cancel_after_submit: Mutex::new(None),
            gate: Mutex::new(None),
            entered: Notify::new(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, contest_id: &ContestId) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.contest() == Some(contest_id))
            .cloned()
            .collect()
    }

    pub fn cancel_after_submit(&self, contest_id: &ContestId, cancel: Cancellation) {
        *self.cancel_after_submit.lock() = Some((contest_id.clone(), cancel));
    }

    /// Make listing wait until [`RecordingBackend::release_listing`].
    pub fn hold_listing(&self) {
        *self.gate.lock() = Some(Arc::new(Notify::new()));
    }

    /// Let a held listing call through and stop holding later ones.
    pub fn release_listing(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.notify_one();
        }
    }

    /// Resolves once a held listing call has started.
    pub async fn listing_started(&self) {
        self.entered.notified().await;
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ContestBackend for RecordingBackend {
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Token, BackendError> {
        self.inner.authenticate(identity, secret).await
    }

    async fn list_active_contests(&self, token: &Token) -> Result<Vec<Contest>, BackendError> {
        self.record(Call::List);
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        self.inner.list_active_contests(token).await
    }

    async fn fetch_votable_items(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<Option<VotePool>, BackendError> {
        self.record(Call::Fetch(contest.id.clone()));
        self.inner.fetch_votable_items(contest, token).await
    }

    async fn submit_votes(
        &self,
        batch: &VoteBatch,
        contest: &Contest,
        token: &Token,
    ) -> Result<Ack, BackendError> {
        self.record(Call::Submit(contest.id.clone()));
        let ack = self.inner.submit_votes(batch, contest, token).await;
        let trigger = self.cancel_after_submit.lock().clone();
        if let Some((id, cancel)) = trigger {
            if id == contest.id {
                cancel.cancel();
            }
        }
        ack
    }

    async fn apply_boost(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<BoostOutcome, BackendError> {
        self.record(Call::Boost(contest.id.clone()));
        self.inner.apply_boost(contest, token).await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
