//! REST client for the live contest service.
//!
//! Each trait operation issues exactly one request with the bearer token.
//! Nothing is retried here; the caller decides what a failure means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::dto::{
    BoostRequest, BoostResponse, ContestsResponse, ItemDto, LoginRequest, LoginResponse,
    VotePoolResponse, VoteRequest, VoteResponse,
};
use super::settings::LiveConfig;
use crate::domain::{BoostState, Contest, Token, VotePool};
use crate::error::BackendError;
use crate::port::{Ack, BoostOutcome, BoostRejection, ContestBackend, VoteBatch};

/// HTTP client for the contest REST API.
pub struct LiveBackend {
    http: HttpClient,
    base_url: Url,
}

impl LiveBackend {
    /// Build a client from configuration.
    pub fn from_config(config: &LiveConfig) -> Result<Self, BackendError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("votepilot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, &config.api_url)
    }

    /// Use an existing HTTP client against `api_url`.
    pub fn with_client(http: HttpClient, api_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "API URL cannot carry paths: {api_url}"
            )));
        }
        Ok(Self { http, base_url })
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Transport("API URL cannot carry paths".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(request: RequestBuilder, token: &Token) -> Result<RequestBuilder, BackendError> {
        if token.is_empty() {
            return Err(BackendError::Auth("missing token".into()));
        }
        Ok(request.bearer_auth(token.as_str()))
    }

    /// Map auth and error statuses, leaving successful responses untouched.
    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Auth(format!("{status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ContestBackend for LiveBackend {
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Token, BackendError> {
        let url = self.endpoint(&["auth", "login"])?;
        info!(url = %url, "Authenticating");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest { identity, secret })
            .send()
            .await?;
        let login: LoginResponse = Self::decode(response).await?;
        let token = Token::new(login.token);
        if token.is_empty() {
            return Err(BackendError::Auth("service returned an empty token".into()));
        }
        Ok(token)
    }

    async fn list_active_contests(&self, token: &Token) -> Result<Vec<Contest>, BackendError> {
        let url = self.endpoint(&["contests", "active"])?;
        let response = Self::authorized(self.http.get(url), token)?.send().await?;
        let body: ContestsResponse = Self::decode(response).await?;

        let contests: Vec<Contest> = body.contests.into_iter().map(Contest::from).collect();
        debug!(count = contests.len(), "Fetched active contests");
        Ok(contests)
    }

    async fn fetch_votable_items(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<Option<VotePool>, BackendError> {
        let url = self.endpoint(&["contests", contest.id.as_str(), "vote-pool"])?;
        let response = Self::authorized(self.http.get(url), token)?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(contest_id = %contest.id, "No vote pool");
            return Ok(None);
        }
        let body: VotePoolResponse = Self::decode(response).await?;

        let received = body.items.len();
        let items: Vec<_> = body
            .items
            .into_iter()
            .filter(ItemDto::is_votable)
            .map(Into::into)
            .collect();
        if items.len() < received {
            debug!(
                contest_id = %contest.id,
                dropped = received - items.len(),
                "Dropped items without a positive exposure ratio"
            );
        }

        Ok(Some(VotePool {
            items,
            starting_exposure: body.exposure_factor,
        }))
    }

    async fn submit_votes(
        &self,
        batch: &VoteBatch,
        contest: &Contest,
        token: &Token,
    ) -> Result<Ack, BackendError> {
        let url = self.endpoint(&["contests", contest.id.as_str(), "votes"])?;
        let request = VoteRequest {
            item_ids: batch.items.iter().map(|item| item.id.as_str()).collect(),
            exposure_target: batch.exposure_target,
        };
        let response = Self::authorized(self.http.post(url), token)?
            .json(&request)
            .send()
            .await?;
        let body: VoteResponse = Self::decode(response).await?;

        debug!(contest_id = %contest.id, accepted = body.accepted, "Votes submitted");
        Ok(Ack {
            accepted: body.accepted,
        })
    }

    async fn apply_boost(
        &self,
        contest: &Contest,
        token: &Token,
    ) -> Result<BoostOutcome, BackendError> {
        match contest.boost {
            BoostState::Available { .. } => {}
            BoostState::Used => return Ok(BoostOutcome::Rejected(BoostRejection::AlreadyUsed)),
            BoostState::Unavailable => {
                return Ok(BoostOutcome::Rejected(BoostRejection::Unavailable))
            }
        }
        let Some(entry) = contest.boost_target() else {
            return Ok(BoostOutcome::Rejected(BoostRejection::NoEligibleEntry));
        };

        let url = self.endpoint(&["contests", contest.id.as_str(), "boost"])?;
        let response = Self::authorized(self.http.post(url), token)?
            .json(&BoostRequest {
                entry_id: entry.id.as_str(),
            })
            .send()
            .await?;
        if response.status() == StatusCode::CONFLICT {
            return Ok(BoostOutcome::Rejected(BoostRejection::Unavailable));
        }
        let body: BoostResponse = Self::decode(response).await?;
        if !body.accepted {
            return Ok(BoostOutcome::Rejected(BoostRejection::Unavailable));
        }

        info!(contest_id = %contest.id, entry_id = %entry.id, "Boost applied");
        Ok(BoostOutcome::Applied {
            entry_id: entry.id.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "live"
    }
}
