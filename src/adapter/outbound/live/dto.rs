//! Wire types for the contest REST API.

use serde::{Deserialize, Serialize};

use crate::domain::{BoostState, Contest, ContestId, Entry, VotableItem};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub identity: &'a str,
    pub secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ContestsResponse {
    #[serde(default)]
    pub contests: Vec<ContestDto>,
}

#[derive(Debug, Deserialize)]
pub struct ContestDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start_time: i64,
    pub close_time: i64,
    #[serde(default)]
    pub boost: BoostDto,
    #[serde(default)]
    pub exposure_factor: f64,
    #[serde(default)]
    pub entries: Vec<EntryDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoostDto {
    #[serde(default)]
    pub state: BoostStateDto,
    #[serde(default)]
    pub deadline: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostStateDto {
    Available,
    Used,
    #[default]
    Unavailable,
}

#[derive(Debug, Deserialize)]
pub struct EntryDto {
    pub id: String,
    #[serde(default)]
    pub boosted: bool,
}

#[derive(Debug, Deserialize)]
pub struct VotePoolResponse {
    #[serde(default)]
    pub exposure_factor: f64,
    #[serde(default)]
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Deserialize)]
pub struct ItemDto {
    pub id: String,
    pub exposure_ratio: f64,
}

impl ItemDto {
    /// Only items that raise exposure can be voted for.
    #[must_use]
    pub fn is_votable(&self) -> bool {
        self.exposure_ratio.is_finite() && self.exposure_ratio > 0.0
    }
}

#[derive(Debug, Serialize)]
pub struct VoteRequest<'a> {
    pub item_ids: Vec<&'a str>,
    pub exposure_target: f64,
}

#[derive(Debug, Deserialize)]
pub struct VoteResponse {
    #[serde(default)]
    pub accepted: usize,
}

#[derive(Debug, Serialize)]
pub struct BoostRequest<'a> {
    pub entry_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct BoostResponse {
    #[serde(default)]
    pub accepted: bool,
}

impl From<BoostDto> for BoostState {
    fn from(dto: BoostDto) -> Self {
        match (dto.state, dto.deadline) {
            (BoostStateDto::Available, Some(deadline)) => Self::Available { deadline },
            (BoostStateDto::Used, _) => Self::Used,
            // An available boost without a deadline cannot be scheduled.
            (BoostStateDto::Available, None) | (BoostStateDto::Unavailable, _) => {
                Self::Unavailable
            }
        }
    }
}

impl From<ContestDto> for Contest {
    fn from(dto: ContestDto) -> Self {
        Self {
            id: ContestId::new(dto.id),
            title: dto.title,
            start_time: dto.start_time,
            close_time: dto.close_time,
            boost: dto.boost.into(),
            exposure_factor: dto.exposure_factor,
            entries: dto
                .entries
                .into_iter()
                .map(|e| Entry::new(e.id, e.boosted))
                .collect(),
        }
    }
}

impl From<ItemDto> for VotableItem {
    fn from(dto: ItemDto) -> Self {
        Self::new(dto.id, dto.exposure_ratio)
    }
}
