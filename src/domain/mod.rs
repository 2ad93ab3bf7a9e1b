//! Backend-agnostic domain types: contests, settings schema and decisions.
//!
//! Nothing in here performs I/O or reads the clock.

pub mod contest;
pub mod decision;
pub mod id;
pub mod run;
pub mod settings;

pub use contest::{BoostState, Contest, Entry, VotableItem, VotePool, MAX_EXPOSURE};
pub use decision::{BoostReason, Decision, VoteReason};
pub use id::{ContestId, EntryId, ItemId, Token};
pub use run::RunSummary;
pub use settings::{EffectiveSettings, SettingKey, SettingKind, SettingValue};
