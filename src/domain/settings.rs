//! Settings schema: the recognised keys, their types, defaults and ranges.
//!
//! The schema is the single source of truth for what a setting means. Stores
//! validate values against it when they are written, so reads never have to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::contest::MAX_EXPOSURE;
use crate::error::ConfigError;

/// A recognised per-contest setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Stop voting once the exposure factor reaches this value.
    ExposureTarget,
    /// Seconds before the boost deadline at which the boost is applied.
    BoostLeadTime,
    /// Never vote, only boost.
    OnlyBoost,
    /// Vote only when the contest is about to close.
    VoteOnlyInFinalWindow,
    /// Seconds before close that count as the final window.
    FinalWindowThreshold,
}

impl SettingKey {
    /// Every key in the schema.
    pub const ALL: [Self; 5] = [
        Self::ExposureTarget,
        Self::BoostLeadTime,
        Self::OnlyBoost,
        Self::VoteOnlyInFinalWindow,
        Self::FinalWindowThreshold,
    ];

    /// Name used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExposureTarget => "exposure_target",
            Self::BoostLeadTime => "boost_lead_time",
            Self::OnlyBoost => "only_boost",
            Self::VoteOnlyInFinalWindow => "vote_only_in_final_window",
            Self::FinalWindowThreshold => "final_window_threshold",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SettingKind {
        match self {
            Self::ExposureTarget | Self::BoostLeadTime | Self::FinalWindowThreshold => {
                SettingKind::Number
            }
            Self::OnlyBoost | Self::VoteOnlyInFinalWindow => SettingKind::Bool,
        }
    }

    /// Built-in default used when no layer sets the key.
    #[must_use]
    pub const fn default_value(&self) -> SettingValue {
        match self {
            Self::ExposureTarget => SettingValue::Number(MAX_EXPOSURE),
            Self::BoostLeadTime => SettingValue::Number(600.0),
            Self::OnlyBoost | Self::VoteOnlyInFinalWindow => SettingValue::Bool(false),
            Self::FinalWindowThreshold => SettingValue::Number(3600.0),
        }
    }

    /// Check a raw value against this key's type and range.
    pub fn validate(&self, value: SettingValue) -> Result<SettingValue, ConfigError> {
        let field = self.as_str();
        match (self.kind(), value) {
            (SettingKind::Bool, SettingValue::Bool(_)) => Ok(value),
            (SettingKind::Number, SettingValue::Number(n)) => {
                if !n.is_finite() {
                    return Err(ConfigError::InvalidValue {
                        field,
                        reason: "must be a finite number".into(),
                    });
                }
                match self {
                    Self::ExposureTarget if n <= 0.0 || n > MAX_EXPOSURE => {
                        Err(ConfigError::InvalidValue {
                            field,
                            reason: format!("must be in (0, {MAX_EXPOSURE}], got {n}"),
                        })
                    }
                    Self::BoostLeadTime | Self::FinalWindowThreshold if n < 0.0 => {
                        Err(ConfigError::InvalidValue {
                            field,
                            reason: format!("must not be negative, got {n}"),
                        })
                    }
                    _ => Ok(value),
                }
            }
            (kind, _) => Err(ConfigError::TypeMismatch {
                key: field,
                expected: kind.as_str(),
            }),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Declared type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Number,
    Bool,
}

impl SettingKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Bool => "boolean",
        }
    }
}

/// Raw setting value as stored in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
}

impl SettingValue {
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(_) => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Typed settings for one contest after all layers are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveSettings {
    pub exposure_target: f64,
    /// Seconds.
    pub boost_lead_time: i64,
    pub only_boost: bool,
    pub vote_only_in_final_window: bool,
    /// Seconds.
    pub final_window_threshold: i64,
}

impl EffectiveSettings {
    /// Build the typed record from a key lookup.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(SettingKey) -> SettingValue,
    {
        Ok(Self {
            exposure_target: number(&mut lookup, SettingKey::ExposureTarget)?,
            boost_lead_time: number(&mut lookup, SettingKey::BoostLeadTime)? as i64,
            only_boost: flag(&mut lookup, SettingKey::OnlyBoost)?,
            vote_only_in_final_window: flag(&mut lookup, SettingKey::VoteOnlyInFinalWindow)?,
            final_window_threshold: number(&mut lookup, SettingKey::FinalWindowThreshold)? as i64,
        })
    }
}

fn number<F>(lookup: &mut F, key: SettingKey) -> Result<f64, ConfigError>
where
    F: FnMut(SettingKey) -> SettingValue,
{
    lookup(key).as_number().ok_or(ConfigError::TypeMismatch {
        key: key.as_str(),
        expected: SettingKind::Number.as_str(),
    })
}

fn flag<F>(lookup: &mut F, key: SettingKey) -> Result<bool, ConfigError>
where
    F: FnMut(SettingKey) -> SettingValue,
{
    lookup(key).as_bool().ok_or(ConfigError::TypeMismatch {
        key: key.as_str(),
        expected: SettingKind::Bool.as_str(),
    })
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            exposure_target: MAX_EXPOSURE,
            boost_lead_time: 600,
            only_boost: false,
            vote_only_in_final_window: false,
            final_window_threshold: 3600,
        }
    }
}
