//! Layered settings resolution.
//!
//! Three scopes, highest precedence first:
//!
//! 1. per-contest override (`contest id -> key -> value`)
//! 2. global default (`key -> value`)
//! 3. schema default ([`SettingKey::default_value`])
//!
//! Values are validated against the schema when written, so [`SettingsStore::resolve`]
//! never fails for a schema key.

use std::collections::HashMap;

use crate::domain::{ContestId, EffectiveSettings, SettingKey, SettingValue};
use crate::error::ConfigError;

/// Global defaults plus per-contest overrides.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    globals: HashMap<SettingKey, SettingValue>,
    overrides: HashMap<ContestId, HashMap<SettingKey, SettingValue>>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a global default after checking it against the schema.
    pub fn set_global(
        &mut self,
        key: SettingKey,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigError> {
        let value = key.validate(value.into())?;
        self.globals.insert(key, value);
        Ok(())
    }

    /// Set an override for one contest after checking it against the schema.
    pub fn set_override(
        &mut self,
        contest_id: &ContestId,
        key: SettingKey,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigError> {
        let value = key.validate(value.into())?;
        self.overrides
            .entry(contest_id.clone())
            .or_default()
            .insert(key, value);
        Ok(())
    }

    /// Drop every override for a contest.
    pub fn clear_override(&mut self, contest_id: &ContestId) {
        self.overrides.remove(contest_id);
    }

    /// Contests that carry at least one override.
    pub fn overridden_contests(&self) -> impl Iterator<Item = &ContestId> {
        self.overrides.keys()
    }

    /// Effective value of `key` for a contest.
    #[must_use]
    pub fn resolve(&self, key: SettingKey, contest_id: &ContestId) -> SettingValue {
        self.overrides
            .get(contest_id)
            .and_then(|layer| layer.get(&key))
            .copied()
            .unwrap_or_else(|| self.resolve_global(key))
    }

    /// Value of `key` from the global layer or the schema default.
    #[must_use]
    pub fn resolve_global(&self, key: SettingKey) -> SettingValue {
        self.globals
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    /// Resolve a key given by name; unknown names are a configuration error.
    pub fn resolve_named(
        &self,
        name: &str,
        contest_id: &ContestId,
    ) -> Result<SettingValue, ConfigError> {
        let key: SettingKey = name.parse()?;
        Ok(self.resolve(key, contest_id))
    }

    /// Typed settings for one contest.
    pub fn effective(&self, contest_id: &ContestId) -> Result<EffectiveSettings, ConfigError> {
        EffectiveSettings::from_lookup(|key| self.resolve(key, contest_id))
    }

    /// Typed settings without any contest override.
    pub fn effective_global(&self) -> Result<EffectiveSettings, ConfigError> {
        EffectiveSettings::from_lookup(|key| self.resolve_global(key))
    }
}
