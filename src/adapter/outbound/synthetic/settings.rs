//! Synthetic backend configuration.

use serde::Deserialize;

/// Shape of the generated offline session.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    /// RNG seed; omit for a different session on every start.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of active contests to generate.
    #[serde(default = "default_contests")]
    pub contests: usize,
    /// Number of votable items per contest pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Every Nth contest gets an empty vote pool (0 = never).
    #[serde(default)]
    pub empty_pool_every: usize,
}

const fn default_contests() -> usize {
    4
}

const fn default_pool_size() -> usize {
    12
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: None,
            contests: default_contests(),
            pool_size: default_pool_size(),
            empty_pool_every: 0,
        }
    }
}
