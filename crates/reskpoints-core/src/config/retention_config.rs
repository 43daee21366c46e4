use serde::{Deserialize, Serialize};

use super::defaults;

/// Age-based eviction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Nodes older than this (by event timestamp) are evicted by the sweep.
    pub horizon_secs: u64,
    /// Interval between retention sweeps (seconds). Scheduling is up to the host.
    pub sweep_interval_secs: u64,
}

impl RetentionConfig {
    /// Saturates at `TimeDelta::MAX` for values `validate` would reject.
    pub fn horizon(&self) -> chrono::Duration {
        i64::try_from(self.horizon_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            horizon_secs: defaults::DEFAULT_RETENTION_HORIZON_SECS,
            sweep_interval_secs: defaults::DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}
