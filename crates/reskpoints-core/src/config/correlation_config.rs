use serde::{Deserialize, Serialize};

use super::defaults;

/// Candidate-edge proposal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Sliding window length in seconds. Nodes further apart are never correlated.
    pub window_secs: u64,
    /// Affinity when both events come from the same component.
    pub same_component_affinity: f64,
    /// Affinity when the components are adjacent in the dependency map.
    pub adjacent_affinity: f64,
    /// Pairs already linked at or above this confidence are not re-proposed.
    pub redundancy_cutoff: f64,
}

impl CorrelationConfig {
    /// Saturates at `TimeDelta::MAX` for values `validate` would reject.
    pub fn window(&self) -> chrono::Duration {
        i64::try_from(self.window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            window_secs: defaults::DEFAULT_CORRELATION_WINDOW_SECS,
            same_component_affinity: defaults::DEFAULT_SAME_COMPONENT_AFFINITY,
            adjacent_affinity: defaults::DEFAULT_ADJACENT_AFFINITY,
            redundancy_cutoff: defaults::DEFAULT_REDUNDANCY_CUTOFF,
        }
    }
}
