use serde::{Deserialize, Serialize};

use super::defaults;

/// Confidence blending configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub temporal_weight: f64,
    pub affinity_weight: f64,
    pub history_weight: f64,
    /// Co-occurrence count at which the history signal saturates at 1.0.
    pub history_saturation: u64,
    /// Candidates scoring below this are discarded instead of stored.
    pub materialization_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            temporal_weight: defaults::DEFAULT_TEMPORAL_WEIGHT,
            affinity_weight: defaults::DEFAULT_AFFINITY_WEIGHT,
            history_weight: defaults::DEFAULT_HISTORY_WEIGHT,
            history_saturation: defaults::DEFAULT_HISTORY_SATURATION,
            materialization_threshold: defaults::DEFAULT_MATERIALIZATION_THRESHOLD,
        }
    }
}
