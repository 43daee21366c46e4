use serde::{Deserialize, Serialize};

use super::defaults;

/// Impact and root-cause traversal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Per-hop multiplier applied on top of edge confidence during impact propagation.
    pub decay_factor: f64,
    /// Impact scores at or below this are not propagated.
    pub min_impact: f64,
    /// Maximum hops walked backward from each cluster member.
    pub max_backward_depth: usize,
    /// Node budget per traversal. Exhausting it yields a truncated result.
    pub max_nodes_visited: usize,
    /// Optional wall-clock budget per traversal, in milliseconds.
    pub deadline_ms: Option<u64>,
    /// Rank candidates with no causal parent among the candidates ahead of
    /// intermediate ones.
    pub prefer_origins: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            decay_factor: defaults::DEFAULT_DECAY_FACTOR,
            min_impact: defaults::DEFAULT_MIN_IMPACT,
            max_backward_depth: defaults::DEFAULT_MAX_BACKWARD_DEPTH,
            max_nodes_visited: defaults::DEFAULT_MAX_NODES_VISITED,
            deadline_ms: None,
            prefer_origins: defaults::DEFAULT_PREFER_ORIGINS,
        }
    }
}
