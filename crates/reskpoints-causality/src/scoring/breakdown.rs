//! Weighted blend of the correlation signals.

use reskpoints_core::config::ScoringConfig;
use serde::Serialize;

use crate::correlation::Signals;

/// Breakdown of individual signal scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Per-signal scores: (name, raw_score, weighted_score).
    pub signal_scores: Vec<(&'static str, f64, f64)>,
    /// Final blended confidence, clamped to [0, 1].
    pub composite: f64,
    /// Whether the composite reaches the materialization threshold.
    pub above_threshold: bool,
}

impl ScoreBreakdown {
    /// Raw value of a named signal.
    pub fn raw(&self, name: &str) -> Option<f64> {
        self.signal_scores
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|&(_, raw, _)| raw)
    }
}

/// `min(count / saturation, 1)`.
pub fn normalized_history(prior_count: u64, saturation: u64) -> f64 {
    if saturation == 0 {
        return 1.0;
    }
    (prior_count as f64 / saturation as f64).min(1.0)
}

/// Blend signals and history into a confidence with its breakdown.
pub fn compute(config: &ScoringConfig, signals: Signals, prior_count: u64) -> ScoreBreakdown {
    let history = normalized_history(prior_count, config.history_saturation);
    let signal_scores = vec![
        ("temporal_proximity", signals.temporal, signals.temporal * config.temporal_weight),
        ("component_affinity", signals.affinity, signals.affinity * config.affinity_weight),
        ("history", history, history * config.history_weight),
    ];
    let weighted_sum: f64 = signal_scores.iter().map(|&(_, _, w)| w).sum();
    let composite = if weighted_sum.is_nan() {
        0.0
    } else {
        weighted_sum.clamp(0.0, 1.0)
    };
    ScoreBreakdown {
        signal_scores,
        composite,
        above_threshold: composite >= config.materialization_threshold,
    }
}
