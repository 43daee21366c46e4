//! ConfidenceScorer: turns candidate edges into confidences and decides
//! which ones materialize.

pub mod breakdown;
pub mod history;

use chrono::{DateTime, Utc};
use reskpoints_core::config::ScoringConfig;
use reskpoints_core::models::Confidence;
use serde::Serialize;

use crate::correlation::CandidateEdge;

pub use breakdown::ScoreBreakdown;
pub use history::ComponentHistory;

/// A candidate with its computed confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: CandidateEdge,
    pub confidence: Confidence,
    /// Candidates seen for this component pair before this one.
    pub prior_count: u64,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    /// At or above the materialization threshold.
    pub fn materializes(&self) -> bool {
        self.breakdown.above_threshold
    }
}

/// Blends temporal, affinity and history signals into a confidence.
#[derive(Debug, Default)]
pub struct ConfidenceScorer {
    config: ScoringConfig,
    history: ComponentHistory,
}

impl ConfidenceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            history: ComponentHistory::new(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.materialization_threshold
    }

    pub fn history(&self) -> &ComponentHistory {
        &self.history
    }

    /// Score a candidate and record it in the component-pair history.
    pub fn score(&self, candidate: CandidateEdge, at: DateTime<Utc>) -> ScoredCandidate {
        let prior_count = self.history.observe(
            &candidate.source_component,
            &candidate.target_component,
            at,
        );
        let breakdown = breakdown::compute(&self.config, candidate.signals, prior_count);
        ScoredCandidate {
            confidence: Confidence::new(breakdown.composite),
            candidate,
            prior_count,
            breakdown,
        }
    }

    /// Score without recording history.
    pub fn preview(&self, candidate: &CandidateEdge) -> ScoreBreakdown {
        let prior = self
            .history
            .count(&candidate.source_component, &candidate.target_component);
        breakdown::compute(&self.config, candidate.signals, prior)
    }
}
