//! Engine configuration. Passed at construction, never read from globals.

pub mod analysis_config;
pub mod correlation_config;
pub mod defaults;
pub mod observability_config;
pub mod retention_config;
pub mod scoring_config;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use analysis_config::AnalysisConfig;
pub use correlation_config::CorrelationConfig;
pub use observability_config::ObservabilityConfig;
pub use retention_config::RetentionConfig;
pub use scoring_config::ScoringConfig;

use crate::constants::{MAX_BACKWARD_DEPTH_LIMIT, MAX_DURATION_SECS};
use crate::errors::{ReskError, ReskResult};

/// Top-level configuration for the causality engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReskConfig {
    pub correlation: CorrelationConfig,
    pub scoring: ScoringConfig,
    pub analysis: AnalysisConfig,
    pub retention: RetentionConfig,
    pub observability: ObservabilityConfig,
    /// Static component dependency map: component → components it depends on.
    pub dependencies: BTreeMap<String, Vec<String>>,
}

impl ReskConfig {
    /// Parse from a TOML document. Missing sections and fields take defaults.
    pub fn from_toml(input: &str) -> ReskResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ReskError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make scoring or traversal meaningless.
    pub fn validate(&self) -> ReskResult<()> {
        if self.correlation.window_secs == 0 {
            return Err(ReskError::ConfigError(
                "correlation.window_secs must be greater than 0".into(),
            ));
        }
        for (name, value) in [
            ("correlation.window_secs", self.correlation.window_secs),
            ("retention.horizon_secs", self.retention.horizon_secs),
        ] {
            if value > MAX_DURATION_SECS {
                return Err(ReskError::ConfigError(format!(
                    "{name} must be at most {MAX_DURATION_SECS}, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("correlation.same_component_affinity", self.correlation.same_component_affinity),
            ("correlation.adjacent_affinity", self.correlation.adjacent_affinity),
            ("correlation.redundancy_cutoff", self.correlation.redundancy_cutoff),
            ("scoring.temporal_weight", self.scoring.temporal_weight),
            ("scoring.affinity_weight", self.scoring.affinity_weight),
            ("scoring.history_weight", self.scoring.history_weight),
            ("scoring.materialization_threshold", self.scoring.materialization_threshold),
            ("analysis.decay_factor", self.analysis.decay_factor),
            ("analysis.min_impact", self.analysis.min_impact),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReskError::ConfigError(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.scoring.history_saturation == 0 {
            return Err(ReskError::ConfigError(
                "scoring.history_saturation must be greater than 0".into(),
            ));
        }
        if self.analysis.max_backward_depth == 0
            || self.analysis.max_backward_depth > MAX_BACKWARD_DEPTH_LIMIT
        {
            return Err(ReskError::ConfigError(format!(
                "analysis.max_backward_depth must be within 1..={MAX_BACKWARD_DEPTH_LIMIT}"
            )));
        }
        if self.analysis.max_nodes_visited == 0 {
            return Err(ReskError::ConfigError(
                "analysis.max_nodes_visited must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
