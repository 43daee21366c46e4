use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Confidence score clamped to [0.0, 1.0].
/// Represents the belief strength of a causal edge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Confidence(f64);

impl Confidence {
    /// High confidence threshold.
    pub const HIGH: f64 = 0.8;
    /// Medium confidence threshold.
    pub const MEDIUM: f64 = 0.5;
    /// Low confidence threshold. Below this, belief is "very low".
    pub const LOW: f64 = 0.3;

    pub const ZERO: Confidence = Confidence(0.0);
    pub const ONE: Confidence = Confidence(1.0);

    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN maps to 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Strict constructor: rejects values outside [0, 1] instead of clamping.
    pub fn try_new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Monotonic combination: belief only strengthens with corroborating evidence.
    pub fn strengthen(self, observed: Confidence) -> Self {
        if observed.0 > self.0 {
            observed
        } else {
            self
        }
    }

    pub fn level(self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

/// Confidence level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= Confidence::HIGH {
            Self::High
        } else if score >= Confidence::MEDIUM {
            Self::Medium
        } else if score >= Confidence::LOW {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very low",
        }
    }
}
