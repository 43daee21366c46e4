use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::confidence::Confidence;
use super::node::NodeId;
use crate::constants::MAX_EVIDENCE_PER_EDGE;

/// How a causal edge came to be asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RelationKind {
    /// Events from the same component, close in time.
    TemporalCorrelation,
    /// Events from components adjacent in the dependency map.
    ComponentDependency,
    /// Asserted by an operator.
    ManualAnnotation,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        Self::TemporalCorrelation,
        Self::ComponentDependency,
        Self::ManualAnnotation,
    ];

    /// Parse from string (matching the serde rename).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "temporal_correlation" => Some(Self::TemporalCorrelation),
            "component_dependency" => Some(Self::ComponentDependency),
            "manual_annotation" => Some(Self::ManualAnnotation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemporalCorrelation => "temporal_correlation",
            Self::ComponentDependency => "component_dependency",
            Self::ManualAnnotation => "manual_annotation",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed causal edge: `source` contributes to `target`.
/// At most one edge exists per ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CausalityEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub confidence: Confidence,
    pub kind: RelationKind,
    pub created_at: DateTime<Utc>,
    /// Last time an observation touched this edge.
    pub updated_at: DateTime<Utc>,
    /// Number of observations folded into this edge, including the first.
    pub observations: u32,
    pub evidence: Vec<String>,
}

impl CausalityEdge {
    pub fn new(
        source: NodeId,
        target: NodeId,
        confidence: Confidence,
        kind: RelationKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            target,
            confidence,
            kind,
            created_at,
            updated_at: created_at,
            observations: 1,
            evidence: Vec::new(),
        }
    }

    /// Fold a corroborating observation into this edge.
    /// Confidence becomes `max(old, observed)`. Returns `true` if it increased.
    pub fn strengthen(
        &mut self,
        observed: Confidence,
        at: DateTime<Utc>,
        evidence: Option<&str>,
    ) -> bool {
        let previous = self.confidence;
        self.confidence = previous.strengthen(observed);
        self.observations = self.observations.saturating_add(1);
        if at > self.updated_at {
            self.updated_at = at;
        }
        if let Some(ev) = evidence {
            self.add_evidence(ev);
        }
        self.confidence > previous
    }

    /// Append an evidence string, skipping duplicates and respecting the cap.
    pub fn add_evidence(&mut self, evidence: &str) {
        if evidence.is_empty()
            || self.evidence.len() >= MAX_EVIDENCE_PER_EDGE
            || self.evidence.iter().any(|e| e == evidence)
        {
            return;
        }
        self.evidence.push(evidence.to_string());
    }
}
