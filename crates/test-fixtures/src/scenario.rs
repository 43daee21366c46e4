//! Typed shape of a golden causality scenario.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A replayable ingestion scenario with its expected graph and query results.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// component → components it depends on.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,
    /// Ingested in order.
    pub events: Vec<ScenarioEvent>,
    #[serde(default)]
    pub expected_edges: Vec<ExpectedEdge>,
    /// Ordered pairs that must not be linked.
    #[serde(default)]
    pub absent_edges: Vec<[String; 2]>,
    /// Total edge count after ingestion, if pinned.
    #[serde(default)]
    pub edge_count: Option<usize>,
    #[serde(default)]
    pub root_cause: Option<ExpectedRootCause>,
    #[serde(default)]
    pub impact: Option<ExpectedImpact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioEvent {
    pub id: String,
    /// Seconds after the scenario epoch.
    pub offset_secs: i64,
    pub component: String,
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedEdge {
    pub src: String,
    pub dst: String,
    pub kind: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedRootCause {
    pub cluster: Vec<String>,
    pub ranked: Vec<String>,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedImpact {
    pub origin: String,
    pub scores: BTreeMap<String, f64>,
}
