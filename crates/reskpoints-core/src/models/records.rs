//! Flat persisted record format. Sufficient to reconstruct the graph exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::confidence::Confidence;
use super::edge::{CausalityEdge, RelationKind};
use super::node::{CausalityNode, NodeId};
use super::severity::Severity;

/// `{id, eventRef, ts, component, severity, metadata}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NodeRecord {
    pub id: String,
    pub event_ref: String,
    pub ts: DateTime<Utc>,
    pub component: String,
    pub severity: Severity,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// `{src, dst, confidence, kind, ts}` plus optional bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EdgeRecord {
    pub src: String,
    pub dst: String,
    pub confidence: f64,
    pub kind: RelationKind,
    pub ts: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub observations: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

/// Complete persisted graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GraphRecords {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphRecords {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl From<&CausalityNode> for NodeRecord {
    fn from(node: &CausalityNode) -> Self {
        Self {
            id: node.id.0.clone(),
            event_ref: node.event_ref.clone(),
            ts: node.timestamp,
            component: node.component.clone(),
            severity: node.severity,
            metadata: node.metadata.clone(),
        }
    }
}

impl From<NodeRecord> for CausalityNode {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: NodeId(record.id),
            event_ref: record.event_ref,
            timestamp: record.ts,
            component: record.component,
            severity: record.severity,
            metadata: record.metadata,
        }
    }
}

impl From<&CausalityEdge> for EdgeRecord {
    fn from(edge: &CausalityEdge) -> Self {
        Self {
            src: edge.source.0.clone(),
            dst: edge.target.0.clone(),
            confidence: edge.confidence.value(),
            kind: edge.kind,
            ts: edge.created_at,
            updated_ts: Some(edge.updated_at),
            observations: Some(edge.observations),
            evidence: edge.evidence.clone(),
        }
    }
}

impl EdgeRecord {
    /// Decode into an edge. Returns `None` if the stored confidence is outside [0, 1].
    pub fn to_edge(&self) -> Option<CausalityEdge> {
        let confidence = Confidence::try_new(self.confidence)?;
        Some(CausalityEdge {
            source: NodeId(self.src.clone()),
            target: NodeId(self.dst.clone()),
            confidence,
            kind: self.kind,
            created_at: self.ts,
            updated_at: self.updated_ts.unwrap_or(self.ts),
            observations: self.observations.unwrap_or(1),
            evidence: self.evidence.clone(),
        })
    }
}
