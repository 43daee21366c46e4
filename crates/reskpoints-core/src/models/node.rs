use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::event::NormalizedEvent;
use super::severity::Severity;

/// Identifier of a causality node. Equal to the id of the event it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A node in the causality graph: one ingested error/incident event.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CausalityNode {
    pub id: NodeId,
    /// Reference to the originating error/incident event in the upstream store.
    pub event_ref: String,
    pub timestamp: DateTime<Utc>,
    /// Originating component/service name.
    pub component: String,
    pub severity: Severity,
    #[ts(type = "Record<string, unknown>")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl CausalityNode {
    pub fn new(
        id: impl Into<NodeId>,
        event_ref: impl Into<String>,
        timestamp: DateTime<Utc>,
        component: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            event_ref: event_ref.into(),
            timestamp,
            component: component.into(),
            severity,
            metadata: BTreeMap::new(),
        }
    }

    /// Build the node for a freshly normalized event.
    pub fn from_event(event: NormalizedEvent) -> Self {
        Self {
            id: event.id,
            event_ref: event.event_ref,
            timestamp: event.timestamp,
            component: event.component,
            severity: event.severity,
            metadata: event.metadata,
        }
    }
}
