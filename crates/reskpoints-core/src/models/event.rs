use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::node::NodeId;
use super::severity::Severity;

/// A validated error/incident event, as handed over by the upstream normalizer.
/// Malformed events never reach the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalizedEvent {
    pub id: NodeId,
    pub event_ref: String,
    pub timestamp: DateTime<Utc>,
    pub component: String,
    pub severity: Severity,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl NormalizedEvent {
    pub fn new(
        id: impl Into<NodeId>,
        timestamp: DateTime<Utc>,
        component: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let id = id.into();
        Self {
            event_ref: id.0.clone(),
            id,
            timestamp,
            component: component.into(),
            severity,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_event_ref(mut self, event_ref: impl Into<String>) -> Self {
        self.event_ref = event_ref.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
