use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::node::NodeId;

/// A set of causality nodes grouped under one incident ticket.
/// Owned by the incident-management collaborator; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketCluster {
    pub ticket_id: String,
    pub node_ids: BTreeSet<NodeId>,
}

impl TicketCluster {
    pub fn new<I, N>(ticket_id: impl Into<String>, node_ids: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeId>,
    {
        Self {
            ticket_id: ticket_id.into(),
            node_ids: node_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }
}
