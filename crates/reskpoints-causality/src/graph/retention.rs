//! Age-based eviction. The only path by which nodes and edges leave the graph.

use chrono::{DateTime, TimeDelta, Utc};
use reskpoints_core::models::NodeId;
use serde::Serialize;

use super::indexed_graph::CausalityGraph;

/// Result of a retention sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvictionReport {
    pub cutoff: DateTime<Utc>,
    pub nodes_removed: usize,
    pub edges_removed: usize,
    pub evicted: Vec<NodeId>,
}

impl EvictionReport {
    pub fn empty(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            nodes_removed: 0,
            edges_removed: 0,
            evicted: Vec::new(),
        }
    }
}

/// `now - age`, clamped to the representable time range.
pub fn cutoff_before(now: DateTime<Utc>, age: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(age).unwrap_or(if age > TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Remove every node with `timestamp < cutoff` and every edge touching one.
pub(crate) fn evict(graph: &mut CausalityGraph, cutoff: DateTime<Utc>) -> EvictionReport {
    let mut report = EvictionReport::empty(cutoff);
    for slot in graph.slots_before(cutoff) {
        let Some(id) = graph.node(slot).map(|n| n.id.clone()) else {
            continue;
        };
        report.edges_removed += graph.remove_node(slot);
        report.nodes_removed += 1;
        report.evicted.push(id);
    }
    report
}
