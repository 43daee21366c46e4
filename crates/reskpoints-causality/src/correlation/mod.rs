//! CorrelationEngine: proposes candidate causal edges for a node against a
//! read-only snapshot. Pure; never touches the store.

pub mod dependency_map;
pub mod signals;

use chrono::{DateTime, Utc};
use reskpoints_core::config::CorrelationConfig;
use reskpoints_core::errors::{CausalityError, ReskResult};
use reskpoints_core::models::{CausalityNode, NodeId, RelationKind};
use serde::Serialize;

use crate::graph::CausalityGraph;

pub use dependency_map::DependencyMap;
pub use signals::Signals;

/// A proposed, not yet scored, causal edge. Direction is earlier → later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub source_component: String,
    pub target_component: String,
    pub kind: RelationKind,
    pub signals: Signals,
    /// Absolute time between the two events.
    pub temporal_distance_ms: i64,
}

/// Proposes candidate edges from temporal proximity and component affinity.
#[derive(Debug, Clone)]
pub struct CorrelationEngine {
    config: CorrelationConfig,
    dependencies: DependencyMap,
}

impl CorrelationEngine {
    pub fn new(config: CorrelationConfig, dependencies: DependencyMap) -> Self {
        Self {
            config,
            dependencies,
        }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    /// Candidates linking `node` with every node of `graph` inside the window.
    ///
    /// `node` need not be in `graph` yet. Pairs already linked at or above the
    /// redundancy cutoff, in either direction, are skipped.
    pub fn propose(&self, node: &CausalityNode, graph: &CausalityGraph) -> Vec<CandidateEdge> {
        let window = self.config.window();
        let window_ms = window.num_milliseconds();
        let from = node
            .timestamp
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let to = node
            .timestamp
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut candidates: Vec<CandidateEdge> = graph
            .slots_between(from, to)
            .filter_map(|slot| graph.node(slot))
            .filter(|other| other.id != node.id)
            .filter_map(|other| self.pair(node, other, window_ms))
            .filter(|c| !self.is_redundant(graph, c))
            .collect();

        candidates.sort_by(|a, b| {
            a.temporal_distance_ms
                .cmp(&b.temporal_distance_ms)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.target.cmp(&b.target))
        });
        candidates
    }

    /// Re-run correlation for a node already in the graph.
    pub fn recorrelate(&self, id: &str, graph: &CausalityGraph) -> ReskResult<Vec<CandidateEdge>> {
        let node = graph
            .get(id)
            .ok_or_else(|| CausalityError::UnknownNode { id: id.to_string() })?;
        Ok(self.propose(node, graph))
    }

    fn pair(
        &self,
        node: &CausalityNode,
        other: &CausalityNode,
        window_ms: i64,
    ) -> Option<CandidateEdge> {
        let distance_ms = (node.timestamp - other.timestamp).num_milliseconds().abs();
        let temporal = signals::temporal_proximity::score(distance_ms, window_ms);
        let (affinity, kind) = signals::component_affinity::score(
            &other.component,
            &node.component,
            &self.dependencies,
            &self.config,
        );
        let signals = Signals { temporal, affinity };
        if !signals.is_viable() {
            return None;
        }
        let kind = kind?;

        // Equal timestamps: existing → new.
        let (source, target) = if other.timestamp <= node.timestamp {
            (other, node)
        } else {
            (node, other)
        };
        Some(CandidateEdge {
            source: source.id.clone(),
            target: target.id.clone(),
            source_component: source.component.clone(),
            target_component: target.component.clone(),
            kind,
            signals,
            temporal_distance_ms: distance_ms,
        })
    }

    fn is_redundant(&self, graph: &CausalityGraph, candidate: &CandidateEdge) -> bool {
        let cutoff = self.config.redundancy_cutoff;
        let (s, t) = (candidate.source.as_str(), candidate.target.as_str());
        [graph.edge(s, t), graph.edge(t, s)]
            .into_iter()
            .flatten()
            .any(|edge| edge.confidence.value() >= cutoff)
    }
}
