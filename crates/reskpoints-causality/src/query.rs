//! GraphQueryFacade: read-only entry point for dashboards, APIs and ticketing.
//! Each call works on its own snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reskpoints_core::config::AnalysisConfig;
use reskpoints_core::errors::{CausalityError, ReskResult};
use reskpoints_core::models::{CausalityNode, NodeId, RelationKind, TicketCluster};
use serde::Serialize;

use crate::analysis::{
    log_inconsistency, ImpactAnalyzer, ImpactOptions, ImpactReport, RootCauseAnalyzer,
    RootCauseOptions, RootCauseReport,
};
use crate::explanation::{self, IncidentExplanation};
use crate::graph::{Direction, GraphSnapshot, GraphStats, GraphStore};

/// Which side of a node to list edges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborDirection {
    Outgoing,
    Incoming,
    Both,
}

/// An edge as seen from one of its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub source: NodeId,
    pub target: NodeId,
    /// The endpoint that is not the queried node.
    pub neighbor: NodeId,
    /// `Outgoing` if the queried node is the source.
    pub direction: NeighborDirection,
    pub confidence: f64,
    pub kind: RelationKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub observations: u32,
}

/// Read-only query facade over a shared [`GraphStore`].
#[derive(Debug, Clone)]
pub struct GraphQueryFacade {
    store: Arc<GraphStore>,
    analysis: AnalysisConfig,
}

impl GraphQueryFacade {
    pub fn new(store: Arc<GraphStore>, analysis: AnalysisConfig) -> Self {
        Self { store, analysis }
    }

    pub fn snapshot(&self) -> ReskResult<GraphSnapshot> {
        self.store.snapshot()
    }

    pub fn get_node(&self, id: &str) -> ReskResult<Option<Arc<CausalityNode>>> {
        Ok(self.store.snapshot()?.get(id).cloned())
    }

    /// Edges touching `id`, ordered by neighbor id. Fails with `UnknownNode`.
    pub fn get_neighbors(&self, id: &str, direction: NeighborDirection) -> ReskResult<Vec<EdgeView>> {
        let snapshot = self.store.snapshot()?;
        let slot = snapshot
            .slot(id)
            .ok_or_else(|| CausalityError::UnknownNode { id: id.to_string() })?;

        let sides: &[(Direction, NeighborDirection)] = match direction {
            NeighborDirection::Outgoing => &[(Direction::Outgoing, NeighborDirection::Outgoing)],
            NeighborDirection::Incoming => &[(Direction::Incoming, NeighborDirection::Incoming)],
            NeighborDirection::Both => &[
                (Direction::Outgoing, NeighborDirection::Outgoing),
                (Direction::Incoming, NeighborDirection::Incoming),
            ],
        };

        let mut views = Vec::new();
        for &(side, label) in sides {
            for neighbor in snapshot.neighbors(slot, side) {
                let (_, edge) = neighbor.map_err(log_inconsistency)?;
                let other = match side {
                    Direction::Outgoing => &edge.target,
                    Direction::Incoming => &edge.source,
                };
                views.push(EdgeView {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    neighbor: other.clone(),
                    direction: label,
                    confidence: edge.confidence.value(),
                    kind: edge.kind,
                    created_at: edge.created_at,
                    updated_at: edge.updated_at,
                    observations: edge.observations,
                });
            }
        }
        views.sort_by(|a, b| {
            a.neighbor
                .cmp(&b.neighbor)
                .then_with(|| a.source.cmp(&b.source))
        });
        Ok(views)
    }

    /// Impact of `id` with the configured options.
    pub fn impact_of(&self, id: &str) -> ReskResult<ImpactReport> {
        self.impact_with(id, ImpactOptions::from_config(&self.analysis))
    }

    pub fn impact_with(&self, id: &str, options: ImpactOptions) -> ReskResult<ImpactReport> {
        let snapshot = self.store.snapshot()?;
        Ok(ImpactAnalyzer::new(options).analyze(&snapshot, id)?)
    }

    /// Root-cause candidates for a cluster with the configured options.
    pub fn root_cause_of<'a, I>(&self, cluster: I) -> ReskResult<RootCauseReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.root_cause_with(cluster, RootCauseOptions::from_config(&self.analysis))
    }

    pub fn root_cause_with<'a, I>(&self, cluster: I, options: RootCauseOptions) -> ReskResult<RootCauseReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let snapshot = self.store.snapshot()?;
        Ok(RootCauseAnalyzer::new(options).analyze(&snapshot, cluster)?)
    }

    pub fn root_cause_of_ticket(&self, ticket: &TicketCluster) -> ReskResult<RootCauseReport> {
        self.root_cause_of(ticket.node_ids.iter().map(NodeId::as_str))
    }

    /// Incident explanation for a ticket's cluster.
    pub fn explain(&self, ticket: &TicketCluster) -> ReskResult<IncidentExplanation> {
        let snapshot = self.store.snapshot()?;
        Ok(explanation::explain(&snapshot, ticket, &self.analysis)?)
    }

    pub fn stats(&self) -> ReskResult<GraphStats> {
        self.store.stats()
    }
}
