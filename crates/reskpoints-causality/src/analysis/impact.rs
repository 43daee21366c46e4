//! Forward impact propagation: "what did this event break?"

use std::collections::BTreeMap;

use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::NodeId;
use reskpoints_observability::events;
use serde::Serialize;

use super::search::{best_first, SearchParams};
use super::{BudgetTracker, ImpactOptions};
use crate::graph::{CausalityGraph, Direction};

/// Impact on one downstream node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactedNode {
    /// Best path product of `decay * confidence` per hop.
    pub score: f64,
    /// Fewest hops at which the node is reached above the minimum impact.
    pub depth: usize,
}

/// Result of an impact query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    pub origin: NodeId,
    /// Every reachable node above the minimum impact, excluding the origin.
    pub impacts: BTreeMap<NodeId, ImpactedNode>,
    /// The budget ran out before the search completed.
    pub truncated: bool,
    pub visited: usize,
}

impl ImpactReport {
    /// `{node id: score}`.
    pub fn scores(&self) -> BTreeMap<NodeId, f64> {
        self.impacts
            .iter()
            .map(|(id, impact)| (id.clone(), impact.score))
            .collect()
    }

    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.impacts.get(id).map(|i| i.score)
    }

    /// Impacted nodes, highest score first.
    pub fn ranked(&self) -> Vec<(&NodeId, &ImpactedNode)> {
        let mut ranked: Vec<_> = self.impacts.iter().collect();
        ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }
}

/// Propagates impact forward along causal edges, decaying per hop.
#[derive(Debug, Clone, Default)]
pub struct ImpactAnalyzer {
    options: ImpactOptions,
}

impl ImpactAnalyzer {
    pub fn new(options: ImpactOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImpactOptions {
        &self.options
    }

    /// Impact of `start` on everything downstream of it.
    pub fn analyze(&self, graph: &CausalityGraph, start: &str) -> Result<ImpactReport, CausalityError> {
        let _span = reskpoints_observability::impact_span!(start).entered();

        let slot = graph
            .slot(start)
            .ok_or_else(|| CausalityError::UnknownNode { id: start.to_string() })?;
        let params = SearchParams {
            direction: Direction::Outgoing,
            hop_factor: self.options.decay_factor,
            min_score: self.options.min_impact,
            max_depth: None,
        };
        let mut budget = BudgetTracker::start(&self.options.budget);
        let outcome = best_first(graph, slot, &params, &mut budget)?;

        let impacts = outcome
            .reached
            .iter()
            .filter(|r| r.slot != slot)
            .filter_map(|r| {
                graph.node(r.slot).map(|node| {
                    (
                        node.id.clone(),
                        ImpactedNode {
                            score: r.score,
                            depth: r.depth,
                        },
                    )
                })
            })
            .collect();

        if outcome.truncated {
            events::traversal_truncated("impact", budget.visited());
        }
        Ok(ImpactReport {
            origin: NodeId::from(start),
            impacts,
            truncated: outcome.truncated,
            visited: budget.visited(),
        })
    }
}
