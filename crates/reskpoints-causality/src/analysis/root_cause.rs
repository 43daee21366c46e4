//! Backward root-cause search: "what explains this cluster of events?"
//!
//! Each cluster member is walked backward up to `max_depth` hops. A
//! candidate's support is the sum, over the members it reaches, of its
//! best-path confidence product to that member.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::{Confidence, NodeId, RelationKind};
use reskpoints_observability::events;
use serde::Serialize;

use super::search::{best_first, SearchParams};
use super::{log_inconsistency, BudgetTracker, RootCauseOptions, TraversalBudget};
use crate::graph::{CausalityGraph, Direction, Slot};

/// A ranked root-cause candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootCandidate {
    pub node_id: NodeId,
    pub component: String,
    pub timestamp: DateTime<Utc>,
    /// Sum over supported members of the best-path confidence product.
    pub support: f64,
    /// Highest single best-path product to any member.
    pub best_path: f64,
    /// Fewest hops to any member.
    pub depth: usize,
    pub supported_members: Vec<NodeId>,
    /// No other candidate has an edge into this one.
    pub is_origin: bool,
}

/// Result of a root-cause query.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RootCauseReport {
    pub candidates: Vec<RootCandidate>,
    /// No member had ancestors; the earliest member stands in as the root.
    pub fallback: bool,
    pub truncated: bool,
    pub visited: usize,
}

impl RootCauseReport {
    pub fn ranked_ids(&self) -> Vec<NodeId> {
        self.candidates.iter().map(|c| c.node_id.clone()).collect()
    }

    pub fn top(&self) -> Option<&RootCandidate> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// One hop of a causal chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainLink {
    pub source: NodeId,
    pub target: NodeId,
    pub confidence: Confidence,
    pub kind: RelationKind,
}

/// Best-confidence path from a root candidate down to a cluster member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CausalChain {
    pub from: NodeId,
    pub to: NodeId,
    pub links: Vec<ChainLink>,
    /// Product of the link confidences.
    pub product: f64,
}

impl CausalChain {
    pub fn depth(&self) -> usize {
        self.links.len()
    }
}

#[derive(Default)]
struct Accumulated {
    support: f64,
    best_path: f64,
    depth: usize,
    members: BTreeSet<NodeId>,
}

/// Ranks ancestors of a cluster by accumulated support.
#[derive(Debug, Clone, Default)]
pub struct RootCauseAnalyzer {
    options: RootCauseOptions,
}

impl RootCauseAnalyzer {
    pub fn new(options: RootCauseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RootCauseOptions {
        &self.options
    }

    /// Rank root-cause candidates for a cluster of node ids.
    ///
    /// Every member must exist (`UnknownNode` otherwise). An empty cluster
    /// yields an empty report.
    pub fn analyze<'a, I>(&self, graph: &CausalityGraph, cluster: I) -> Result<RootCauseReport, CausalityError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let members: BTreeSet<&str> = cluster.into_iter().collect();
        let _span = reskpoints_observability::root_cause_span!(members.len()).entered();
        if members.is_empty() {
            return Ok(RootCauseReport::default());
        }
        let member_slots = members
            .iter()
            .map(|id| {
                graph
                    .slot(id)
                    .ok_or_else(|| CausalityError::UnknownNode { id: id.to_string() })
            })
            .collect::<Result<Vec<Slot>, _>>()?;

        let params = SearchParams {
            direction: Direction::Incoming,
            hop_factor: 1.0,
            min_score: 0.0,
            max_depth: Some(self.options.max_depth),
        };
        let mut budget = BudgetTracker::start(&self.options.budget);
        let mut acc: HashMap<Slot, Accumulated> = HashMap::new();
        let mut truncated = false;

        for &member in &member_slots {
            let outcome = best_first(graph, member, &params, &mut budget)?;
            let Some(member_id) = graph.node(member).map(|n| n.id.clone()) else {
                continue;
            };
            for r in outcome.reached.iter().filter(|r| r.slot != member) {
                let entry = acc.entry(r.slot).or_insert_with(|| Accumulated {
                    depth: usize::MAX,
                    ..Default::default()
                });
                entry.support += r.score;
                entry.best_path = entry.best_path.max(r.score);
                entry.depth = entry.depth.min(r.depth);
                entry.members.insert(member_id.clone());
            }
            if outcome.truncated || budget.exhausted() {
                truncated = true;
                break;
            }
        }
        if truncated {
            events::traversal_truncated("root_cause", budget.visited());
        }

        if acc.is_empty() {
            return Ok(self.fallback(graph, &member_slots, truncated, budget.visited()));
        }

        let candidate_slots: HashSet<Slot> = acc.keys().copied().collect();
        let mut candidates = Vec::with_capacity(acc.len());
        for (slot, a) in acc {
            let Some(node) = graph.node(slot) else {
                continue;
            };
            let mut is_origin = true;
            for neighbor in graph.neighbors(slot, Direction::Incoming) {
                let (parent, _) = neighbor.map_err(log_inconsistency)?;
                if candidate_slots.contains(&parent) {
                    is_origin = false;
                    break;
                }
            }
            candidates.push(RootCandidate {
                node_id: node.id.clone(),
                component: node.component.clone(),
                timestamp: node.timestamp,
                support: a.support,
                best_path: a.best_path,
                depth: a.depth,
                supported_members: a.members.into_iter().collect(),
                is_origin,
            });
        }

        let prefer_origins = self.options.prefer_origins;
        candidates.sort_by(|a, b| {
            let origin = if prefer_origins {
                b.is_origin.cmp(&a.is_origin)
            } else {
                std::cmp::Ordering::Equal
            };
            origin
                .then_with(|| b.support.total_cmp(&a.support))
                .then_with(|| a.timestamp.cmp(&b.timestamp))
                .then_with(|| a.node_id.cmp(&b.node_id))
        });

        Ok(RootCauseReport {
            candidates,
            fallback: false,
            truncated,
            visited: budget.visited(),
        })
    }

    fn fallback(
        &self,
        graph: &CausalityGraph,
        members: &[Slot],
        truncated: bool,
        visited: usize,
    ) -> RootCauseReport {
        let earliest = members
            .iter()
            .filter_map(|&slot| graph.node(slot))
            .min_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        let candidates = earliest
            .map(|node| RootCandidate {
                node_id: node.id.clone(),
                component: node.component.clone(),
                timestamp: node.timestamp,
                support: 0.0,
                best_path: 0.0,
                depth: 0,
                supported_members: Vec::new(),
                is_origin: true,
            })
            .into_iter()
            .collect();
        RootCauseReport {
            candidates,
            fallback: true,
            truncated,
            visited,
        }
    }
}

/// Highest-confidence path `from → … → to` within `max_depth` hops.
///
/// `Ok(None)` when `to` is not reachable from `from`.
pub fn best_chain(
    graph: &CausalityGraph,
    from: &str,
    to: &str,
    max_depth: usize,
) -> Result<Option<CausalChain>, CausalityError> {
    let from_slot = graph
        .slot(from)
        .ok_or_else(|| CausalityError::UnknownNode { id: from.to_string() })?;
    let to_slot = graph
        .slot(to)
        .ok_or_else(|| CausalityError::UnknownNode { id: to.to_string() })?;

    // Search backward from the target so each path step points one hop downstream.
    let params = SearchParams {
        direction: Direction::Incoming,
        hop_factor: 1.0,
        min_score: 0.0,
        max_depth: Some(max_depth),
    };
    let mut budget = BudgetTracker::start(&TraversalBudget::unlimited());
    let outcome = best_first(graph, to_slot, &params, &mut budget)?;
    let Some(start) = outcome.reached.iter().find(|r| r.slot == from_slot) else {
        return Ok(None);
    };

    let path = outcome.best_path(start);
    let mut links = Vec::with_capacity(path.len().saturating_sub(1));
    for hop in path.windows(2) {
        let edge = graph.edge_at(hop[0], hop[1]).ok_or_else(|| {
            log_inconsistency(CausalityError::GraphInconsistency {
                details: format!("best path uses missing edge {} -> {}", hop[0], hop[1]),
            })
        })?;
        links.push(ChainLink {
            source: edge.source.clone(),
            target: edge.target.clone(),
            confidence: edge.confidence,
            kind: edge.kind,
        });
    }

    Ok(Some(CausalChain {
        from: NodeId::from(from),
        to: NodeId::from(to),
        links,
        product: start.score,
    }))
}
