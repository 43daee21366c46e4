//! Best-first weighted search shared by the impact and root-cause analyzers.
//!
//! States are `(node, depth)` labels. A label is expanded unless the node was
//! already settled at the same or a smaller depth: scores are popped in
//! non-increasing order, so such a label cannot improve anything. A weaker
//! path that arrives in fewer hops is still expanded, which keeps ancestors
//! reachable only through it inside a depth cap. Settled depths per node
//! strictly decrease, so the search terminates on cycles.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use reskpoints_core::errors::CausalityError;

use super::{log_inconsistency, BudgetTracker};
use crate::graph::{CausalityGraph, Direction, Slot};

pub(crate) struct SearchParams {
    pub direction: Direction,
    /// Multiplier applied per hop on top of the edge confidence.
    pub hop_factor: f64,
    /// Paths scoring at or below this are not expanded.
    pub min_score: f64,
    /// Nodes at this depth are reached but not expanded.
    pub max_depth: Option<usize>,
}

/// A node reached by the search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reached {
    pub slot: Slot,
    /// Highest path score to the node.
    pub score: f64,
    /// Fewest hops over any admitted path.
    pub depth: usize,
    /// Hops on the highest-scoring path.
    pub best_depth: usize,
}

pub(crate) struct SearchOutcome {
    /// Reached nodes in settle order, starting with the start node.
    pub reached: Vec<Reached>,
    pub truncated: bool,
    /// Predecessor of each settled `(slot, depth)` label, toward the start.
    parents: HashMap<(Slot, usize), Slot>,
}

impl SearchOutcome {
    /// Slots on the highest-scoring path from `r` back to the start, `r` first.
    pub(crate) fn best_path(&self, r: &Reached) -> Vec<Slot> {
        let mut path = vec![r.slot];
        let (mut slot, mut depth) = (r.slot, r.best_depth);
        while let Some(&prev) = self.parents.get(&(slot, depth)) {
            path.push(prev);
            slot = prev;
            depth -= 1;
        }
        path
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    slot: Slot,
    score: f64,
    depth: usize,
    via: Option<Slot>,
}

struct Frontier(Label);

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Max-heap: highest score first, then shallower, then lower slot.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.depth.cmp(&self.0.depth))
            .then_with(|| other.0.slot.cmp(&self.0.slot))
    }
}

/// Multiplicative best-first search from `start`.
///
/// The budget is charged once per distinct node.
pub(crate) fn best_first(
    graph: &CausalityGraph,
    start: Slot,
    params: &SearchParams,
    budget: &mut BudgetTracker,
) -> Result<SearchOutcome, CausalityError> {
    // Smallest settled depth per node.
    let mut settled: HashMap<Slot, usize> = HashMap::new();
    // Best queued score per label.
    let mut queued: HashMap<(Slot, usize), f64> = HashMap::new();
    let mut position: HashMap<Slot, usize> = HashMap::new();
    let mut parents = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut reached: Vec<Reached> = Vec::new();
    let mut truncated = false;

    heap.push(Frontier(Label {
        slot: start,
        score: 1.0,
        depth: 0,
        via: None,
    }));

    while let Some(Frontier(current)) = heap.pop() {
        if settled.get(&current.slot).is_some_and(|&d| d <= current.depth) {
            continue;
        }
        match position.get(&current.slot) {
            Some(&i) => reached[i].depth = current.depth,
            None => {
                if !budget.admit() {
                    truncated = true;
                    break;
                }
                position.insert(current.slot, reached.len());
                reached.push(Reached {
                    slot: current.slot,
                    score: current.score,
                    depth: current.depth,
                    best_depth: current.depth,
                });
            }
        }
        settled.insert(current.slot, current.depth);
        if let Some(via) = current.via {
            parents.insert((current.slot, current.depth), via);
        }

        if params.max_depth.is_some_and(|max| current.depth >= max) {
            continue;
        }
        let depth = current.depth + 1;
        for neighbor in graph.neighbors(current.slot, params.direction) {
            let (next, edge) = neighbor.map_err(log_inconsistency)?;
            if settled.get(&next).is_some_and(|&d| d <= depth) {
                continue;
            }
            let score = current.score * params.hop_factor * edge.confidence.value();
            if score <= params.min_score {
                continue;
            }
            if queued.get(&(next, depth)).is_some_and(|&known| known >= score) {
                continue;
            }
            queued.insert((next, depth), score);
            heap.push(Frontier(Label {
                slot: next,
                score,
                depth,
                via: Some(current.slot),
            }));
        }
    }

    Ok(SearchOutcome {
        reached,
        truncated,
        parents,
    })
}
