//! Impact and root-cause analysis over graph snapshots.
//!
//! Both analyzers are best-first searches over `(node, depth)` labels that
//! settle each node at strictly decreasing depths, so they terminate on
//! cyclic graphs. A [`TraversalBudget`] bounds the work; an
//! exhausted budget returns a partial result flagged `truncated`.

pub mod impact;
pub mod root_cause;
mod search;

use std::time::{Duration, Instant};

use reskpoints_core::config::AnalysisConfig;
use reskpoints_core::errors::CausalityError;
use reskpoints_observability::events;

pub use impact::{ImpactAnalyzer, ImpactReport, ImpactedNode};
pub use root_cause::{CausalChain, ChainLink, RootCandidate, RootCauseAnalyzer, RootCauseReport};

/// Work limit for one traversal. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalBudget {
    pub max_nodes: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl TraversalBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_nodes: Some(config.max_nodes_visited),
            time_limit: config.deadline_ms.map(Duration::from_millis),
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Impact propagation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactOptions {
    /// Per-hop multiplier on top of edge confidence.
    pub decay_factor: f64,
    /// Scores at or below this are not propagated.
    pub min_impact: f64,
    pub budget: TraversalBudget,
}

impl ImpactOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            decay_factor: config.decay_factor,
            min_impact: config.min_impact,
            budget: TraversalBudget::from_config(config),
        }
    }

    pub fn with_budget(mut self, budget: TraversalBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl Default for ImpactOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Root-cause search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootCauseOptions {
    /// Maximum hops walked backward from each cluster member.
    pub max_depth: usize,
    /// Rank candidates without a causal parent among the candidates first.
    pub prefer_origins: bool,
    pub budget: TraversalBudget,
}

impl RootCauseOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_depth: config.max_backward_depth,
            prefer_origins: config.prefer_origins,
            budget: TraversalBudget::from_config(config),
        }
    }

    pub fn with_budget(mut self, budget: TraversalBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl Default for RootCauseOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Counts node visits against a budget. Shared across all searches of one query.
#[derive(Debug)]
pub(crate) struct BudgetTracker {
    max_nodes: Option<usize>,
    deadline: Option<Instant>,
    visited: usize,
    exhausted: bool,
}

impl BudgetTracker {
    pub(crate) fn start(budget: &TraversalBudget) -> Self {
        Self {
            max_nodes: budget.max_nodes,
            deadline: budget.time_limit.map(|limit| Instant::now() + limit),
            visited: 0,
            exhausted: false,
        }
    }

    /// Charge one node visit. Returns `false` once the budget is spent.
    pub(crate) fn admit(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let over_nodes = self.max_nodes.is_some_and(|max| self.visited >= max);
        let over_time = self.deadline.is_some_and(|d| Instant::now() >= d);
        if over_nodes || over_time {
            self.exhausted = true;
            return false;
        }
        self.visited += 1;
        true
    }

    pub(crate) fn visited(&self) -> usize {
        self.visited
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Log invariant violations before they abort the operation.
pub(crate) fn log_inconsistency(error: CausalityError) -> CausalityError {
    if let CausalityError::GraphInconsistency { details } = &error {
        events::graph_inconsistency(details);
    }
    error
}
