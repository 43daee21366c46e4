//! # reskpoints-causality
//!
//! The "why" engine for AI-service incidents. Maintains a snapshot-isolated
//! causality graph of error events, proposes and scores causal edges as
//! events arrive, and answers impact ("what did this break?") and root-cause
//! ("what explains this ticket?") queries.

pub mod analysis;
pub mod correlation;
pub mod engine;
pub mod explanation;
pub mod graph;
pub mod query;
pub mod scoring;

pub use analysis::{
    CausalChain, ImpactAnalyzer, ImpactOptions, ImpactReport, RootCandidate, RootCauseAnalyzer,
    RootCauseOptions, RootCauseReport, TraversalBudget,
};
pub use correlation::{CandidateEdge, CorrelationEngine, DependencyMap};
pub use engine::{CausalityEngine, IngestReport};
pub use explanation::IncidentExplanation;
pub use graph::{CausalityGraph, EdgeUpsert, EvictionReport, GraphSnapshot, GraphStats, GraphStore};
pub use query::{EdgeView, GraphQueryFacade, NeighborDirection};
pub use scoring::{ConfidenceScorer, ScoreBreakdown, ScoredCandidate};
