//! Incident explanations for ticket clusters: ranked roots, causal chains,
//! affected components and a rendered summary.

pub mod builder;
pub mod confidence;
pub mod templates;

use reskpoints_core::config::AnalysisConfig;
use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::TicketCluster;

use crate::graph::CausalityGraph;

pub use builder::IncidentExplanation;
pub use confidence::chain_confidence;

/// Explain a ticket cluster against a graph snapshot.
pub fn explain(
    graph: &CausalityGraph,
    ticket: &TicketCluster,
    config: &AnalysisConfig,
) -> Result<IncidentExplanation, CausalityError> {
    builder::build(graph, ticket, config)
}
