//! Assembles an incident explanation from root-cause, chain and impact results.

use std::collections::{BTreeSet, HashSet};

use reskpoints_core::config::AnalysisConfig;
use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::{ConfidenceLevel, NodeId, TicketCluster};
use serde::Serialize;

use super::{confidence, templates};
use crate::analysis::root_cause::best_chain;
use crate::analysis::{
    CausalChain, ImpactAnalyzer, ImpactOptions, RootCandidate, RootCauseAnalyzer, RootCauseOptions,
};
use crate::graph::CausalityGraph;

/// Why a ticket's events happened: the probable root, how it reached each
/// event, and what else it touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentExplanation {
    pub ticket_id: String,
    /// Top-ranked root candidate.
    pub root: Option<RootCandidate>,
    /// All ranked candidates, root first.
    pub candidates: Vec<RootCandidate>,
    /// Best chain from the root to each reachable cluster member.
    pub chains: Vec<CausalChain>,
    /// Components of the cluster, the root, and everything the root impacts.
    pub affected_components: Vec<String>,
    pub contributing_factors: Vec<String>,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub summary: String,
    /// The root was picked without any causal evidence.
    pub fallback: bool,
    pub truncated: bool,
}

/// Build the explanation for a ticket against one graph snapshot.
pub fn build(
    graph: &CausalityGraph,
    ticket: &TicketCluster,
    config: &AnalysisConfig,
) -> Result<IncidentExplanation, CausalityError> {
    let report = RootCauseAnalyzer::new(RootCauseOptions::from_config(config))
        .analyze(graph, ticket.node_ids.iter().map(NodeId::as_str))?;
    let root = report.top().cloned();
    let mut truncated = report.truncated;

    let mut chains = Vec::new();
    let mut components: BTreeSet<String> = ticket
        .node_ids
        .iter()
        .filter_map(|id| graph.get(id.as_str()))
        .map(|n| n.component.clone())
        .collect();

    if let Some(root) = &root {
        components.insert(root.component.clone());
        for member in &ticket.node_ids {
            if *member == root.node_id {
                continue;
            }
            if let Some(chain) = best_chain(
                graph,
                root.node_id.as_str(),
                member.as_str(),
                config.max_backward_depth,
            )? {
                chains.push(chain);
            }
        }

        let impact = ImpactAnalyzer::new(ImpactOptions::from_config(config))
            .analyze(graph, root.node_id.as_str())?;
        truncated |= impact.truncated;
        components.extend(
            impact
                .impacts
                .keys()
                .filter_map(|id| graph.get(id.as_str()))
                .map(|n| n.component.clone()),
        );
    }

    let contributing_factors = contributing_factors(graph, &chains, &report.candidates);
    let (confidence, confidence_level) = confidence::overall(&chains);
    let affected_components: Vec<String> = components.into_iter().collect();
    let summary = summarize(
        ticket,
        root.as_ref(),
        report.fallback,
        chains.len(),
        confidence,
        confidence_level,
        &affected_components,
    );

    Ok(IncidentExplanation {
        ticket_id: ticket.ticket_id.clone(),
        root,
        candidates: report.candidates,
        chains,
        affected_components,
        contributing_factors,
        confidence,
        confidence_level,
        summary,
        fallback: report.fallback,
        truncated,
    })
}

fn describe(graph: &CausalityGraph, id: &NodeId) -> String {
    match graph.get(id.as_str()) {
        Some(node) => format!("{} ({})", node.id, node.component),
        None => id.to_string(),
    }
}

fn contributing_factors(
    graph: &CausalityGraph,
    chains: &[CausalChain],
    candidates: &[RootCandidate],
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut factors = Vec::new();
    for link in chains.iter().flat_map(|c| &c.links) {
        if !seen.insert((link.source.clone(), link.target.clone())) {
            continue;
        }
        let sentence = templates::render(
            link.kind,
            &describe(graph, &link.source),
            &describe(graph, &link.target),
        );
        factors.push(format!(
            "[{}] {sentence} ({:.0}%)",
            templates::factor_label(link.kind),
            link.confidence.value() * 100.0
        ));
    }
    for other in candidates.iter().skip(1) {
        factors.push(format!(
            "[candidate] {} also reaches {} event(s) with support {:.2}",
            describe(graph, &other.node_id),
            other.supported_members.len(),
            other.support
        ));
    }
    factors
}

fn summarize(
    ticket: &TicketCluster,
    root: Option<&RootCandidate>,
    fallback: bool,
    explained: usize,
    confidence: f64,
    level: ConfidenceLevel,
    components: &[String],
) -> String {
    let Some(root) = root else {
        return format!("No causal context found for ticket {}.", ticket.ticket_id);
    };
    if fallback {
        return format!(
            "Ticket {}: no causal ancestors found; earliest event {} ({}) is reported as the probable origin.",
            ticket.ticket_id, root.node_id, root.component
        );
    }
    format!(
        "Ticket {}: probable root cause {} ({}) explains {} of {} event(s) with {} confidence ({:.0}%). Affected components: {}.",
        ticket.ticket_id,
        root.node_id,
        root.component,
        explained,
        ticket.len(),
        level.as_str(),
        confidence * 100.0,
        components.join(", ")
    )
}
