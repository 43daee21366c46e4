//! Chain confidence: 60% weakest link + 40% mean link, discounted 5% per hop.

use reskpoints_core::models::ConfidenceLevel;

use crate::analysis::CausalChain;

/// `(0.6 * min + 0.4 * avg) * 0.95^depth`, clamped to [0, 1].
/// An empty chain has no confidence.
pub fn chain_confidence(link_confidences: &[f64], depth: usize) -> f64 {
    let Some(min) = link_confidences.iter().copied().reduce(f64::min) else {
        return 0.0;
    };
    let avg = link_confidences.iter().sum::<f64>() / link_confidences.len() as f64;
    let penalty = 0.95_f64.powi(depth.min(i32::MAX as usize) as i32);
    ((0.6 * min + 0.4 * avg) * penalty).clamp(0.0, 1.0)
}

/// Confidence of one causal chain.
pub fn of_chain(chain: &CausalChain) -> f64 {
    let confidences: Vec<f64> = chain.links.iter().map(|l| l.confidence.value()).collect();
    chain_confidence(&confidences, chain.depth())
}

/// Mean confidence over all chains, with its level.
pub fn overall(chains: &[CausalChain]) -> (f64, ConfidenceLevel) {
    let scored: Vec<f64> = chains
        .iter()
        .filter(|c| !c.links.is_empty())
        .map(of_chain)
        .collect();
    let confidence = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };
    (confidence, ConfidenceLevel::from_score(confidence))
}
