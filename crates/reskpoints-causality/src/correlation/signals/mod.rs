//! Raw correlation signals computed for a pair of nodes.

pub mod component_affinity;
pub mod temporal_proximity;

use serde::Serialize;

/// Raw signal values for one candidate pair, each in [0, 1].
/// History is tracked by the scorer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signals {
    pub temporal: f64,
    pub affinity: f64,
}

impl Signals {
    /// A pair is only worth proposing when both signals are present.
    pub fn is_viable(&self) -> bool {
        self.temporal > 0.0 && self.affinity > 0.0
    }
}
