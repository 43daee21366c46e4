//! # reskpoints-core
//!
//! Foundation crate for the Reskpoints causality engine.
//! Defines the graph data model, errors, config, constants, and the
//! persistence hook trait. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ReskConfig;
pub use errors::{CausalityError, ReskError, ReskResult};
pub use models::{
    CausalityEdge, CausalityNode, Confidence, NodeId, NormalizedEvent, RelationKind, Severity,
    TicketCluster,
};
