//! Causality graph data model.

pub mod confidence;
pub mod edge;
pub mod event;
pub mod node;
pub mod records;
pub mod severity;
pub mod ticket;

pub use confidence::{Confidence, ConfidenceLevel};
pub use edge::{CausalityEdge, RelationKind};
pub use event::NormalizedEvent;
pub use node::{CausalityNode, NodeId};
pub use records::{EdgeRecord, GraphRecords, NodeRecord};
pub use severity::Severity;
pub use ticket::TicketCluster;
