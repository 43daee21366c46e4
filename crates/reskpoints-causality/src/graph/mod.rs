//! Graph layer: arena representation, the snapshot-isolated store,
//! retention, and record sync.

pub mod indexed_graph;
pub mod retention;
pub mod store;
pub mod sync;

pub use indexed_graph::{CausalityGraph, Direction, EdgeUpsert, Slot};
pub use retention::EvictionReport;
pub use store::{GraphSnapshot, GraphStats, GraphStore};
