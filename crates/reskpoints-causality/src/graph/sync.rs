//! Conversion between the in-memory graph and flat persisted records.
//! Rebuild the graph on startup, export it for the persistence hook.

use reskpoints_core::errors::{CausalityError, PersistenceError, ReskResult};
use reskpoints_core::models::{CausalityNode, EdgeRecord, GraphRecords, NodeRecord};
use reskpoints_core::traits::IGraphPersistence;

use super::indexed_graph::CausalityGraph;

/// Flatten a graph into records. Output order is deterministic:
/// nodes by (timestamp, id), edges by (src, dst).
pub fn to_records(graph: &CausalityGraph) -> GraphRecords {
    let mut nodes: Vec<NodeRecord> = graph.nodes().map(|n| NodeRecord::from(n.as_ref())).collect();
    nodes.sort_by(|a, b| a.ts.cmp(&b.ts).then_with(|| a.id.cmp(&b.id)));

    let mut edges: Vec<EdgeRecord> = graph.edges().map(EdgeRecord::from).collect();
    edges.sort_by(|a, b| a.src.cmp(&b.src).then_with(|| a.dst.cmp(&b.dst)));

    GraphRecords { nodes, edges }
}

/// Rebuild a graph from records.
///
/// Any record that would violate a graph invariant (duplicate node, dangling
/// or self-looping edge, duplicate ordered pair, confidence outside [0, 1])
/// fails the whole load with `CorruptRecord`.
pub fn from_records(records: GraphRecords) -> ReskResult<CausalityGraph> {
    let mut graph = CausalityGraph::new();
    for record in records.nodes {
        graph
            .insert_node(CausalityNode::from(record))
            .map_err(corrupt)?;
    }
    for record in &records.edges {
        let edge = record.to_edge().ok_or_else(|| PersistenceError::CorruptRecord {
            details: format!(
                "edge {} -> {} has confidence {} outside [0, 1]",
                record.src, record.dst, record.confidence
            ),
        })?;
        let inserted = graph.restore_edge(edge).map_err(corrupt)?;
        if !inserted {
            return Err(PersistenceError::CorruptRecord {
                details: format!("duplicate edge {} -> {}", record.src, record.dst),
            }
            .into());
        }
    }
    Ok(graph)
}

/// Serialize a graph as pretty-printed JSON records.
pub fn to_json(graph: &CausalityGraph) -> ReskResult<String> {
    Ok(serde_json::to_string_pretty(&to_records(graph))?)
}

/// Rebuild a graph from JSON records.
pub fn from_json(input: &str) -> ReskResult<CausalityGraph> {
    let records: GraphRecords = serde_json::from_str(input)?;
    from_records(records)
}

/// Hand the graph to the persistence hook.
pub fn persist(persistence: &dyn IGraphPersistence, graph: &CausalityGraph) -> ReskResult<usize> {
    let records = to_records(graph);
    let count = records.nodes.len() + records.edges.len();
    persistence.save(&records)?;
    Ok(count)
}

/// Load a graph through the persistence hook.
pub fn load(persistence: &dyn IGraphPersistence) -> ReskResult<CausalityGraph> {
    from_records(persistence.load()?)
}

fn corrupt(e: CausalityError) -> PersistenceError {
    PersistenceError::CorruptRecord {
        details: e.to_string(),
    }
}
