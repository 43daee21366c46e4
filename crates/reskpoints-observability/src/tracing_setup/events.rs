//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a node ingestion.
pub fn node_ingested(node_id: &str, component: &str, candidates: usize) {
    tracing::info!(
        event = "node_ingested",
        node_id = %node_id,
        component = %component,
        candidates = candidates,
        "node ingested"
    );
}

/// Log a newly materialized edge.
pub fn edge_materialized(source: &str, target: &str, confidence: f64, kind: &str) {
    tracing::debug!(
        event = "edge_materialized",
        source = %source,
        target = %target,
        confidence = confidence,
        kind = %kind,
        "edge materialized"
    );
}

/// Log an existing edge being strengthened.
pub fn edge_strengthened(source: &str, target: &str, previous: f64, confidence: f64) {
    tracing::debug!(
        event = "edge_strengthened",
        source = %source,
        target = %target,
        previous = previous,
        confidence = confidence,
        "edge strengthened"
    );
}

/// Log a candidate discarded below the materialization threshold.
pub fn candidate_discarded(source: &str, target: &str, confidence: f64, threshold: f64) {
    tracing::trace!(
        event = "candidate_discarded",
        source = %source,
        target = %target,
        confidence = confidence,
        threshold = threshold,
        "candidate discarded"
    );
}

/// Log a rejected self-loop. Non-fatal.
pub fn self_loop_dropped(node_id: &str) {
    tracing::warn!(
        event = "self_loop_dropped",
        node_id = %node_id,
        "self-loop rejected and dropped"
    );
}

/// Log an edge dropped because an endpoint vanished between snapshot and write.
pub fn edge_dropped(source: &str, target: &str, reason: &str) {
    tracing::warn!(
        event = "edge_dropped",
        source = %source,
        target = %target,
        reason = %reason,
        "edge dropped"
    );
}

/// Log a completed retention sweep.
pub fn eviction_completed(nodes_removed: usize, edges_removed: usize, history_removed: usize) {
    tracing::info!(
        event = "eviction_completed",
        nodes_removed = nodes_removed,
        edges_removed = edges_removed,
        history_removed = history_removed,
        "retention sweep completed"
    );
}

/// Log a traversal that stopped on its budget.
pub fn traversal_truncated(operation: &str, visited: usize) {
    tracing::info!(
        event = "traversal_truncated",
        operation = %operation,
        visited = visited,
        "traversal budget exhausted, returning partial result"
    );
}

/// Log an internal graph invariant violation.
pub fn graph_inconsistency(details: &str) {
    tracing::error!(
        event = "graph_inconsistency",
        details = %details,
        "graph invariant violated"
    );
}

/// Log a graph hydrated from persisted records.
pub fn graph_hydrated(node_count: usize, edge_count: usize) {
    tracing::info!(
        event = "graph_hydrated",
        node_count = node_count,
        edge_count = edge_count,
        "graph hydrated from persisted records"
    );
}
