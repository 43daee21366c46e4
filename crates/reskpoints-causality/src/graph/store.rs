//! GraphStore: the only mutator of the causality graph.
//!
//! Readers take an `Arc` snapshot and never block writers beyond the brief
//! moment the pointer is cloned. Writers serialize on the exclusive lock and
//! mutate copy-on-write, so outstanding snapshots keep seeing the graph they
//! were taken from.

use std::ops::Deref;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use reskpoints_core::errors::{CausalityError, ReskError, ReskResult};
use reskpoints_core::models::{CausalityNode, Confidence, NodeId, RelationKind};
use serde::Serialize;

use super::indexed_graph::{CausalityGraph, EdgeUpsert};
use super::retention::{self, EvictionReport};

#[derive(Debug)]
struct StoreState {
    graph: Arc<CausalityGraph>,
    version: u64,
}

/// Immutable view of the graph at one version.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    graph: Arc<CausalityGraph>,
    version: u64,
}

impl GraphSnapshot {
    /// Store version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn graph(&self) -> &CausalityGraph {
        &self.graph
    }
}

impl Deref for GraphSnapshot {
    type Target = CausalityGraph;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

/// Counters describing the current graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub version: u64,
}

/// Thread-safe owner of the causality graph.
#[derive(Debug)]
pub struct GraphStore {
    state: RwLock<StoreState>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::from_graph(CausalityGraph::new())
    }

    /// Wrap an existing graph, e.g. one rebuilt from persisted records.
    pub fn from_graph(graph: CausalityGraph) -> Self {
        Self {
            state: RwLock::new(StoreState {
                graph: Arc::new(graph),
                version: 0,
            }),
        }
    }

    /// Insert a node. Fails with `DuplicateNode` if the id is already present.
    pub fn add_node(&self, node: CausalityNode) -> ReskResult<NodeId> {
        let id = node.id.clone();
        self.mutate(|graph| graph.insert_node(node).map(|_| ()))?;
        Ok(id)
    }

    pub fn exists(&self, id: &str) -> ReskResult<bool> {
        Ok(self.read()?.graph.contains(id))
    }

    /// Create the `source → target` edge or strengthen the existing one.
    pub fn add_or_strengthen_edge(
        &self,
        source: &str,
        target: &str,
        confidence: Confidence,
        kind: RelationKind,
        evidence: Option<&str>,
    ) -> ReskResult<EdgeUpsert> {
        self.add_or_strengthen_edge_at(source, target, confidence, kind, evidence, Utc::now())
    }

    /// As [`add_or_strengthen_edge`](Self::add_or_strengthen_edge) with an explicit write time.
    pub fn add_or_strengthen_edge_at(
        &self,
        source: &str,
        target: &str,
        confidence: Confidence,
        kind: RelationKind,
        evidence: Option<&str>,
        at: DateTime<Utc>,
    ) -> ReskResult<EdgeUpsert> {
        // Validate against the current graph first so a rejected write
        // never forces a copy.
        {
            let state = self.read()?;
            if source == target {
                return Err(CausalityError::SelfLoop {
                    id: source.to_string(),
                }
                .into());
            }
            for id in [source, target] {
                if !state.graph.contains(id) {
                    return Err(CausalityError::UnknownNode { id: id.to_string() }.into());
                }
            }
        }
        self.mutate(|graph| graph.upsert_edge(source, target, confidence, kind, at, evidence))
    }

    /// Immutable snapshot of the current graph.
    pub fn snapshot(&self) -> ReskResult<GraphSnapshot> {
        let state = self.read()?;
        Ok(GraphSnapshot {
            graph: Arc::clone(&state.graph),
            version: state.version,
        })
    }

    /// Remove every node older than `now - age` together with its edges.
    pub fn evict_older_than(&self, age: chrono::Duration) -> ReskResult<EvictionReport> {
        self.evict_before(retention::cutoff_before(Utc::now(), age))
    }

    /// Remove every node whose timestamp is strictly before `cutoff`.
    pub fn evict_before(&self, cutoff: DateTime<Utc>) -> ReskResult<EvictionReport> {
        {
            let state = self.read()?;
            if state.graph.slots_before(cutoff).is_empty() {
                return Ok(EvictionReport::empty(cutoff));
            }
        }
        let mut state = self.write()?;
        let report = retention::evict(Arc::make_mut(&mut state.graph), cutoff);
        state.version += 1;
        Ok(report)
    }

    /// Swap in a whole graph. Used when hydrating from persisted records.
    pub fn replace_all(&self, graph: CausalityGraph) -> ReskResult<u64> {
        let mut state = self.write()?;
        state.graph = Arc::new(graph);
        state.version += 1;
        Ok(state.version)
    }

    pub fn version(&self) -> ReskResult<u64> {
        Ok(self.read()?.version)
    }

    pub fn stats(&self) -> ReskResult<GraphStats> {
        let state = self.read()?;
        Ok(GraphStats {
            nodes: state.graph.node_count(),
            edges: state.graph.edge_count(),
            version: state.version,
        })
    }

    // --- Internal ---

    // Clones the whole graph when a snapshot still shares it.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut CausalityGraph) -> Result<T, CausalityError>,
    ) -> ReskResult<T> {
        let mut state = self.write()?;
        let out = f(Arc::make_mut(&mut state.graph))?;
        state.version += 1;
        Ok(out)
    }

    fn read(&self) -> ReskResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| ReskError::ConcurrencyError(e.to_string()))
    }

    fn write(&self) -> ReskResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| ReskError::ConcurrencyError(e.to_string()))
    }
}
