//! CausalityEngine: wires correlation, scoring and the graph store into the
//! ingestion pipeline, and owns retention and persistence hand-off.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reskpoints_core::errors::{CausalityError, ReskError, ReskResult};
use reskpoints_core::models::{
    CausalityNode, Confidence, GraphRecords, NodeId, NormalizedEvent, RelationKind,
};
use reskpoints_core::traits::IGraphPersistence;
use reskpoints_core::ReskConfig;
use reskpoints_observability::events;
use serde::Serialize;

use crate::correlation::{CandidateEdge, CorrelationEngine, DependencyMap};
use crate::graph::{retention, sync, EdgeUpsert, EvictionReport, GraphStats, GraphStore};
use crate::query::GraphQueryFacade;
use crate::scoring::{ConfidenceScorer, ScoredCandidate};

/// What one ingestion (or re-correlation) did to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub node_id: NodeId,
    /// Candidates proposed by correlation.
    pub candidates: usize,
    pub created: usize,
    pub strengthened: usize,
    /// Observations folded into an existing edge without raising it.
    pub unchanged: usize,
    /// Below the materialization threshold.
    pub discarded: usize,
    /// Rejected at write time (self-loop, or an endpoint evicted meanwhile).
    pub dropped: usize,
}

/// The causality engine.
#[derive(Debug)]
pub struct CausalityEngine {
    config: ReskConfig,
    store: Arc<GraphStore>,
    correlation: CorrelationEngine,
    scorer: ConfidenceScorer,
}

impl CausalityEngine {
    /// Create an engine with its own empty store. The dependency map comes
    /// from `config.dependencies`.
    pub fn new(config: ReskConfig) -> ReskResult<Self> {
        Self::with_store(config, Arc::new(GraphStore::new()))
    }

    /// Create an engine over an existing store.
    pub fn with_store(config: ReskConfig, store: Arc<GraphStore>) -> ReskResult<Self> {
        let dependencies = DependencyMap::from_config(&config.dependencies);
        Self::with_dependencies(config, store, dependencies)
    }

    /// Create an engine with an explicit dependency map.
    pub fn with_dependencies(
        config: ReskConfig,
        store: Arc<GraphStore>,
        dependencies: DependencyMap,
    ) -> ReskResult<Self> {
        config.validate()?;
        Ok(Self {
            correlation: CorrelationEngine::new(config.correlation.clone(), dependencies),
            scorer: ConfidenceScorer::new(config.scoring.clone()),
            store,
            config,
        })
    }

    pub fn config(&self) -> &ReskConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    pub fn correlation(&self) -> &CorrelationEngine {
        &self.correlation
    }

    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    /// Read-only facade sharing this engine's store.
    pub fn query(&self) -> GraphQueryFacade {
        GraphQueryFacade::new(Arc::clone(&self.store), self.config.analysis.clone())
    }

    pub fn stats(&self) -> ReskResult<GraphStats> {
        self.store.stats()
    }

    // --- Ingestion ---

    /// Ingest a normalized event. Fails with `DuplicateNode` if its id is known.
    pub fn ingest(&self, event: NormalizedEvent) -> ReskResult<IngestReport> {
        self.ingest_node(CausalityNode::from_event(event))
    }

    /// Ingest a prebuilt node.
    pub fn ingest_node(&self, node: CausalityNode) -> ReskResult<IngestReport> {
        let _span = reskpoints_observability::ingest_span!(node.id, node.component).entered();

        if self.store.exists(node.id.as_str())? {
            return Err(CausalityError::DuplicateNode {
                id: node.id.0.clone(),
            }
            .into());
        }

        // Correlation and scoring run against a snapshot, outside the write lock.
        let snapshot = self.store.snapshot()?;
        let candidates = self.correlation.propose(&node, &snapshot);
        drop(snapshot);

        let mut report = IngestReport {
            node_id: node.id.clone(),
            candidates: candidates.len(),
            ..Default::default()
        };
        let scored = self.score_all(candidates, node.timestamp, &mut report);

        let component = node.component.clone();
        self.store.add_node(node)?;
        self.write_edges(scored, &mut report)?;

        events::node_ingested(report.node_id.as_str(), &component, report.candidates);
        Ok(report)
    }

    /// Re-run correlation for a node already in the graph and fold the
    /// results into its edges.
    pub fn recorrelate(&self, id: &str) -> ReskResult<IngestReport> {
        let snapshot = self.store.snapshot()?;
        let at = snapshot
            .get(id)
            .map(|n| n.timestamp)
            .ok_or_else(|| CausalityError::UnknownNode { id: id.to_string() })?;
        let candidates = self.correlation.recorrelate(id, &snapshot)?;
        drop(snapshot);

        let mut report = IngestReport {
            node_id: NodeId::from(id),
            candidates: candidates.len(),
            ..Default::default()
        };
        let scored = self.score_all(candidates, at, &mut report);
        self.write_edges(scored, &mut report)?;
        Ok(report)
    }

    /// Assert a causal edge by hand. `confidence` must lie in [0, 1].
    pub fn annotate(
        &self,
        source: &str,
        target: &str,
        confidence: f64,
        note: Option<&str>,
    ) -> ReskResult<EdgeUpsert> {
        let confidence = Confidence::try_new(confidence)
            .ok_or(CausalityError::InvalidConfidence { value: confidence })?;
        let outcome = self.store.add_or_strengthen_edge(
            source,
            target,
            confidence,
            RelationKind::ManualAnnotation,
            note,
        )?;
        log_upsert(source, target, RelationKind::ManualAnnotation, outcome);
        Ok(outcome)
    }

    // --- Retention ---

    /// Evict every node older than `now - older_than`. Returns the number of
    /// nodes removed.
    pub fn evict(&self, older_than: chrono::Duration) -> ReskResult<usize> {
        Ok(self
            .evict_before(retention::cutoff_before(Utc::now(), older_than))?
            .nodes_removed)
    }

    /// Evict every node with a timestamp before `cutoff` and prune the
    /// component history not seen since then.
    pub fn evict_before(&self, cutoff: DateTime<Utc>) -> ReskResult<EvictionReport> {
        let _span = reskpoints_observability::eviction_span!(cutoff).entered();
        let report = self.store.evict_before(cutoff)?;
        let history_removed = self.scorer.history().prune_before(cutoff);
        events::eviction_completed(report.nodes_removed, report.edges_removed, history_removed);
        Ok(report)
    }

    /// Evict with the configured retention horizon. Scheduling is up to the host.
    pub fn run_retention_sweep(&self) -> ReskResult<EvictionReport> {
        self.evict_before(retention::cutoff_before(
            Utc::now(),
            self.config.retention.horizon(),
        ))
    }

    // --- Persistence ---

    /// Replace the graph with the one held by the persistence hook and
    /// rebuild the component history from its edges.
    pub fn hydrate(&self, persistence: &dyn IGraphPersistence) -> ReskResult<GraphStats> {
        let records = persistence.load()?;
        let _span =
            reskpoints_observability::hydrate_span!(records.nodes.len(), records.edges.len())
                .entered();
        let graph = sync::from_records(records)?;

        let history = self.scorer.history();
        history.clear();
        for edge in graph.edges() {
            if edge.kind == RelationKind::ManualAnnotation {
                continue;
            }
            let (Some(source), Some(target)) =
                (graph.get(edge.source.as_str()), graph.get(edge.target.as_str()))
            else {
                continue;
            };
            history.seed(
                &source.component,
                &target.component,
                u64::from(edge.observations),
                target.timestamp,
            );
        }

        let (nodes, edges) = (graph.node_count(), graph.edge_count());
        self.store.replace_all(graph)?;
        events::graph_hydrated(nodes, edges);
        self.store.stats()
    }

    /// Hand the current graph to the persistence hook. Returns the number of
    /// records written.
    pub fn persist(&self, persistence: &dyn IGraphPersistence) -> ReskResult<usize> {
        let snapshot = self.store.snapshot()?;
        sync::persist(persistence, &snapshot)
    }

    /// Flat records of the current graph.
    pub fn export_records(&self) -> ReskResult<GraphRecords> {
        let snapshot = self.store.snapshot()?;
        Ok(sync::to_records(&snapshot))
    }

    // --- Internal ---

    fn score_all(
        &self,
        candidates: Vec<CandidateEdge>,
        at: DateTime<Utc>,
        report: &mut IngestReport,
    ) -> Vec<ScoredCandidate> {
        let threshold = self.scorer.threshold();
        candidates
            .into_iter()
            .map(|c| self.scorer.score(c, at))
            .filter(|s| {
                if s.materializes() {
                    return true;
                }
                report.discarded += 1;
                events::candidate_discarded(
                    s.candidate.source.as_str(),
                    s.candidate.target.as_str(),
                    s.confidence.value(),
                    threshold,
                );
                false
            })
            .collect()
    }

    fn write_edges(&self, scored: Vec<ScoredCandidate>, report: &mut IngestReport) -> ReskResult<()> {
        for s in scored {
            let c = &s.candidate;
            let (source, target) = (c.source.as_str(), c.target.as_str());
            let evidence = format!(
                "{}: {}ms apart, {} prior",
                c.kind, c.temporal_distance_ms, s.prior_count
            );
            match self.store.add_or_strengthen_edge(
                source,
                target,
                s.confidence,
                c.kind,
                Some(&evidence),
            ) {
                Ok(outcome) => {
                    match outcome {
                        EdgeUpsert::Created { .. } => report.created += 1,
                        EdgeUpsert::Strengthened { .. } => report.strengthened += 1,
                        EdgeUpsert::Unchanged { .. } => report.unchanged += 1,
                    }
                    log_upsert(source, target, c.kind, outcome);
                }
                Err(ReskError::Causality(CausalityError::SelfLoop { id })) => {
                    events::self_loop_dropped(&id);
                    report.dropped += 1;
                }
                Err(ReskError::Causality(CausalityError::UnknownNode { id })) => {
                    events::edge_dropped(source, target, &format!("endpoint {id} no longer exists"));
                    report.dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn log_upsert(source: &str, target: &str, kind: RelationKind, outcome: EdgeUpsert) {
    match outcome {
        EdgeUpsert::Created { confidence } => {
            events::edge_materialized(source, target, confidence, kind.as_str());
        }
        EdgeUpsert::Strengthened {
            previous,
            confidence,
        } => events::edge_strengthened(source, target, previous, confidence),
        EdgeUpsert::Unchanged { .. } => {}
    }
}
