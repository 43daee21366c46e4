//! CausalityEngine operations beyond plain ingestion.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use reskpoints_causality::{
    CausalityEngine, DependencyMap, EdgeUpsert, GraphStore, NeighborDirection,
};
use reskpoints_core::errors::{CausalityError, ReskError};
use reskpoints_core::models::{NormalizedEvent, RelationKind, Severity, TicketCluster};
use reskpoints_core::ReskConfig;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn event(id: &str, secs: i64, component: &str) -> NormalizedEvent {
    NormalizedEvent::new(id, t(secs), component, Severity::Medium)
}

fn engine() -> CausalityEngine {
    CausalityEngine::new(ReskConfig::default()).unwrap()
}

#[test]
fn reingesting_an_id_is_a_duplicate() {
    let engine = engine();
    let first = engine.ingest(event("e1", 0, "api")).unwrap();
    assert_eq!(first.node_id.as_str(), "e1");

    let err = engine.ingest(event("e1", 10, "db")).unwrap_err();
    assert!(err.is_duplicate_node());
    assert_eq!(engine.stats().unwrap().nodes, 1);
}

#[test]
fn ingest_keeps_event_reference_and_metadata() {
    let engine = engine();
    let ev = event("e1", 0, "gateway")
        .with_event_ref("errors/9001")
        .with_metadata("model", serde_json::json!("gpt-x"));
    engine.ingest(ev).unwrap();

    let node = engine.query().get_node("e1").unwrap().unwrap();
    assert_eq!(node.event_ref, "errors/9001");
    assert_eq!(node.metadata["model"], "gpt-x");
    assert_eq!(node.severity, Severity::Medium);
}

#[test]
fn annotate_validates_confidence_and_endpoints() {
    let engine = engine();
    engine.ingest(event("a", 0, "api")).unwrap();
    engine.ingest(event("b", 5000, "billing")).unwrap();

    let err = engine.annotate("a", "b", 1.5, None).unwrap_err();
    assert!(matches!(
        err,
        ReskError::Causality(CausalityError::InvalidConfidence { .. })
    ));
    let err = engine.annotate("a", "a", 0.9, None).unwrap_err();
    assert!(matches!(err.as_causality(), Some(CausalityError::SelfLoop { .. })));
    assert!(engine.annotate("a", "zzz", 0.9, None).unwrap_err().is_unknown_node());

    let created = engine.annotate("a", "b", 0.9, Some("postmortem #12")).unwrap();
    assert_eq!(created, EdgeUpsert::Created { confidence: 0.9 });

    let views = engine.query().get_neighbors("b", NeighborDirection::Incoming).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].kind, RelationKind::ManualAnnotation);
    assert_eq!(views[0].direction, NeighborDirection::Incoming);
    assert_eq!(views[0].neighbor.as_str(), "a");
}

#[test]
fn recorrelate_picks_up_dependencies_learned_later() {
    let store = Arc::new(GraphStore::new());
    let blind = CausalityEngine::with_dependencies(
        ReskConfig::default(),
        Arc::clone(&store),
        DependencyMap::new(),
    )
    .unwrap();
    blind.ingest(event("db-1", 0, "db")).unwrap();
    blind.ingest(event("api-1", 60, "api")).unwrap();
    assert_eq!(store.stats().unwrap().edges, 0);

    let informed = CausalityEngine::with_dependencies(
        ReskConfig::default(),
        Arc::clone(&store),
        DependencyMap::new().with_dependency("api", "db"),
    )
    .unwrap();
    let report = informed.recorrelate("api-1").unwrap();
    assert_eq!((report.candidates, report.created), (1, 1));
    assert!(store.snapshot().unwrap().edge("db-1", "api-1").is_some());

    // A second pass folds into the same edge.
    let again = informed.recorrelate("api-1").unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.strengthened + again.unchanged, 1);
    assert!(informed.recorrelate("nope").unwrap_err().is_unknown_node());
}

#[test]
fn retention_sweep_prunes_graph_and_history() {
    let engine = engine();
    let now = Utc::now();
    let old = now - Duration::days(3);
    engine
        .ingest(NormalizedEvent::new("o1", old, "db", Severity::High))
        .unwrap();
    engine
        .ingest(NormalizedEvent::new("o2", old + Duration::seconds(30), "db", Severity::High))
        .unwrap();
    engine
        .ingest(NormalizedEvent::new("f1", now, "api", Severity::High))
        .unwrap();
    assert_eq!(engine.scorer().history().count("db", "db"), 1);

    let report = engine.run_retention_sweep().unwrap();
    assert_eq!(report.nodes_removed, 2);
    assert_eq!(report.edges_removed, 1);
    assert_eq!(engine.scorer().history().count("db", "db"), 0);
    assert_eq!(engine.stats().unwrap().nodes, 1);
}

#[test]
fn eviction_age_beyond_the_time_range_evicts_nothing() {
    let engine = engine();
    engine.ingest(event("e1", 0, "db")).unwrap();
    assert_eq!(engine.evict(Duration::days(365 * 1_000_000)).unwrap(), 0);
    assert_eq!(engine.evict(Duration::MAX).unwrap(), 0);
    assert_eq!(engine.stats().unwrap().nodes, 1);
}

#[test]
fn windows_at_the_edge_of_the_time_range_do_not_overflow() {
    let config = ReskConfig::from_toml(&format!(
        "[correlation]\nwindow_secs = {}\n",
        reskpoints_core::constants::MAX_DURATION_SECS
    ))
    .unwrap();
    let engine = CausalityEngine::new(config).unwrap();
    engine
        .ingest(NormalizedEvent::new("first", DateTime::<Utc>::MIN_UTC, "db", Severity::Low))
        .unwrap();
    engine
        .ingest(NormalizedEvent::new("last", DateTime::<Utc>::MAX_UTC, "db", Severity::Low))
        .unwrap();
    engine.ingest(event("a", 0, "db")).unwrap();
    let report = engine.ingest(event("b", 60, "db")).unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(engine.stats().unwrap().nodes, 4);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = ReskConfig::default();
    config.scoring.materialization_threshold = 2.0;
    let err = CausalityEngine::new(config).unwrap_err();
    assert!(matches!(err, ReskError::ConfigError(_)));
}

#[test]
fn explain_ticket_names_the_root_and_affected_components() {
    let config = ReskConfig::from_toml("[dependencies]\napi = [\"db\"]\n").unwrap();
    let engine = CausalityEngine::new(config).unwrap();
    engine.ingest(event("A", 0, "db")).unwrap();
    engine.ingest(event("B", 120, "api")).unwrap();
    engine.ingest(event("C", 180, "api")).unwrap();

    let ticket = TicketCluster::new("INC-7", ["B", "C"]);
    let explanation = engine.query().explain(&ticket).unwrap();
    assert_eq!(explanation.ticket_id, "INC-7");
    assert_eq!(explanation.root.as_ref().unwrap().node_id.as_str(), "A");
    assert_eq!(explanation.chains.len(), 2);
    assert_eq!(explanation.affected_components, vec!["api", "db"]);
    assert!(!explanation.fallback);
    assert!(explanation.confidence > 0.0);
    assert!(explanation.summary.contains("probable root cause A (db)"));
    assert!(explanation
        .contributing_factors
        .iter()
        .any(|f| f.starts_with("[dependency]")));
}
