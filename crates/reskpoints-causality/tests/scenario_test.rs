//! End-to-end incident scenarios through the engine's public operations.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reskpoints_causality::{CausalityEngine, NeighborDirection};
use reskpoints_core::models::{NormalizedEvent, RelationKind, Severity};
use reskpoints_core::ReskConfig;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn event(id: &str, ts: DateTime<Utc>, component: &str) -> NormalizedEvent {
    NormalizedEvent::new(id, ts, component, Severity::High)
}

fn engine_with_api_on_db() -> CausalityEngine {
    let config = ReskConfig::from_toml(
        r#"
        [dependencies]
        api = ["db"]
        "#,
    )
    .unwrap();
    CausalityEngine::new(config).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// A: db timeout → api latency spike → api ticket.
#[test]
fn scenario_a_db_timeout_is_the_root_of_the_api_ticket() {
    let engine = engine_with_api_on_db();
    engine.ingest(event("A", t(0), "db")).unwrap();
    let b = engine.ingest(event("B", t(120), "api")).unwrap();
    assert_eq!(b.created, 1);
    let c = engine.ingest(event("C", t(180), "api")).unwrap();
    assert_eq!((c.candidates, c.created, c.discarded), (2, 2, 0));

    let snap = engine.store().snapshot().unwrap();
    let ab = snap.edge("A", "B").unwrap();
    assert_eq!(ab.kind, RelationKind::ComponentDependency);
    // 0.4 * (1 - 120/900) + 0.4 * 0.4, first observation of db → api.
    assert!(close(ab.confidence.value(), 0.4 * (1.0 - 120.0 / 900.0) + 0.16));
    // Second db → api candidate carries one prior observation.
    assert!(close(snap.edge("A", "C").unwrap().confidence.value(), 0.32 + 0.16 + 0.02));
    let bc = snap.edge("B", "C").unwrap();
    assert_eq!(bc.kind, RelationKind::TemporalCorrelation);
    assert!(close(bc.confidence.value(), 0.4 * (1.0 - 60.0 / 900.0) + 0.4));

    let report = engine.query().root_cause_of(["C"]).unwrap();
    let ids: Vec<_> = report.ranked_ids().into_iter().map(|id| id.0).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

/// B: identical timestamps on one component link at high confidence.
#[test]
fn scenario_b_same_instant_same_component_materializes() {
    let engine = engine_with_api_on_db();
    engine.ingest(event("P1", t(0), "inference")).unwrap();
    let report = engine.ingest(event("P2", t(0), "inference")).unwrap();
    assert_eq!(report.created, 1);

    let edge = engine.store().snapshot().unwrap().edge("P1", "P2").cloned().unwrap();
    assert!(edge.confidence.value() >= 0.8);
    assert_eq!(edge.kind, RelationKind::TemporalCorrelation);
}

/// C: a 0.2 candidate is discarded and never shows up as a neighbor.
#[test]
fn scenario_c_weak_candidate_is_discarded() {
    let engine = engine_with_api_on_db();
    engine.ingest(event("D1", t(0), "db")).unwrap();
    let report = engine.ingest(event("A1", t(810), "api")).unwrap();
    assert_eq!((report.candidates, report.created, report.discarded), (1, 0, 1));

    let query = engine.query();
    assert!(query.get_neighbors("D1", NeighborDirection::Both).unwrap().is_empty());
    assert!(query.get_neighbors("A1", NeighborDirection::Incoming).unwrap().is_empty());
}

/// D: eviction removes the node and its edges; later queries fail loudly.
#[test]
fn scenario_d_evicted_node_is_unknown_not_stale() {
    let engine = engine_with_api_on_db();
    let now = Utc::now();
    engine.ingest(event("old", now - Duration::minutes(70), "db")).unwrap();
    engine.ingest(event("mid", now - Duration::minutes(58), "db")).unwrap();
    engine.ingest(event("new", now - Duration::minutes(56), "db")).unwrap();
    assert_eq!(engine.stats().unwrap().edges, 3);

    let removed = engine.evict(Duration::hours(1)).unwrap();
    assert_eq!(removed, 1);

    let query = engine.query();
    let err = query.impact_of("old").unwrap_err();
    assert!(err.is_unknown_node());
    assert!(query.get_node("old").unwrap().is_none());

    let neighbors = query.get_neighbors("mid", NeighborDirection::Both).unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].neighbor.as_str(), "new");
    assert_eq!(engine.stats().unwrap().edges, 1);
}
