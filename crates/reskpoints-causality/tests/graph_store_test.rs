//! GraphStore contract: node uniqueness, edge validation, monotonic
//! strengthening, snapshot isolation, eviction and versioning.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reskpoints_causality::graph::sync;
use reskpoints_causality::{EdgeUpsert, GraphStore};
use reskpoints_core::errors::CausalityError;
use reskpoints_core::models::{CausalityNode, Confidence, RelationKind, Severity};

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn node(id: &str, secs: i64, component: &str) -> CausalityNode {
    CausalityNode::new(id, format!("evt-{id}"), t(secs), component, Severity::High)
}

fn store_with(ids: &[(&str, i64)]) -> GraphStore {
    let store = GraphStore::new();
    for &(id, secs) in ids {
        store.add_node(node(id, secs, "api")).unwrap();
    }
    store
}

#[test]
fn duplicate_node_is_rejected() {
    let store = store_with(&[("a", 0)]);
    let err = store.add_node(node("a", 5, "db")).unwrap_err();
    assert!(err.is_duplicate_node());
    // The first node is untouched.
    let snap = store.snapshot().unwrap();
    assert_eq!(snap.get("a").unwrap().component, "api");
}

#[test]
fn edges_require_both_endpoints() {
    let store = store_with(&[("a", 0)]);
    let err = store
        .add_or_strengthen_edge("a", "ghost", Confidence::new(0.5), RelationKind::TemporalCorrelation, None)
        .unwrap_err();
    assert_eq!(
        err.as_causality(),
        Some(&CausalityError::UnknownNode { id: "ghost".into() })
    );
    let err = store
        .add_or_strengthen_edge("ghost", "a", Confidence::new(0.5), RelationKind::TemporalCorrelation, None)
        .unwrap_err();
    assert!(err.is_unknown_node());
}

#[test]
fn self_loops_are_rejected() {
    let store = store_with(&[("a", 0)]);
    let err = store
        .add_or_strengthen_edge("a", "a", Confidence::new(0.9), RelationKind::ManualAnnotation, None)
        .unwrap_err();
    assert!(matches!(err.as_causality(), Some(CausalityError::SelfLoop { .. })));
    assert_eq!(store.stats().unwrap().edges, 0);
}

#[test]
fn strengthening_takes_the_max_and_keeps_one_edge_per_pair() {
    let store = store_with(&[("a", 0), ("b", 10)]);
    let kind = RelationKind::TemporalCorrelation;

    let first = store
        .add_or_strengthen_edge("a", "b", Confidence::new(0.5), kind, Some("first"))
        .unwrap();
    assert_eq!(first, EdgeUpsert::Created { confidence: 0.5 });

    let weaker = store
        .add_or_strengthen_edge("a", "b", Confidence::new(0.3), kind, Some("second"))
        .unwrap();
    assert_eq!(weaker, EdgeUpsert::Unchanged { confidence: 0.5 });

    let stronger = store
        .add_or_strengthen_edge("a", "b", Confidence::new(0.7), kind, Some("first"))
        .unwrap();
    assert_eq!(
        stronger,
        EdgeUpsert::Strengthened {
            previous: 0.5,
            confidence: 0.7
        }
    );

    let snap = store.snapshot().unwrap();
    assert_eq!(snap.edge_count(), 1);
    let edge = snap.edge("a", "b").unwrap();
    assert_eq!(edge.confidence.value(), 0.7);
    assert_eq!(edge.observations, 3);
    assert_eq!(edge.evidence, vec!["first".to_string(), "second".to_string()]);
    assert!(snap.edge("b", "a").is_none());
}

#[test]
fn snapshots_do_not_observe_later_writes() {
    let store = store_with(&[("a", 0), ("b", 10)]);
    let before = store.snapshot().unwrap();

    store.add_node(node("c", 20, "api")).unwrap();
    store
        .add_or_strengthen_edge("a", "b", Confidence::new(0.6), RelationKind::TemporalCorrelation, None)
        .unwrap();
    let after = store.snapshot().unwrap();

    assert_eq!(before.node_count(), 2);
    assert_eq!(before.edge_count(), 0);
    assert!(!before.contains("c"));
    assert_eq!(after.node_count(), 3);
    assert_eq!(after.edge_count(), 1);
    assert!(after.version() > before.version());
    before.verify_consistency().unwrap();
    after.verify_consistency().unwrap();
}

#[test]
fn version_moves_on_mutation_only() {
    let store = GraphStore::new();
    assert_eq!(store.version().unwrap(), 0);
    store.add_node(node("a", 0, "api")).unwrap();
    assert_eq!(store.version().unwrap(), 1);

    // Failed writes and reads leave the version alone.
    let _ = store.add_node(node("a", 0, "api"));
    let _ = store.snapshot().unwrap();
    let _ = store.exists("a").unwrap();
    assert_eq!(store.version().unwrap(), 1);

    // Nothing old enough: no-op sweep.
    let report = store.evict_before(t(-100)).unwrap();
    assert_eq!(report.nodes_removed, 0);
    assert_eq!(store.version().unwrap(), 1);
}

#[test]
fn eviction_removes_nodes_and_every_touching_edge() {
    let store = store_with(&[("old", 0), ("mid", 100), ("new", 200)]);
    let kind = RelationKind::TemporalCorrelation;
    store.add_or_strengthen_edge("old", "mid", Confidence::new(0.6), kind, None).unwrap();
    store.add_or_strengthen_edge("mid", "new", Confidence::new(0.6), kind, None).unwrap();
    store.add_or_strengthen_edge("old", "new", Confidence::new(0.4), kind, None).unwrap();

    let report = store.evict_before(t(50)).unwrap();
    assert_eq!(report.nodes_removed, 1);
    assert_eq!(report.edges_removed, 2);
    assert_eq!(report.evicted[0].as_str(), "old");

    let snap = store.snapshot().unwrap();
    assert!(!snap.contains("old"));
    assert_eq!(snap.edge_count(), 1);
    assert!(snap.edge("mid", "new").is_some());
    snap.verify_consistency().unwrap();
}

#[test]
fn evict_older_than_uses_wall_clock_age() {
    let store = GraphStore::new();
    let now = Utc::now();
    store
        .add_node(CausalityNode::new("stale", "stale", now - Duration::hours(2), "db", Severity::Low))
        .unwrap();
    store
        .add_node(CausalityNode::new("fresh", "fresh", now, "db", Severity::Low))
        .unwrap();

    let report = store.evict_older_than(Duration::hours(1)).unwrap();
    assert_eq!(report.nodes_removed, 1);
    assert!(store.exists("fresh").unwrap());
    assert!(!store.exists("stale").unwrap());
}

#[test]
fn replace_all_swaps_the_graph_and_bumps_the_version() {
    let source = store_with(&[("x", 0), ("y", 1)]);
    source
        .add_or_strengthen_edge("x", "y", Confidence::new(0.9), RelationKind::ManualAnnotation, None)
        .unwrap();
    let graph = sync::from_records(sync::to_records(&source.snapshot().unwrap())).unwrap();

    let target = store_with(&[("other", 0)]);
    let v = target.version().unwrap();
    let new_v = target.replace_all(graph).unwrap();
    assert!(new_v > v);

    let stats = target.stats().unwrap();
    assert_eq!((stats.nodes, stats.edges), (2, 1));
    assert!(!target.exists("other").unwrap());
}
