use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use reskpoints_core::models::*;

fn at(secs: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[test]
fn severity_is_ordered() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
    assert!(Severity::High < Severity::Critical);
    assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
}

#[test]
fn severity_string_roundtrip() {
    for s in Severity::ALL {
        assert_eq!(Severity::from_str_name(s.as_str()), Some(s));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, format!("\"{}\"", s.as_str()));
    }
    assert_eq!(Severity::from_str_name("catastrophic"), None);
}

#[test]
fn relation_kind_string_roundtrip() {
    for k in RelationKind::ALL {
        assert_eq!(RelationKind::from_str_name(k.as_str()), Some(k));
    }
}

#[test]
fn confidence_clamps_and_rejects_nan() {
    assert_eq!(Confidence::new(1.7).value(), 1.0);
    assert_eq!(Confidence::new(-0.2).value(), 0.0);
    assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    assert!(Confidence::try_new(1.01).is_none());
    assert_eq!(Confidence::try_new(0.5).map(Confidence::value), Some(0.5));
}

#[test]
fn confidence_levels() {
    assert_eq!(Confidence::new(0.85).level(), ConfidenceLevel::High);
    assert_eq!(Confidence::new(0.56).level(), ConfidenceLevel::Medium);
    assert_eq!(Confidence::new(0.3).level(), ConfidenceLevel::Low);
    assert_eq!(Confidence::new(0.1).level(), ConfidenceLevel::VeryLow);
}

#[test]
fn node_from_event_keeps_every_field() {
    let event = NormalizedEvent::new("evt-1", at(0), "db", Severity::High)
        .with_event_ref("errors/42")
        .with_metadata("error_type", serde_json::json!("timeout"));
    let node = CausalityNode::from_event(event.clone());
    assert_eq!(node.id, event.id);
    assert_eq!(node.event_ref, "errors/42");
    assert_eq!(node.component, "db");
    assert_eq!(node.metadata["error_type"], "timeout");
}

#[test]
fn edge_strengthen_keeps_max_and_counts_observations() {
    let mut edge = CausalityEdge::new(
        "a".into(),
        "b".into(),
        Confidence::new(0.6),
        RelationKind::TemporalCorrelation,
        at(0),
    );
    assert!(!edge.strengthen(Confidence::new(0.4), at(10), Some("weaker")));
    assert_eq!(edge.confidence.value(), 0.6);
    assert!(edge.strengthen(Confidence::new(0.9), at(20), Some("stronger")));
    assert_eq!(edge.confidence.value(), 0.9);
    assert_eq!(edge.observations, 3);
    assert_eq!(edge.updated_at, at(20));
    assert_eq!(edge.evidence, vec!["weaker", "stronger"]);
}

#[test]
fn edge_evidence_is_deduplicated() {
    let mut edge = CausalityEdge::new(
        "a".into(),
        "b".into(),
        Confidence::new(0.5),
        RelationKind::ManualAnnotation,
        at(0),
    );
    edge.add_evidence("runbook");
    edge.add_evidence("runbook");
    edge.add_evidence("");
    assert_eq!(edge.evidence.len(), 1);
}

#[test]
fn records_use_flat_camel_case_layout() {
    let node = CausalityNode::new("n1", "errors/1", at(0), "api", Severity::Critical);
    let json = serde_json::to_value(NodeRecord::from(&node)).unwrap();
    for key in ["id", "eventRef", "ts", "component", "severity", "metadata"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }

    let edge = CausalityEdge::new(
        "n1".into(),
        "n2".into(),
        Confidence::new(0.7),
        RelationKind::ComponentDependency,
        at(5),
    );
    let json = serde_json::to_value(EdgeRecord::from(&edge)).unwrap();
    for key in ["src", "dst", "confidence", "kind", "ts"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["kind"], "component_dependency");
}

#[test]
fn minimal_edge_record_decodes_with_defaults() {
    let json = r#"{"src":"a","dst":"b","confidence":0.42,"kind":"temporal_correlation","ts":"2024-01-01T00:00:00Z"}"#;
    let record: EdgeRecord = serde_json::from_str(json).unwrap();
    let edge = record.to_edge().unwrap();
    assert_eq!(edge.observations, 1);
    assert_eq!(edge.updated_at, edge.created_at);
    assert!(edge.evidence.is_empty());
}

#[test]
fn edge_record_with_bad_confidence_is_rejected() {
    let json = r#"{"src":"a","dst":"b","confidence":1.3,"kind":"temporal_correlation","ts":"2024-01-01T00:00:00Z"}"#;
    let record: EdgeRecord = serde_json::from_str(json).unwrap();
    assert!(record.to_edge().is_none());
}

#[test]
fn ticket_cluster_deduplicates_ids() {
    let cluster = TicketCluster::new("T-1", ["a", "b", "a"]);
    assert_eq!(cluster.len(), 2);
    assert!(!cluster.is_empty());
}

proptest! {
    #[test]
    fn confidence_always_in_unit_interval(v in proptest::num::f64::ANY) {
        let c = Confidence::new(v).value();
        prop_assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn strengthen_never_decreases(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
        let base = Confidence::new(a);
        let out = base.strengthen(Confidence::new(b));
        prop_assert!(out.value() >= base.value());
        prop_assert!(out.value() >= b.min(1.0));
    }
}
