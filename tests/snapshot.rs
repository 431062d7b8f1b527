//! Tests for snapshot loading, repair behavior and collection.
mod common;
use common::*;
use keiro::host::{GraphHost, NodeSpec};
use keiro::ports::configure_ports;
use keiro::prelude::*;
use keiro::snapshot::collect;
use serde_json::json;

#[test]
fn load_rebuilds_nodes_and_edges() {
    let (host, report) = load_with_report(&simple_flow_payload());
    assert_eq!(report.nodes_added, 3);
    assert_eq!(report.edges_added, 2);
    assert!(report.issues.is_empty());
    assert_eq!(host.node_count(), 3);
    assert_eq!(host.edge_count(), 2);
}

#[test]
fn load_replaces_existing_cells() {
    let mut host = load_into_host(&simple_flow_payload());
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);

    let smaller = json!({
        "nodes": [{ "id": "only", "type": "start", "x": 0.0, "y": 0.0 }],
        "connections": [],
    });
    assert!(loader.load_value(&mut host, &smaller));
    assert_eq!(host.node_count(), 1);
    assert_eq!(host.edge_count(), 0);
    assert!(host.node("only").is_some());
}

#[test]
fn loading_twice_is_idempotent() {
    let mut host = MemoryHost::new();
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);
    let payload = split_flow_payload();

    assert!(loader.load_value(&mut host, &payload));
    assert!(loader.load_value(&mut host, &payload));
    assert_eq!(host.node_count(), 4);
    assert_eq!(host.edge_count(), 3);
}

#[test]
fn malformed_payload_is_rejected_without_mutation() {
    let mut host = load_into_host(&simple_flow_payload());
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);

    for payload in [
        json!(null),
        json!([1, 2, 3]),
        json!({ "nodes": [] }),
        json!({ "nodes": {}, "connections": [] }),
        json!({ "nodes": [], "connections": "nope" }),
    ] {
        assert!(!loader.load_value(&mut host, &payload));
        assert_eq!(host.node_count(), 3, "host must be untouched");
        assert_eq!(host.edge_count(), 2);
    }
}

#[test]
fn duplicate_records_first_wins() {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "start", "x": 1.0, "y": 1.0 },
            { "id": "a", "type": "sms", "x": 9.0, "y": 9.0 },
            { "id": "b", "type": "end", "x": 2.0, "y": 2.0 },
        ],
        "connections": [
            { "id": "e", "source": "a", "target": "b", "sourcePort": "out-0" },
            { "id": "e", "source": "a", "target": "b", "sourcePort": "out-0" },
        ],
    });
    let (host, report) = load_with_report(&payload);

    assert_eq!(host.node_count(), 2);
    assert_eq!(host.edge_count(), 1);
    let kept = host.node("a").unwrap();
    assert_eq!(kept.node_type(), Some("start"));
    assert!(report.issues.contains(&RecoverableIssue::DuplicateNodeDropped {
        node_id: "a".to_string()
    }));
    assert!(report.issues.contains(&RecoverableIssue::DuplicateEdgeDropped {
        key: "e".to_string()
    }));
}

#[test]
fn dangling_edges_are_skipped() {
    let payload = json!({
        "nodes": [{ "id": "a", "type": "start", "x": 0.0, "y": 0.0 }],
        "connections": [{ "source": "a", "target": "ghost", "sourcePort": "out-0" }],
    });
    let (host, report) = load_with_report(&payload);
    assert_eq!(host.edge_count(), 0);
    assert!(report.issues.contains(&RecoverableIssue::DanglingEdgeSkipped {
        source: "a".to_string(),
        target: "ghost".to_string(),
    }));
}

#[test]
fn stale_source_port_is_reassigned_to_first_unused() {
    let payload = json!({
        "nodes": [
            { "id": "s", "type": "ab-test", "x": 0.0, "y": 0.0,
              "config": { "branches": [
                  { "id": "b1", "name": "A" },
                  { "id": "b2", "name": "B" },
              ] } },
            { "id": "t1", "type": "end", "x": 1.0, "y": 0.0 },
            { "id": "t2", "type": "end", "x": 1.0, "y": 1.0 },
        ],
        "connections": [
            { "id": "e1", "source": "s", "target": "t1",
              "sourcePort": "out-0", "branchId": "b1" },
            { "id": "e2", "source": "s", "target": "t2",
              "sourcePort": "out-9", "branchId": "b2" },
        ],
    });
    let (host, report) = load_with_report(&payload);

    // out-0 is taken by e1, so the stale out-9 lands on out-1.
    let edges = host.outgoing_edges("s");
    let rewired = edges.iter().find(|e| e.id == "e2").unwrap();
    assert_eq!(rewired.source_port.as_deref(), Some("out-1"));
    assert!(report.issues.contains(&RecoverableIssue::PortReassigned {
        node_id: "s".to_string(),
        from: Some("out-9".to_string()),
        to: "out-1".to_string(),
    }));
}

#[test]
fn missing_branch_id_is_backfilled_for_every_splitting_type() {
    for node_type in ["audience-split", "event-split", "ab-test"] {
        let payload = json!({
            "nodes": [
                { "id": "s", "type": node_type, "x": 0.0, "y": 0.0,
                  "config": { "branches": [
                      { "id": "left", "name": "Left" },
                      { "id": "right", "name": "Right" },
                  ] } },
                { "id": "t", "type": "end", "x": 1.0, "y": 0.0 },
            ],
            "connections": [
                { "id": "e1", "source": "s", "target": "t", "sourcePort": "out-1" },
            ],
        });
        let (host, report) = load_with_report(&payload);

        let edge = host.outgoing_edges("s")[0];
        assert_eq!(edge.branch_id(), Some("right"), "type {node_type}");
        assert!(
            report
                .issues
                .iter()
                .any(|i| matches!(i, RecoverableIssue::BranchIdRepaired { branch_id, .. }
                    if branch_id == "right")),
            "type {node_type}"
        );
    }
}

#[test]
fn branch_id_is_not_backfilled_for_plain_nodes() {
    let payload = json!({
        "nodes": [
            { "id": "s", "type": "sms", "x": 0.0, "y": 0.0,
              "config": { "smsTemplate": "hi" } },
            { "id": "t", "type": "end", "x": 1.0, "y": 0.0 },
        ],
        "connections": [{ "id": "e1", "source": "s", "target": "t", "sourcePort": "out-0" }],
    });
    let (host, report) = load_with_report(&payload);
    assert_eq!(host.outgoing_edges("s")[0].branch_id(), None);
    assert!(report.issues.is_empty());
}

#[test]
fn is_configured_precedence() {
    let payload = json!({
        "nodes": [
            // Explicit flag inside config wins over the record flag.
            { "id": "a", "type": "sms", "x": 0.0, "y": 0.0,
              "isConfigured": false,
              "config": { "isConfigured": true, "smsTemplate": "hi" } },
            // Record flag applies when config has none.
            { "id": "b", "type": "sms", "x": 0.0, "y": 0.0,
              "isConfigured": true, "config": { "smsTemplate": "hi" } },
            // Start nodes default to configured.
            { "id": "c", "type": "start", "x": 0.0, "y": 0.0 },
            // Everything else defaults to unconfigured.
            { "id": "d", "type": "sms", "x": 0.0, "y": 0.0 },
        ],
        "connections": [],
    });
    let (host, _) = load_with_report(&payload);

    for (id, expected) in [("a", true), ("b", true), ("c", true), ("d", false)] {
        let flag = host.node(id).unwrap().data["isConfigured"].as_bool();
        assert_eq!(flag, Some(expected), "node {id}");
    }
}

#[test]
fn legacy_field_spellings_are_accepted() {
    let payload = json!({
        "nodes": [
            { "id": "a", "nodeType": "start", "x": 0.0, "y": 0.0 },
            { "id": "b", "nodeType": "end", "x": 1.0, "y": 0.0 },
        ],
        "connections": [
            { "id": "e", "source": "a", "target": "b",
              "sourcePortId": "out-0", "targetPortId": "in" },
        ],
    });
    let snapshot = snapshot_of(&payload);
    assert_eq!(snapshot.nodes[0].node_type, "start");
    assert_eq!(snapshot.connections[0].source_port.as_deref(), Some("out-0"));
    assert_eq!(snapshot.connections[0].target_port.as_deref(), Some("in"));

    let (host, report) = load_with_report(&payload);
    assert_eq!(host.edge_count(), 1);
    assert!(report.issues.is_empty());
}

#[test]
fn legacy_position_object_is_folded_into_coordinates() {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "start", "position": { "x": 5.0, "y": 6.0 } },
            // The nested object wins when both spellings are present.
            { "id": "b", "type": "sms", "x": 1.0, "y": 2.0,
              "position": { "x": 30.0, "y": 40.0 } },
            { "id": "c", "type": "end", "x": 7.0, "y": 8.0 },
        ],
        "connections": [],
    });
    let snapshot = snapshot_of(&payload);
    assert_eq!((snapshot.nodes[0].x, snapshot.nodes[0].y), (5.0, 6.0));
    assert_eq!((snapshot.nodes[1].x, snapshot.nodes[1].y), (30.0, 40.0));
    assert_eq!((snapshot.nodes[2].x, snapshot.nodes[2].y), (7.0, 8.0));

    let (host, _) = load_with_report(&payload);
    assert_eq!(host.node("a").unwrap().position, (5.0, 6.0));

    // Serialization always emits the flat coordinates.
    let serialized = serde_json::to_value(&snapshot.nodes[0]).unwrap();
    assert_eq!(serialized["x"], 5.0);
    assert!(serialized.get("position").is_none());
}

#[test]
fn stored_target_port_is_kept_when_it_exists() {
    let payload = json!({
        "nodes": [
            { "id": "a", "type": "start", "x": 0.0, "y": 0.0 },
            { "id": "b", "type": "end", "x": 1.0, "y": 0.0 },
            { "id": "c", "type": "end", "x": 2.0, "y": 0.0 },
        ],
        "connections": [
            { "id": "e1", "source": "a", "target": "b",
              "sourcePort": "out-0", "targetPort": "in" },
            // A stale target port falls back to the default in port.
            { "id": "e2", "source": "a", "target": "c",
              "sourcePort": "out-0", "targetPort": "socket-3" },
        ],
    });
    let (host, _) = load_with_report(&payload);

    let edges = host.outgoing_edges("a");
    let e1 = edges.iter().find(|e| e.id == "e1").unwrap();
    let e2 = edges.iter().find(|e| e.id == "e2").unwrap();
    assert_eq!(e1.target_port.as_deref(), Some("in"));
    assert_eq!(e2.target_port.as_deref(), Some("in"));
}

#[test]
fn frozen_rebuild_runs_a_single_layout_pass() {
    let (host, _) = load_with_report(&simple_flow_payload());
    assert_eq!(host.layout_passes(), 1);
}

#[test]
fn collect_round_trips_a_loaded_snapshot() {
    let host = load_into_host(&split_flow_payload());
    let outcome = collect(&host);
    assert!(outcome.issues.is_empty());

    let snapshot = outcome.snapshot;
    assert_eq!(snapshot.nodes.len(), 4);
    assert_eq!(snapshot.connections.len(), 3);

    let split = snapshot.nodes.iter().find(|n| n.id == "n-split").unwrap();
    assert_eq!(split.node_type, "ab-test");
    assert_eq!(split.is_configured, Some(true));
    assert_eq!(split.branches.len(), 2);
    assert_eq!(split.branches[0].id, "b1");

    let e2 = snapshot
        .connections
        .iter()
        .find(|c| c.id.as_deref() == Some("e2"))
        .unwrap();
    assert_eq!(e2.source_port.as_deref(), Some("out-0"));
    assert_eq!(e2.branch_id.as_deref(), Some("b1"));

    // Loading the collected snapshot again reproduces the same graph.
    let mut second = MemoryHost::new();
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);
    let report = loader
        .load(&mut second, &snapshot)
        .expect("collected snapshot must load");
    assert!(report.issues.is_empty());
    assert_eq!(second.node_count(), 4);
    assert_eq!(second.edge_count(), 3);
}

#[test]
fn collect_substitutes_placeholder_for_unreadable_node() {
    let mut host = MemoryHost::new();
    host.add_node(NodeSpec {
        id: "broken".to_string(),
        position: (12.0, 34.0),
        data: json!("not an object"),
        ports: configure_ports("sms", &[]),
    })
    .unwrap();

    let outcome = collect(&host);
    assert_eq!(outcome.issues, vec![RecoverableIssue::NodeDataUnreadable {
        node_id: "broken".to_string()
    }]);

    let record = &outcome.snapshot.nodes[0];
    assert_eq!(record.node_type, "node");
    assert_eq!(record.is_configured, Some(false));
    // Position survives even when the data payload does not.
    assert_eq!((record.x, record.y), (12.0, 34.0));
}

#[test]
fn collect_resolves_type_from_label_as_fallback() {
    let mut host = MemoryHost::new();
    host.add_node(NodeSpec {
        id: "n".to_string(),
        position: (0.0, 0.0),
        data: json!({ "label": "A/B Test" }),
        ports: configure_ports("ab-test", &[]),
    })
    .unwrap();

    let outcome = collect(&host);
    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.snapshot.nodes[0].node_type, "ab-test");
}
