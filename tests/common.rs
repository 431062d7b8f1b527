//! Common test utilities for building canvas snapshots and hosts.
use keiro::prelude::*;
use serde_json::{Value, json};

/// A well-formed `start -> sms -> end` flow as a raw payload.
///
/// The sms node is explicitly configured, so the flow passes every publish
/// check once loaded.
#[allow(dead_code)]
pub fn simple_flow_payload() -> Value {
    json!({
        "nodes": [
            { "id": "n-start", "type": "start", "x": 40.0, "y": 40.0, "label": "Start" },
            { "id": "n-sms", "type": "sms", "x": 320.0, "y": 40.0, "label": "Welcome SMS",
              "isConfigured": true,
              "config": { "smsTemplate": "Welcome aboard" } },
            { "id": "n-end", "type": "end", "x": 600.0, "y": 40.0, "label": "End" },
        ],
        "connections": [
            { "id": "e1", "source": "n-start", "target": "n-sms", "sourcePort": "out-0" },
            { "id": "e2", "source": "n-sms", "target": "n-end", "sourcePort": "out-0" },
        ],
    })
}

/// A flow with a configured `ab-test` node carrying two branches, both wired.
#[allow(dead_code)]
pub fn split_flow_payload() -> Value {
    json!({
        "nodes": [
            { "id": "n-start", "type": "start", "x": 40.0, "y": 40.0, "label": "Start" },
            { "id": "n-split", "type": "ab-test", "x": 320.0, "y": 40.0, "label": "Experiment",
              "isConfigured": true,
              "config": { "branches": [
                  { "id": "b1", "name": "Variant A" },
                  { "id": "b2", "name": "Variant B" },
              ] } },
            { "id": "n-a", "type": "end", "x": 600.0, "y": 0.0, "label": "End A" },
            { "id": "n-b", "type": "end", "x": 600.0, "y": 120.0, "label": "End B" },
        ],
        "connections": [
            { "id": "e1", "source": "n-start", "target": "n-split", "sourcePort": "out-0" },
            { "id": "e2", "source": "n-split", "target": "n-a",
              "sourcePort": "out-0", "branchId": "b1" },
            { "id": "e3", "source": "n-split", "target": "n-b",
              "sourcePort": "out-1", "branchId": "b2" },
        ],
    })
}

/// Load a raw payload into a fresh in-memory host.
#[allow(dead_code)]
pub fn load_into_host(payload: &Value) -> MemoryHost {
    let mut host = MemoryHost::new();
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);
    assert!(loader.load_value(&mut host, payload), "fixture must load");
    host
}

/// Load a raw payload and return the host along with the load report.
#[allow(dead_code)]
pub fn load_with_report(payload: &Value) -> (MemoryHost, LoadReport) {
    let snapshot =
        CanvasSnapshot::from_value(payload).expect("fixture payload must pass the shape check");
    let mut host = MemoryHost::new();
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);
    let report = loader
        .load(&mut host, &snapshot)
        .expect("fixture snapshot must load");
    (host, report)
}

/// Parse a raw payload into a snapshot, panicking on shape errors.
#[allow(dead_code)]
pub fn snapshot_of(payload: &Value) -> CanvasSnapshot {
    CanvasSnapshot::from_value(payload).expect("fixture payload must pass the shape check")
}
