//! Walks a live graph host into a plain-data snapshot.

use super::model::{BranchSpec, CanvasSnapshot, EdgeRecord, NodeRecord, RecoverableIssue};
use crate::catalog;
use crate::host::{GraphHost, HostEdge, HostNode};
use serde_json::Value;
use tracing::warn;

/// Snapshot plus the per-item repairs applied while extracting it.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub snapshot: CanvasSnapshot,
    pub issues: Vec<RecoverableIssue>,
}

/// Extract a [`CanvasSnapshot`] from the live graph.
///
/// A failure to read any single cell never aborts collection: the cell is
/// replaced by a safe placeholder (nodes) or defaults (edges), the issue is
/// recorded, and extraction continues.
pub fn collect(host: &dyn GraphHost) -> CollectOutcome {
    let mut issues = Vec::new();

    let nodes = host
        .nodes()
        .into_iter()
        .map(|node| match extract_node(node) {
            Some(record) => record,
            None => {
                warn!(node_id = %node.id, "node data unreadable, substituting placeholder");
                issues.push(RecoverableIssue::NodeDataUnreadable {
                    node_id: node.id.clone(),
                });
                let mut placeholder = NodeRecord::placeholder(node.id.clone());
                placeholder.x = node.position.0;
                placeholder.y = node.position.1;
                placeholder
            }
        })
        .collect();

    let connections = host
        .edges()
        .into_iter()
        .map(|edge| {
            if !(edge.data.is_null() || edge.data.is_object()) {
                warn!(edge_id = %edge.id, "edge data unreadable, substituting defaults");
                issues.push(RecoverableIssue::EdgeDataUnreadable {
                    edge_id: edge.id.clone(),
                });
            }
            extract_edge(edge)
        })
        .collect();

    CollectOutcome {
        snapshot: CanvasSnapshot { nodes, connections },
        issues,
    }
}

/// Read one live node into a record.
///
/// Type resolution prefers an explicit `nodeType`, then `type`, then a
/// catalog lookup by display label. Returns `None` when no type can be
/// resolved at all.
fn extract_node(node: &HostNode) -> Option<NodeRecord> {
    let data = node.data.as_object()?;
    let node_type = node
        .node_type()
        .or_else(|| node.label().and_then(catalog::type_for_label))?
        .to_owned();

    let config = data
        .get("config")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let branches = config
        .get("branches")
        .map(|b| serde_json::from_value::<Vec<BranchSpec>>(b.clone()).unwrap_or_default())
        .unwrap_or_default();

    Some(NodeRecord {
        id: node.id.clone(),
        node_type,
        x: node.position.0,
        y: node.position.1,
        label: node.label().unwrap_or_default().to_owned(),
        config,
        is_configured: data.get("isConfigured").and_then(Value::as_bool),
        branches,
    })
}

fn extract_edge(edge: &HostEdge) -> EdgeRecord {
    EdgeRecord {
        id: Some(edge.id.clone()),
        source: edge.source_cell.clone(),
        target: edge.target_cell.clone(),
        source_port: edge.source_port.clone(),
        target_port: edge.target_port.clone(),
        branch_id: edge.branch_id().map(str::to_owned),
        label: edge
            .data
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}
