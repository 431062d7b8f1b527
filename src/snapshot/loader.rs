//! Rebuilds a live graph from a snapshot.

use super::model::{CanvasSnapshot, EdgeRecord, NodeRecord, RecoverableIssue};
use crate::catalog;
use crate::content::ContentRenderer;
use crate::error::LoadError;
use crate::host::{EdgeSpec, GraphHost, NodeSpec};
use crate::ports;
use ahash::{AHashMap, AHashSet};
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Counts and repairs from one load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub nodes_added: usize,
    pub edges_added: usize,
    pub issues: Vec<RecoverableIssue>,
}

/// Reconstructs live cells from snapshot records.
///
/// Node sizes and port sets are derived from config through the injected
/// content renderer; they are never read from the snapshot.
pub struct SnapshotLoader<'a> {
    renderer: &'a dyn ContentRenderer,
}

impl<'a> SnapshotLoader<'a> {
    pub fn new(renderer: &'a dyn ContentRenderer) -> Self {
        Self { renderer }
    }

    /// Editor entry point: raw payload in, boolean out.
    ///
    /// A malformed payload returns `false` before anything is mutated. Any
    /// failure mid-rebuild also returns `false`; the host is unfrozen
    /// either way.
    pub fn load_value(&self, host: &mut dyn GraphHost, payload: &Value) -> bool {
        let snapshot = match CanvasSnapshot::from_value(payload) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "rejecting malformed canvas payload");
                return false;
            }
        };
        self.load(host, &snapshot).is_ok()
    }

    /// Rebuild `host` from `snapshot`.
    ///
    /// The host is frozen for the whole clear-and-rebuild window so no
    /// intermediate layout passes run, and unfrozen again even when the
    /// rebuild fails partway.
    pub fn load(
        &self,
        host: &mut dyn GraphHost,
        snapshot: &CanvasSnapshot,
    ) -> Result<LoadReport, LoadError> {
        host.freeze();
        let result = self.load_inner(host, snapshot);
        host.unfreeze();
        result
    }

    fn load_inner(
        &self,
        host: &mut dyn GraphHost,
        snapshot: &CanvasSnapshot,
    ) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        host.clear_cells();

        for node in dedup_nodes(&snapshot.nodes, &mut report.issues) {
            host.add_node(self.build_node_spec(node))
                .map_err(|e| LoadError::NodeConstruction {
                    node_id: node.id.clone(),
                    message: e.to_string(),
                })?;
            report.nodes_added += 1;
        }

        // Tracks which out ports each node has already handed to an edge,
        // so stale port ids get rewired onto ports that are still free.
        let mut used_ports: AHashMap<String, AHashSet<String>> = AHashMap::new();

        for edge in dedup_edges(&snapshot.connections, &mut report.issues) {
            if host.node(&edge.source).is_none() || host.node(&edge.target).is_none() {
                report.issues.push(RecoverableIssue::DanglingEdgeSkipped {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
                continue;
            }
            self.wire_edge(host, edge, &mut used_ports, &mut report)?;
        }

        Ok(report)
    }

    /// Build the node-construction request for one record.
    ///
    /// `isConfigured` precedence: explicit flag inside the config payload,
    /// then the record's own flag, then `true` for start nodes, then
    /// `false`.
    fn build_node_spec(&self, node: &NodeRecord) -> NodeSpec {
        let is_configured = node
            .config
            .get("isConfigured")
            .and_then(Value::as_bool)
            .or(node.is_configured)
            .unwrap_or_else(|| catalog::is_start(&node.node_type));

        let lines = self.renderer.display_lines(&node.node_type, &node.config);
        let ports = ports::configure_ports(&node.node_type, &lines);

        NodeSpec {
            id: node.id.clone(),
            position: (node.x, node.y),
            data: json!({
                "type": node.node_type,
                "label": node.label,
                "config": node.config,
                "isConfigured": is_configured,
                "branches": node.branches,
            }),
            ports,
        }
    }

    fn wire_edge(
        &self,
        host: &mut dyn GraphHost,
        edge: &EdgeRecord,
        used_ports: &mut AHashMap<String, AHashSet<String>>,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        // Both endpoints were resolved by the caller; a vanished cell here
        // is treated like a dangling edge.
        let Some(source) = host.node(&edge.source) else {
            return Ok(());
        };
        let out_ids: Vec<String> = source
            .ports
            .out_port_ids()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let source_type = source.node_type().unwrap_or("node").to_owned();
        let source_config = source
            .data
            .get("config")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        // Keep the stored target port when the live target still has it;
        // otherwise fall back to the default "in" port.
        let target_port = {
            let target = host.node(&edge.target);
            match edge
                .target_port
                .as_ref()
                .filter(|p| target.is_some_and(|n| n.ports.has_port(p)))
            {
                Some(port) => Some(port.clone()),
                None => target
                    .filter(|n| n.ports.has_port("in"))
                    .map(|_| "in".to_owned()),
            }
        };

        let used = used_ports.entry(edge.source.clone()).or_default();
        let source_port = reconcile_source_port(edge, &out_ids, used, &mut report.issues);
        if let Some(port) = &source_port {
            used.insert(port.clone());
        }

        // Branch backfill applies to every splitting type: after a port
        // rewire the stored branch id is the only tie to the business
        // route, and a missing one is recovered from the port's row index.
        let mut branch_id = edge.branch_id.clone();
        if branch_id.is_none() && catalog::is_splitting(&source_type) {
            if let Some(repaired) = branch_for_port(&source_config, source_port.as_deref()) {
                debug!(edge = ?edge.id, branch = %repaired, "backfilled branch id from port index");
                report.issues.push(RecoverableIssue::BranchIdRepaired {
                    edge_id: edge.dedup_key(),
                    branch_id: repaired.clone(),
                });
                branch_id = Some(repaired);
            }
        }

        host.add_edge(EdgeSpec {
            id: edge.id.clone(),
            source_cell: edge.source.clone(),
            target_cell: edge.target.clone(),
            source_port,
            target_port,
            data: json!({
                "branchId": branch_id,
                "label": edge.label,
            }),
        })
        .map_err(|e| LoadError::EdgeConstruction {
            source_id: edge.source.clone(),
            target: edge.target.clone(),
            message: e.to_string(),
        })?;
        report.edges_added += 1;
        Ok(())
    }
}

/// First occurrence wins; duplicates are recorded and dropped.
fn dedup_nodes<'s>(
    nodes: &'s [NodeRecord],
    issues: &mut Vec<RecoverableIssue>,
) -> Vec<&'s NodeRecord> {
    let mut seen = AHashSet::new();
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes {
        if seen.insert(node.id.as_str()) {
            kept.push(node);
        } else {
            issues.push(RecoverableIssue::DuplicateNodeDropped {
                node_id: node.id.clone(),
            });
        }
    }
    kept
}

fn dedup_edges<'s>(
    edges: &'s [EdgeRecord],
    issues: &mut Vec<RecoverableIssue>,
) -> Vec<&'s EdgeRecord> {
    let mut seen = AHashSet::new();
    let mut kept = Vec::with_capacity(edges.len());
    for edge in edges {
        let key = edge.dedup_key();
        if seen.insert(key.clone()) {
            kept.push(edge);
        } else {
            issues.push(RecoverableIssue::DuplicateEdgeDropped { key });
        }
    }
    kept
}

/// Keep the stored source port when it still exists; otherwise rewire onto
/// the first unused out port, falling back to the first out port when all
/// are taken.
fn reconcile_source_port(
    edge: &EdgeRecord,
    out_ids: &[String],
    used: &AHashSet<String>,
    issues: &mut Vec<RecoverableIssue>,
) -> Option<String> {
    if let Some(port) = &edge.source_port {
        if out_ids.iter().any(|id| id == port) {
            return Some(port.clone());
        }
    }
    let replacement = out_ids
        .iter()
        .find(|id| !used.contains(*id))
        .or_else(|| out_ids.first())?;
    debug!(
        node = %edge.source,
        from = ?edge.source_port,
        to = %replacement,
        "reassigned stale source port"
    );
    issues.push(RecoverableIssue::PortReassigned {
        node_id: edge.source.clone(),
        from: edge.source_port.clone(),
        to: replacement.clone(),
    });
    Some(replacement.clone())
}

/// Map an `out-<N>` port back to the node's `config.branches[N].id`.
fn branch_for_port(
    config: &serde_json::Map<String, Value>,
    source_port: Option<&str>,
) -> Option<String> {
    let row: usize = source_port?.strip_prefix("out-")?.parse().ok()?;
    config
        .get("branches")?
        .as_array()?
        .get(row)?
        .get("id")?
        .as_str()
        .map(str::to_owned)
}
