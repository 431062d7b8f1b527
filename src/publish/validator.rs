//! The publish-time gate.

use super::cycle;
use crate::catalog;
use crate::error::CheckError;
use crate::host::{GraphHost, HostNode};
use crate::snapshot::{BranchSpec, CanvasSnapshot, NodeRecord};
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::Value;
use tracing::warn;

/// Publish validation outcome: a report, not a short-circuit pipeline.
///
/// Every check runs regardless of earlier findings; `pass` holds exactly
/// when no check produced a message. Callers render all messages together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub pass: bool,
    pub messages: Vec<String>,
}

impl PublishReport {
    fn from_messages(messages: Vec<String>) -> Self {
        Self {
            pass: messages.is_empty(),
            messages,
        }
    }
}

/// Validate a raw canvas payload.
///
/// A malformed shape (missing or non-array `nodes`/`connections`) returns
/// immediately with a single message.
pub fn validate_value(payload: &Value, host: Option<&dyn GraphHost>) -> PublishReport {
    match CanvasSnapshot::from_value(payload) {
        Ok(snapshot) => validate(&snapshot, host),
        Err(err) => PublishReport::from_messages(vec![format!("Canvas data is malformed: {err}")]),
    }
}

/// Run all structural publish checks over `snapshot`.
///
/// Checks that need live port/edge wiring consult `host` and are skipped
/// when it is absent. A failure inside any single sub-check is logged and
/// swallowed; that check simply contributes no findings.
pub fn validate(snapshot: &CanvasSnapshot, host: Option<&dyn GraphHost>) -> PublishReport {
    let mut messages = Vec::new();

    if snapshot.nodes.is_empty() {
        messages.push("Canvas is empty, add at least one node".to_owned());
    }

    let start_count = snapshot
        .nodes
        .iter()
        .filter(|n| catalog::is_start(&n.node_type))
        .count();
    if start_count == 0 {
        messages.push("Flow must contain a start node".to_owned());
    } else if start_count > 1 {
        messages.push("Flow can only contain one start node".to_owned());
    }

    if let Some(list) = unconfigured_nodes(snapshot) {
        messages.push(format!("Nodes are not fully configured: {list}"));
    }

    if let Some(list) = dangling_outputs(snapshot) {
        messages.push(format!("Nodes have no outgoing connection: {list}"));
    }

    if let Some(path) = cycle::find_cycle(snapshot) {
        messages.push(format!("Flow contains a cycle: {}", render_cycle(snapshot, &path)));
    }

    if let Some(host) = host {
        if let Some(list) = run_check("port wiring", unwired_ports(host)) {
            messages.push(format!("Output ports are not connected: {list}"));
        }
        if let Some(list) = run_check("branch completeness", unwired_branches(host)) {
            messages.push(format!("Branches are not wired: {list}"));
        }
    }

    PublishReport::from_messages(messages)
}

/// Best-effort wrapper: a failing sub-check yields no findings.
fn run_check(name: &str, outcome: Result<Option<String>, CheckError>) -> Option<String> {
    match outcome {
        Ok(findings) => findings,
        Err(err) => {
            warn!(check = name, %err, "publish sub-check failed, skipping");
            None
        }
    }
}

/// A node qualifies as unconfigured when its config is empty or its
/// configured flag is anything but an explicit `true`. Start and end nodes
/// are exempt.
fn unconfigured_nodes(snapshot: &CanvasSnapshot) -> Option<String> {
    let offenders = snapshot
        .nodes
        .iter()
        .filter(|n| !catalog::is_start(&n.node_type) && !catalog::is_end(&n.node_type))
        .filter(|n| n.config.is_empty() || n.is_configured != Some(true))
        .map(NodeRecord::display_label)
        .unique()
        .join(", ");
    (!offenders.is_empty()).then_some(offenders)
}

fn dangling_outputs(snapshot: &CanvasSnapshot) -> Option<String> {
    let offenders = snapshot
        .nodes
        .iter()
        .filter(|n| !catalog::is_end(&n.node_type))
        .filter(|n| snapshot.outgoing_count(&n.id) == 0)
        .map(NodeRecord::display_label)
        .unique()
        .join(", ");
    (!offenders.is_empty()).then_some(offenders)
}

fn render_cycle(snapshot: &CanvasSnapshot, path: &[String]) -> String {
    path.iter()
        .map(|id| {
            let label = snapshot
                .nodes
                .iter()
                .find(|n| &n.id == id)
                .map(NodeRecord::display_label)
                .unwrap_or(id);
            format!("{label}({id})")
        })
        .join(" -> ")
}

/// Every out port of a non-end node must source at least one live edge
/// whose endpoints both resolve.
fn unwired_ports(host: &dyn GraphHost) -> Result<Option<String>, CheckError> {
    let mut offenders = Vec::new();
    for node in host.nodes() {
        let node_type = node.node_type().unwrap_or("node");
        if catalog::is_end(node_type) {
            continue;
        }
        let out_ids = node.ports.out_port_ids();
        if out_ids.is_empty() {
            continue;
        }
        let wired: AHashSet<&str> = host
            .outgoing_edges(&node.id)
            .into_iter()
            .filter(|e| host.node(&e.source_cell).is_some() && host.node(&e.target_cell).is_some())
            .filter_map(|e| e.source_port.as_deref())
            .collect();
        for port in out_ids {
            if !wired.contains(port) {
                offenders.push(format!("{}#{port}", display_label(node)));
            }
        }
    }
    Ok((!offenders.is_empty()).then(|| offenders.iter().join(", ")))
}

/// Every declared branch of a splitting node must be carried by at least
/// one live outgoing edge tagged with its id.
fn unwired_branches(host: &dyn GraphHost) -> Result<Option<String>, CheckError> {
    let mut offenders = Vec::new();
    for node in host.nodes() {
        let node_type = node.node_type().unwrap_or("node");
        if !catalog::is_splitting(node_type) {
            continue;
        }
        let branches = declared_branches(node)?;
        if branches.is_empty() {
            continue;
        }
        let carried: AHashSet<&str> = host
            .outgoing_edges(&node.id)
            .into_iter()
            .filter_map(|e| e.branch_id())
            .collect();
        for branch in &branches {
            if !carried.contains(branch.id.as_str()) {
                let branch_label = if branch.name.is_empty() {
                    &branch.id
                } else {
                    &branch.name
                };
                offenders.push(format!("{}:{branch_label}", display_label(node)));
            }
        }
    }
    Ok((!offenders.is_empty()).then(|| offenders.iter().join(", ")))
}

fn declared_branches(node: &HostNode) -> Result<Vec<BranchSpec>, CheckError> {
    let Some(raw) = node
        .data
        .get("config")
        .and_then(|c| c.get("branches"))
        .or_else(|| node.data.get("branches"))
    else {
        return Ok(Vec::new());
    };
    serde_json::from_value(raw.clone()).map_err(|_| CheckError::BadBranchList {
        node_id: node.id.clone(),
    })
}

fn display_label(node: &HostNode) -> String {
    match node.label() {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => node.id.clone(),
    }
}
