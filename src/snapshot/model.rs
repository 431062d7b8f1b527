//! The canonical serializable snapshot of a flow.
//!
//! Field names are part of the persistence compatibility surface. Legacy
//! spellings (`sourcePortId`/`targetPortId`, `nodeType`) are normalized here
//! at the serde boundary; nothing downstream duck-types on field names.

use crate::error::SnapshotShapeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One expected route out of a splitting node, independent of which
/// physical port carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    pub id: String,
    #[serde(default, alias = "label")]
    pub name: String,
}

/// Plain-data record of one node.
///
/// Deserializes through [`RawNodeRecord`] so the legacy `position: {x, y}`
/// spelling folds into the flat coordinates; serialization always emits the
/// flat form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNodeRecord")]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub config: Map<String, Value>,
    /// Tri-state on purpose: an absent flag is weaker than an explicit
    /// `false` during load-time precedence resolution.
    #[serde(rename = "isConfigured", skip_serializing_if = "Option::is_none")]
    pub is_configured: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchSpec>,
}

/// Nested point object used by the legacy node spelling.
#[derive(Debug, Clone, Copy, Deserialize)]
struct PointSpec {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Wire shape of a node record with every accepted legacy spelling.
#[derive(Deserialize)]
struct RawNodeRecord {
    id: String,
    #[serde(rename = "type", alias = "nodeType")]
    node_type: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    /// Wins over the flat coordinates when both are present.
    #[serde(default)]
    position: Option<PointSpec>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    config: Map<String, Value>,
    #[serde(rename = "isConfigured", default)]
    is_configured: Option<bool>,
    #[serde(default)]
    branches: Vec<BranchSpec>,
}

impl From<RawNodeRecord> for NodeRecord {
    fn from(raw: RawNodeRecord) -> Self {
        let (x, y) = match raw.position {
            Some(point) => (point.x, point.y),
            None => (raw.x, raw.y),
        };
        Self {
            id: raw.id,
            node_type: raw.node_type,
            x,
            y,
            label: raw.label,
            config: raw.config,
            is_configured: raw.is_configured,
            branches: raw.branches,
        }
    }
}

impl NodeRecord {
    /// Display label for validation messages: label when present, id
    /// otherwise.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Safe placeholder substituted when a live node's data cannot be read.
    pub fn placeholder(id: String) -> Self {
        Self {
            id,
            node_type: "node".to_owned(),
            x: 0.0,
            y: 0.0,
            label: String::new(),
            config: Map::new(),
            is_configured: Some(false),
            branches: Vec::new(),
        }
    }
}

/// Plain-data record of one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(
        rename = "sourcePort",
        alias = "sourcePortId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_port: Option<String>,
    #[serde(
        rename = "targetPort",
        alias = "targetPortId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_port: Option<String>,
    #[serde(rename = "branchId", default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeRecord {
    /// Dedup key: the explicit id when present, else the composite
    /// `(source, target, sourcePort, targetPort)` identity.
    pub fn dedup_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!(
                "{}>{}#{}#{}",
                self.source,
                self.target,
                self.source_port.as_deref().unwrap_or(""),
                self.target_port.as_deref().unwrap_or("")
            ),
        }
    }
}

/// The sole unit of persistence: `{nodes, connections}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<EdgeRecord>,
}

impl CanvasSnapshot {
    /// Structural shape check plus deserialization of a raw payload.
    ///
    /// Fails fast when `nodes`/`connections` are missing or not arrays, so
    /// callers can reject malformed input before touching any live state.
    pub fn from_value(payload: &Value) -> Result<Self, SnapshotShapeError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| SnapshotShapeError::NotAnObject(json_kind(payload).to_owned()))?;
        for field in ["nodes", "connections"] {
            if !obj.get(field).is_some_and(Value::is_array) {
                return Err(SnapshotShapeError::MissingArray(field));
            }
        }
        serde_json::from_value(payload.clone())
            .map_err(|e| SnapshotShapeError::MalformedRecord(e.to_string()))
    }

    /// Outgoing-connection count per node, as recorded in the snapshot.
    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.connections
            .iter()
            .filter(|c| c.source == node_id)
            .count()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A repair or substitution applied while collecting or loading.
///
/// Execution never aborts on one bad item; instead the repair is recorded
/// here so it stays inspectable instead of only being logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverableIssue {
    /// A live node's data payload could not be read; a placeholder record
    /// was substituted.
    NodeDataUnreadable { node_id: String },
    /// A live edge's endpoints or data could not be read; the edge was
    /// recorded with defaults.
    EdgeDataUnreadable { edge_id: String },
    /// A later snapshot entry reused an existing node id; first wins.
    DuplicateNodeDropped { node_id: String },
    /// A later connection entry reused an existing dedup key; first wins.
    DuplicateEdgeDropped { key: String },
    /// A connection referenced a node that does not exist after load.
    DanglingEdgeSkipped { source: String, target: String },
    /// A stored source port no longer exists; the edge was rewired.
    PortReassigned {
        node_id: String,
        from: Option<String>,
        to: String,
    },
    /// A splitting node's edge carried no branch id; it was backfilled from
    /// the port's row index.
    BranchIdRepaired { edge_id: String, branch_id: String },
}

impl fmt::Display for RecoverableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeDataUnreadable { node_id } => {
                write!(f, "node '{node_id}': unreadable data, placeholder substituted")
            }
            Self::EdgeDataUnreadable { edge_id } => {
                write!(f, "edge '{edge_id}': unreadable data, defaults substituted")
            }
            Self::DuplicateNodeDropped { node_id } => {
                write!(f, "duplicate node '{node_id}' dropped")
            }
            Self::DuplicateEdgeDropped { key } => write!(f, "duplicate edge '{key}' dropped"),
            Self::DanglingEdgeSkipped { source, target } => {
                write!(f, "dangling edge '{source}' -> '{target}' skipped")
            }
            Self::PortReassigned { node_id, from, to } => write!(
                f,
                "node '{node_id}': port '{}' reassigned to '{to}'",
                from.as_deref().unwrap_or("<none>")
            ),
            Self::BranchIdRepaired { edge_id, branch_id } => {
                write!(f, "edge '{edge_id}': branch id repaired to '{branch_id}'")
            }
        }
    }
}
