//! The graph host contract.
//!
//! A graph host owns the live node/edge cells behind the canvas. The editor
//! frontend provides the real host; [`memory::MemoryHost`] provides a
//! complete in-process implementation for tests, tooling and headless use.

pub mod memory;

pub use memory::MemoryHost;

use crate::error::HostError;
use crate::ports::PortConfig;
use serde_json::Value;

/// Deterministic id-generation capability.
///
/// Injected wherever cells need fresh ids so tests never depend on global
/// counters or randomness.
pub trait IdSource {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Monotonic `<prefix>-<n>` ids.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}", self.counter)
    }
}

/// A live node cell.
///
/// The `data` payload is opaque to the host: the editor stores type, label,
/// config, configuration state and branches in it, and the snapshot
/// collector reads them back out defensively.
#[derive(Debug, Clone)]
pub struct HostNode {
    pub id: String,
    pub position: (f64, f64),
    pub data: Value,
    pub ports: PortConfig,
}

impl HostNode {
    /// The node type recorded in the data payload, if any.
    pub fn node_type(&self) -> Option<&str> {
        self.data
            .get("nodeType")
            .or_else(|| self.data.get("type"))
            .and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.data.get("label").and_then(Value::as_str)
    }
}

/// A live edge cell.
#[derive(Debug, Clone)]
pub struct HostEdge {
    pub id: String,
    pub source_cell: String,
    pub target_cell: String,
    pub source_port: Option<String>,
    pub target_port: Option<String>,
    pub data: Value,
}

impl HostEdge {
    /// The branch id recorded in the edge data, if any.
    pub fn branch_id(&self) -> Option<&str> {
        self.data.get("branchId").and_then(Value::as_str)
    }
}

/// Request to create a node cell.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub id: String,
    pub position: (f64, f64),
    pub data: Value,
    pub ports: PortConfig,
}

/// Request to create an edge cell. A missing id is filled from the host's
/// id source.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub id: Option<String>,
    pub source_cell: String,
    pub target_cell: String,
    pub source_port: Option<String>,
    pub target_port: Option<String>,
    pub data: Value,
}

/// The mutable cell collection behind the canvas.
///
/// All operations are synchronous; the host performs no locking and assumes
/// a single logical caller. `freeze`/`unfreeze` delimit bulk mutation
/// windows during which the host suspends intermediate layout passes.
pub trait GraphHost {
    fn nodes(&self) -> Vec<&HostNode>;
    fn edges(&self) -> Vec<&HostEdge>;
    fn node(&self, id: &str) -> Option<&HostNode>;

    fn add_node(&mut self, spec: NodeSpec) -> Result<(), HostError>;
    fn add_edge(&mut self, spec: EdgeSpec) -> Result<(), HostError>;
    fn remove_node(&mut self, id: &str);
    fn clear_cells(&mut self);

    fn set_node_data(&mut self, id: &str, data: Value) -> Result<(), HostError>;
    fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), HostError>;

    fn freeze(&mut self);
    fn unfreeze(&mut self);

    /// Live edges whose source cell is `node_id`.
    fn outgoing_edges(&self, node_id: &str) -> Vec<&HostEdge>;
}
