//! In-process graph host.

use super::{EdgeSpec, GraphHost, HostEdge, HostNode, IdSource, NodeSpec, SequentialIds};
use crate::error::HostError;
use ahash::AHashMap;
use serde_json::Value;

/// A complete in-memory implementation of the graph host contract.
///
/// Keeps cells in insertion order. Layout passes are modeled as a counter so
/// tests can assert that a frozen bulk rebuild triggers exactly one pass.
pub struct MemoryHost {
    nodes: Vec<HostNode>,
    edges: Vec<HostEdge>,
    index: AHashMap<String, usize>,
    ids: Box<dyn IdSource>,
    frozen: bool,
    layout_passes: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_ids(Box::new(SequentialIds::new()))
    }

    /// Build a host with an injected id source, for deterministic tests.
    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: AHashMap::new(),
            ids,
            frozen: false,
            layout_passes: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// How many layout passes the host has run so far.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    fn relayout(&mut self) {
        if !self.frozen {
            self.layout_passes += 1;
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}

impl GraphHost for MemoryHost {
    fn nodes(&self) -> Vec<&HostNode> {
        self.nodes.iter().collect()
    }

    fn edges(&self) -> Vec<&HostEdge> {
        self.edges.iter().collect()
    }

    fn node(&self, id: &str) -> Option<&HostNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn add_node(&mut self, spec: NodeSpec) -> Result<(), HostError> {
        if self.index.contains_key(&spec.id) {
            return Err(HostError::DuplicateCell(spec.id));
        }
        self.index.insert(spec.id.clone(), self.nodes.len());
        self.nodes.push(HostNode {
            id: spec.id,
            position: spec.position,
            data: spec.data,
            ports: spec.ports,
        });
        self.relayout();
        Ok(())
    }

    fn add_edge(&mut self, spec: EdgeSpec) -> Result<(), HostError> {
        let source = self
            .node(&spec.source_cell)
            .ok_or_else(|| HostError::UnknownCell(spec.source_cell.clone()))?;
        if let Some(port) = &spec.source_port {
            if !source.ports.has_port(port) {
                return Err(HostError::UnknownPort {
                    node_id: spec.source_cell.clone(),
                    port_id: port.clone(),
                });
            }
        }
        if self.node(&spec.target_cell).is_none() {
            return Err(HostError::UnknownCell(spec.target_cell.clone()));
        }
        let id = spec
            .id
            .unwrap_or_else(|| self.ids.next_id("edge"));
        self.edges.push(HostEdge {
            id,
            source_cell: spec.source_cell,
            target_cell: spec.target_cell,
            source_port: spec.source_port,
            target_port: spec.target_port,
            data: spec.data,
        });
        self.relayout();
        Ok(())
    }

    fn remove_node(&mut self, id: &str) {
        // Cascade: edges touching the node go with it.
        self.edges
            .retain(|e| e.source_cell != id && e.target_cell != id);
        self.nodes.retain(|n| n.id != id);
        self.reindex();
        self.relayout();
    }

    fn clear_cells(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.relayout();
    }

    fn set_node_data(&mut self, id: &str, data: Value) -> Result<(), HostError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| HostError::UnknownCell(id.to_owned()))?;
        self.nodes[i].data = data;
        self.relayout();
        Ok(())
    }

    fn set_node_position(&mut self, id: &str, x: f64, y: f64) -> Result<(), HostError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| HostError::UnknownCell(id.to_owned()))?;
        self.nodes[i].position = (x, y);
        self.relayout();
        Ok(())
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn unfreeze(&mut self) {
        if self.frozen {
            self.frozen = false;
            self.layout_passes += 1;
        }
    }

    fn outgoing_edges(&self, node_id: &str) -> Vec<&HostEdge> {
        self.edges
            .iter()
            .filter(|e| e.source_cell == node_id)
            .collect()
    }
}
