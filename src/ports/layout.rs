//! Pure computation of port configurations from a content band.

use crate::geometry;
use serde::{Deserialize, Serialize};

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortGroup {
    In,
    Out,
}

impl PortGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            PortGroup::In => "in",
            PortGroup::Out => "out",
        }
    }
}

/// Geometric placement of a port.
///
/// "In" ports are placed by a vertical displacement from the node's center;
/// "out" ports carry an absolute position in the node's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortPlacement {
    CenterOffset { dy: f64 },
    Local { x: f64, y: f64 },
}

/// A single configured port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortItem {
    pub id: String,
    pub group: PortGroup,
    pub placement: PortPlacement,
}

/// The `{groups, items}` port configuration of one node.
///
/// `alignment` is a diagnostic attached by the node-construction step; it
/// never blocks node creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortConfig {
    pub groups: Vec<PortGroup>,
    pub items: Vec<PortItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<super::AlignmentReport>,
}

impl PortConfig {
    /// Ids of all out ports, in row order.
    pub fn out_port_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|p| p.group == PortGroup::Out)
            .map(|p| p.id.as_str())
            .collect()
    }

    pub fn has_port(&self, id: &str) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    pub fn in_port(&self) -> Option<&PortItem> {
        self.items.iter().find(|p| p.group == PortGroup::In)
    }
}

/// Inputs to [`build_port_config`].
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub include_in: bool,
    pub include_out: bool,
    /// Explicit out-port ids; synthesized as `out-0..out-(n-1)` when absent.
    pub out_ids: Option<Vec<String>>,
    /// Top of the vertical band occupied by content rows, node-local pixels.
    pub content_start: f64,
    /// Bottom of the content band.
    pub content_end: f64,
    /// Spread ports over equal slices of the band instead of fixed rows.
    pub even_distribution: bool,
    pub node_height: f64,
    pub node_width: f64,
}

impl LayoutOptions {
    /// Options for a standard node whose content renderer produced
    /// `line_count` rows.
    pub fn for_lines(line_count: usize) -> Self {
        Self {
            include_in: true,
            include_out: true,
            out_ids: None,
            content_start: geometry::content_band_start(),
            content_end: geometry::content_band_end(line_count),
            even_distribution: false,
            node_height: geometry::node_height(line_count),
            node_width: geometry::NODE_WIDTH,
        }
    }
}

/// Compute a port configuration for `out_count` out ports.
///
/// `out_count` below 1 is clamped to 1: a node with no per-row content still
/// gets exactly one out port.
pub fn build_port_config(out_count: usize, options: &LayoutOptions) -> PortConfig {
    let mut groups = Vec::new();
    let mut items = Vec::new();

    if options.include_in {
        groups.push(PortGroup::In);
        items.push(PortItem {
            id: "in".to_owned(),
            group: PortGroup::In,
            placement: PortPlacement::CenterOffset {
                dy: geometry::IN_PORT_DY,
            },
        });
    }

    if options.include_out {
        groups.push(PortGroup::Out);
        let count = out_count.max(1);
        let ids: Vec<String> = match &options.out_ids {
            Some(ids) => ids.clone(),
            None => (0..count).map(|i| format!("out-{i}")).collect(),
        };
        let band = options.content_end - options.content_start;
        for (i, id) in ids.iter().enumerate() {
            let y = if options.even_distribution && band > 0.0 {
                options.content_start + (i as f64 + 0.5) * (band / ids.len() as f64)
            } else {
                options.content_start
                    + i as f64 * geometry::ROW_HEIGHT
                    + (geometry::ROW_HEIGHT / 2.0).floor()
            };
            items.push(PortItem {
                id: id.clone(),
                group: PortGroup::Out,
                placement: PortPlacement::Local {
                    x: options.node_width + geometry::PORT_BLEED,
                    y: y.clamp(options.content_start, options.content_end),
                },
            });
        }
    }

    PortConfig {
        groups,
        items,
        alignment: None,
    }
}
