//! Static catalog of the node types the campaign editor knows about.

/// Node types whose outgoing edges must each map to a declared branch.
pub const SPLITTING_TYPES: [&str; 3] = ["audience-split", "event-split", "ab-test"];

/// Catalog entry for one known node type.
#[derive(Debug, Clone, Copy)]
pub struct NodeTypeInfo {
    pub type_name: &'static str,
    pub label: &'static str,
    /// Whether the out-port count follows the node's configured branches.
    pub dynamic_outputs: bool,
}

/// All node types the editor can place on the canvas.
pub const NODE_CATALOG: &[NodeTypeInfo] = &[
    NodeTypeInfo {
        type_name: "start",
        label: "Start",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "end",
        label: "End",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "sms",
        label: "SMS",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "ai-call",
        label: "AI Call",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "manual-call",
        label: "Manual Call",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "wait",
        label: "Wait",
        dynamic_outputs: false,
    },
    NodeTypeInfo {
        type_name: "audience-split",
        label: "Audience Split",
        dynamic_outputs: true,
    },
    NodeTypeInfo {
        type_name: "event-split",
        label: "Event Split",
        dynamic_outputs: true,
    },
    NodeTypeInfo {
        type_name: "ab-test",
        label: "A/B Test",
        dynamic_outputs: true,
    },
];

/// Look up a catalog entry by type name.
pub fn info(type_name: &str) -> Option<&'static NodeTypeInfo> {
    NODE_CATALOG.iter().find(|t| t.type_name == type_name)
}

/// Resolve a node type from its display label. Used as a last-resort
/// fallback when a live node's data payload carries no type field.
pub fn type_for_label(label: &str) -> Option<&'static str> {
    NODE_CATALOG
        .iter()
        .find(|t| t.label == label)
        .map(|t| t.type_name)
}

/// Whether outgoing edges of this type must map to declared branches.
pub fn is_splitting(type_name: &str) -> bool {
    SPLITTING_TYPES.contains(&type_name)
}

pub fn is_start(type_name: &str) -> bool {
    type_name == "start"
}

pub fn is_end(type_name: &str) -> bool {
    type_name == "end"
}
