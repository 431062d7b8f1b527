//! Lenient draft-time validation.
//!
//! Saving a draft accepts almost anything: an empty canvas and unconfigured
//! nodes are worth a warning, not a rejection. Only records that could not
//! be persisted meaningfully (no id, no type, broken position) are errors.

use crate::catalog;
use crate::snapshot::CanvasSnapshot;

/// Outcome of the save-time check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a snapshot before storing it as a draft.
pub fn validate_for_save(snapshot: &CanvasSnapshot) -> SaveReport {
    let mut report = SaveReport {
        is_valid: true,
        ..SaveReport::default()
    };

    if snapshot.nodes.is_empty() {
        report
            .warnings
            .push("No nodes in canvas, saved as blank draft".to_owned());
        return report;
    }

    let unconfigured = snapshot
        .nodes
        .iter()
        .filter(|n| !catalog::is_start(&n.node_type))
        .filter(|n| n.is_configured != Some(true) && n.config.is_empty())
        .count();
    if unconfigured == snapshot.nodes.len() {
        report
            .warnings
            .push("Nodes in canvas are not configured yet, saved as draft".to_owned());
    } else if unconfigured > 0 {
        report.warnings.push(format!(
            "Canvas has {} unconfigured nodes, current state saved",
            unconfigured
        ));
    }

    for (index, node) in snapshot.nodes.iter().enumerate() {
        if node.id.is_empty() {
            report.errors.push(format!("Node {} missing id", index + 1));
        }
        if node.node_type.is_empty() {
            report
                .errors
                .push(format!("Node '{}' missing type", node.display_label()));
        }
        if !node.x.is_finite() || !node.y.is_finite() {
            report
                .errors
                .push(format!("Node '{}' has an invalid position", node.display_label()));
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}
