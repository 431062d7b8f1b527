//! Node-content rendering seam.
//!
//! The business rules for node display text live outside this crate. The
//! engine only needs the ordered list of rendered lines, because that list
//! drives how many out ports a node gets and where they sit.

use crate::catalog;
use serde_json::{Map, Value};

/// Produces the ordered display lines for a node's content area.
///
/// Implementations must be pure and deterministic, and must never fail:
/// when nothing better is available they degrade to a one-element fallback
/// label array.
pub trait ContentRenderer {
    fn display_lines(&self, node_type: &str, config: &Map<String, Value>) -> Vec<String>;
}

/// Default renderer backed by the node catalog.
///
/// Splitting nodes render one line per configured branch; other types render
/// a short summary line derived from their config. This is a stand-in for
/// the editor's real text rules, which are injected behind [`ContentRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogRenderer;

impl ContentRenderer for CatalogRenderer {
    fn display_lines(&self, node_type: &str, config: &Map<String, Value>) -> Vec<String> {
        let lines = if catalog::is_splitting(node_type) {
            branch_lines(config)
        } else {
            summary_lines(node_type, config)
        };
        if lines.is_empty() {
            vec![fallback_label(node_type)]
        } else {
            lines
        }
    }
}

fn branch_lines(config: &Map<String, Value>) -> Vec<String> {
    let Some(branches) = config.get("branches").and_then(Value::as_array) else {
        return Vec::new();
    };
    branches
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            branch
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Branch {}", i + 1))
        })
        .collect()
}

fn summary_lines(node_type: &str, config: &Map<String, Value>) -> Vec<String> {
    let summary = match node_type {
        "sms" => config.get("smsTemplate").and_then(Value::as_str),
        "ai-call" | "manual-call" => config.get("script").and_then(Value::as_str),
        "wait" => config.get("duration").and_then(Value::as_str),
        _ => None,
    };
    summary.map(|s| vec![s.to_owned()]).unwrap_or_default()
}

fn fallback_label(node_type: &str) -> String {
    catalog::info(node_type)
        .map(|t| t.label.to_owned())
        .unwrap_or_else(|| node_type.to_owned())
}
