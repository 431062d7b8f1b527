//! Independent recomputation of expected port offsets.
//!
//! This deliberately re-derives every expected value from the geometry
//! constants instead of calling into `ports::layout`, so that a regression
//! in either side shows up as a deviation here.

use crate::error::PortAlignmentError;
use crate::geometry;
use crate::ports::layout::{PortConfig, PortGroup, PortPlacement};
use serde::{Deserialize, Serialize};

/// Out-port deviations beyond this many pixels are errors.
pub const DEFAULT_TOLERANCE: f64 = 2.0;

/// The in port is expected at offset zero; deviations beyond this are
/// reported as warnings only.
pub const IN_PORT_TOLERANCE: f64 = 1.0;

/// Alignment measurement for one out port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutPortDetail {
    pub port_id: String,
    pub row: usize,
    pub expected: f64,
    pub actual: f64,
    pub deviation: f64,
    pub aligned: bool,
}

/// Alignment measurement for the in port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InPortDetail {
    pub expected: f64,
    pub actual: f64,
    pub deviation: f64,
}

/// Per-port measurements backing the report messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDetails {
    pub input_port: Option<InPortDetail>,
    pub output_ports: Vec<OutPortDetail>,
}

/// Result of checking a port configuration against rendered geometry.
///
/// `is_valid` reflects errors only; warnings never invalidate a node. This
/// report is a diagnostic attached to the port configuration, not a gate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: AlignmentDetails,
}

/// Check every port of `config` against the offset expected for its content
/// row, with the default tolerance.
///
/// Internal failures are converted into a single synthetic error entry
/// rather than propagated.
pub fn validate_alignment(config: &PortConfig, content_line_count: usize) -> AlignmentReport {
    validate_alignment_with_tolerance(config, content_line_count, DEFAULT_TOLERANCE)
}

pub fn validate_alignment_with_tolerance(
    config: &PortConfig,
    content_line_count: usize,
    tolerance: f64,
) -> AlignmentReport {
    match validate_inner(config, content_line_count, tolerance) {
        Ok(report) => report,
        Err(err) => AlignmentReport {
            is_valid: false,
            errors: vec![format!("alignment check failed: {err}")],
            warnings: Vec::new(),
            details: AlignmentDetails::default(),
        },
    }
}

fn validate_inner(
    config: &PortConfig,
    content_line_count: usize,
    tolerance: f64,
) -> Result<AlignmentReport, PortAlignmentError> {
    let mut report = AlignmentReport::default();
    let height = geometry::node_height(content_line_count);

    let out_ports: Vec<_> = config
        .items
        .iter()
        .filter(|p| p.group == PortGroup::Out)
        .collect();

    // An empty content list still yields one out port, so the expected
    // count bottoms out at 1.
    let expected_count = content_line_count.max(1);
    if out_ports.len() != expected_count {
        report.errors.push(format!(
            "out port count {} does not match content row count {}",
            out_ports.len(),
            expected_count
        ));
    }

    for port in &out_ports {
        let row = parse_row_index(&port.id)?;
        let actual = match port.placement {
            PortPlacement::Local { y, .. } => y - height / 2.0,
            PortPlacement::CenterOffset { .. } => {
                return Err(PortAlignmentError::MissingPlacement(port.id.clone()));
            }
        };
        let expected = geometry::expected_offset_from_center(row, content_line_count);
        let deviation = (actual - expected).abs();
        let aligned = deviation <= tolerance;
        if !aligned {
            report.errors.push(format!(
                "port '{}' is off by {deviation:.1}px (expected {expected:.1}, found {actual:.1})",
                port.id
            ));
        } else if deviation > 0.0 {
            report.warnings.push(format!(
                "port '{}' deviates by {deviation:.1}px, within tolerance",
                port.id
            ));
        }
        report.details.output_ports.push(OutPortDetail {
            port_id: port.id.clone(),
            row,
            expected,
            actual,
            deviation,
            aligned,
        });
    }

    if let Some(in_port) = config.in_port() {
        let actual = match in_port.placement {
            PortPlacement::CenterOffset { dy } => dy,
            PortPlacement::Local { y, .. } => y - height / 2.0,
        };
        let deviation = (actual - geometry::IN_PORT_DY).abs();
        if deviation > IN_PORT_TOLERANCE {
            report.warnings.push(format!(
                "in port deviates by {deviation:.1}px from node center"
            ));
        }
        report.details.input_port = Some(InPortDetail {
            expected: geometry::IN_PORT_DY,
            actual,
            deviation,
        });
    }

    report.is_valid = report.errors.is_empty();
    Ok(report)
}

/// Out-port ids follow the `out-<rowIndex>` pattern; the row index ties the
/// port back to the content line it represents.
fn parse_row_index(port_id: &str) -> Result<usize, PortAlignmentError> {
    port_id
        .strip_prefix("out-")
        .and_then(|idx| idx.parse().ok())
        .ok_or_else(|| PortAlignmentError::MalformedPortId(port_id.to_owned()))
}
