//! Port configuration: layout computation and alignment validation.

pub mod layout;
pub mod validator;

pub use layout::{
    LayoutOptions, PortConfig, PortGroup, PortItem, PortPlacement, build_port_config,
};
pub use validator::{AlignmentReport, DEFAULT_TOLERANCE, validate_alignment};

use crate::catalog;

/// Build the full port configuration for a node of `node_type` from its
/// rendered content lines, attaching an alignment report as a diagnostic.
///
/// Start nodes get exactly one out port and no in port; end nodes get an in
/// port and no out ports; every other type gets an in port plus one out
/// port per content row.
pub fn configure_ports(node_type: &str, lines: &[String]) -> PortConfig {
    if catalog::is_end(node_type) {
        let mut options = LayoutOptions::for_lines(lines.len());
        options.include_out = false;
        return build_port_config(0, &options);
    }

    let line_count = if catalog::is_start(node_type) {
        1
    } else {
        lines.len()
    };
    let mut options = LayoutOptions::for_lines(line_count);
    options.include_in = !catalog::is_start(node_type);

    let mut config = build_port_config(line_count, &options);
    config.alignment = Some(validate_alignment(&config, line_count));
    config
}
