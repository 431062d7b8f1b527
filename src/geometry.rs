//! Node geometry constants shared by port layout and alignment validation.
//!
//! Both `ports::layout` and `ports::validator` derive vertical positions from
//! these values, but each side does its own arithmetic. The validator exists
//! to catch drift between the two, so it must not call into the layout code.

/// Height of the node title bar, in node-local pixels.
pub const HEADER_HEIGHT: f64 = 28.0;

/// Padding between the header and the first content row.
pub const CONTENT_PADDING: f64 = 8.0;

/// Fixed height of one content row.
pub const ROW_HEIGHT: f64 = 20.0;

/// Text baseline shift applied when rows are rendered.
pub const BASELINE_ADJUST: f64 = 2.0;

/// Padding below the last content row.
pub const EXTRA_PADDING: f64 = 8.0;

/// A node never renders shorter than this.
pub const MIN_NODE_HEIGHT: f64 = 60.0;

/// Rendered node width.
pub const NODE_WIDTH: f64 = 180.0;

/// Out ports bleed slightly past the right edge so edges attach cleanly.
pub const PORT_BLEED: f64 = 2.0;

/// The "in" port sits at this displacement from the node's vertical center.
pub const IN_PORT_DY: f64 = 0.0;

/// Rendered height of a node with `line_count` content rows.
///
/// A node with no content still reserves one row of space.
pub fn node_height(line_count: usize) -> f64 {
    let rows = line_count.max(1) as f64;
    (HEADER_HEIGHT + CONTENT_PADDING + rows * ROW_HEIGHT + EXTRA_PADDING).max(MIN_NODE_HEIGHT)
}

/// Vertical center of content row `index`, measured from the node's top edge.
pub fn row_center(index: usize) -> f64 {
    HEADER_HEIGHT + CONTENT_PADDING + index as f64 * ROW_HEIGHT + (ROW_HEIGHT / 2.0).floor()
}

/// Expected out-port offset from the node's vertical center for row `index`
/// of a node with `total_lines` rendered rows.
pub fn expected_offset_from_center(index: usize, total_lines: usize) -> f64 {
    row_center(index) + BASELINE_ADJUST - node_height(total_lines) / 2.0
}

/// Top of the band occupied by rendered content rows, including the baseline
/// shift applied by the renderer.
pub fn content_band_start() -> f64 {
    HEADER_HEIGHT + CONTENT_PADDING + BASELINE_ADJUST
}

/// Bottom of the content band for a node with `line_count` rows.
pub fn content_band_end(line_count: usize) -> f64 {
    content_band_start() + line_count.max(1) as f64 * ROW_HEIGHT
}
