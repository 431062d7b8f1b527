//! Tests for port layout computation and alignment validation.
mod common;
use keiro::geometry;
use keiro::ports::layout::{LayoutOptions, PortGroup, PortPlacement, build_port_config};
use keiro::ports::validator::validate_alignment_with_tolerance;
use keiro::ports::{configure_ports, validate_alignment};

fn lines(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn single_row_node_places_port_at_row_center() {
    let config = build_port_config(1, &LayoutOptions::for_lines(1));
    let out = &config.items[1];
    assert_eq!(out.id, "out-0");
    match out.placement {
        PortPlacement::Local { x, y } => {
            assert_eq!(x, geometry::NODE_WIDTH + geometry::PORT_BLEED);
            // header 28 + padding 8 + baseline 2 + half-row 10
            assert_eq!(y, 48.0);
        }
        PortPlacement::CenterOffset { .. } => panic!("out port must carry a local placement"),
    }
}

#[test]
fn rows_are_spaced_by_row_height() {
    let config = build_port_config(3, &LayoutOptions::for_lines(3));
    let ys: Vec<f64> = config
        .items
        .iter()
        .filter(|p| p.group == PortGroup::Out)
        .map(|p| match p.placement {
            PortPlacement::Local { y, .. } => y,
            PortPlacement::CenterOffset { .. } => panic!("unexpected placement"),
        })
        .collect();
    assert_eq!(ys, vec![48.0, 68.0, 88.0]);
}

#[test]
fn zero_out_count_is_clamped_to_one() {
    let config = build_port_config(0, &LayoutOptions::for_lines(0));
    assert_eq!(config.out_port_ids(), vec!["out-0"]);
}

#[test]
fn even_distribution_splits_the_band_into_equal_slices() {
    let mut options = LayoutOptions::for_lines(2);
    options.even_distribution = true;
    let config = build_port_config(2, &options);

    let band = options.content_end - options.content_start;
    let ys: Vec<f64> = config
        .items
        .iter()
        .filter(|p| p.group == PortGroup::Out)
        .map(|p| match p.placement {
            PortPlacement::Local { y, .. } => y,
            PortPlacement::CenterOffset { .. } => panic!("unexpected placement"),
        })
        .collect();
    assert_eq!(ys[0], options.content_start + 0.5 * band / 2.0);
    assert_eq!(ys[1], options.content_start + 1.5 * band / 2.0);
}

#[test]
fn explicit_out_ids_are_used_verbatim() {
    let mut options = LayoutOptions::for_lines(2);
    options.out_ids = Some(vec!["out-0".to_string(), "out-1".to_string()]);
    let config = build_port_config(2, &options);
    assert_eq!(config.out_port_ids(), vec!["out-0", "out-1"]);
}

#[test]
fn layout_output_validates_clean() {
    for line_count in [1usize, 2, 3, 5, 8] {
        let config = build_port_config(line_count, &LayoutOptions::for_lines(line_count));
        let report = validate_alignment(&config, line_count);
        assert!(
            report.is_valid,
            "layout for {line_count} rows should validate: {:?}",
            report.errors
        );
        assert!(
            report.warnings.is_empty(),
            "layout for {line_count} rows should produce no warnings: {:?}",
            report.warnings
        );
        assert_eq!(report.details.output_ports.len(), line_count);
        for detail in &report.details.output_ports {
            assert_eq!(detail.deviation, 0.0);
            assert!(detail.aligned);
        }
    }
}

#[test]
fn small_deviation_is_a_warning_not_an_error() {
    let mut config = build_port_config(1, &LayoutOptions::for_lines(1));
    if let PortPlacement::Local { y, .. } = &mut config.items[1].placement {
        *y += 1.5;
    }
    let report = validate_alignment(&config, 1);
    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("within tolerance"));
}

#[test]
fn deviation_beyond_tolerance_is_an_error() {
    let mut config = build_port_config(1, &LayoutOptions::for_lines(1));
    if let PortPlacement::Local { y, .. } = &mut config.items[1].placement {
        *y += 5.0;
    }
    let report = validate_alignment(&config, 1);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("off by 5.0px"));
    assert!(!report.details.output_ports[0].aligned);
}

#[test]
fn custom_tolerance_widens_the_error_threshold() {
    let mut config = build_port_config(1, &LayoutOptions::for_lines(1));
    if let PortPlacement::Local { y, .. } = &mut config.items[1].placement {
        *y += 5.0;
    }
    let report = validate_alignment_with_tolerance(&config, 1, 10.0);
    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn count_mismatch_is_reported() {
    let config = build_port_config(2, &LayoutOptions::for_lines(2));
    let report = validate_alignment(&config, 3);
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("out port count 2 does not match content row count 3"))
    );
}

#[test]
fn empty_content_expects_exactly_one_port() {
    // Zero lines still renders one row, so one port is the correct count.
    let config = build_port_config(0, &LayoutOptions::for_lines(0));
    let report = validate_alignment(&config, 0);
    assert!(report.is_valid, "{:?}", report.errors);
}

#[test]
fn in_port_off_center_is_warning_only() {
    let mut config = build_port_config(1, &LayoutOptions::for_lines(1));
    config.items[0].placement = PortPlacement::CenterOffset { dy: 3.0 };
    let report = validate_alignment(&config, 1);
    assert!(report.is_valid);
    assert!(report.warnings.iter().any(|w| w.contains("in port")));
    let detail = report.details.input_port.as_ref().unwrap();
    assert_eq!(detail.deviation, 3.0);
}

#[test]
fn malformed_port_id_degrades_to_synthetic_error() {
    let mut options = LayoutOptions::for_lines(1);
    options.out_ids = Some(vec!["exit".to_string()]);
    let config = build_port_config(1, &options);
    let report = validate_alignment(&config, 1);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("alignment check failed"));
    assert!(report.details.output_ports.is_empty());
}

#[test]
fn configure_ports_start_has_single_out_and_no_in() {
    let config = configure_ports("start", &[]);
    assert_eq!(config.out_port_ids(), vec!["out-0"]);
    assert!(config.in_port().is_none());
    assert!(config.alignment.as_ref().unwrap().is_valid);
}

#[test]
fn configure_ports_end_has_in_only() {
    let config = configure_ports("end", &[]);
    assert!(config.out_port_ids().is_empty());
    assert!(config.in_port().is_some());
}

#[test]
fn configure_ports_one_out_port_per_content_line() {
    let config = configure_ports("ab-test", &lines(&["Variant A", "Variant B", "Variant C"]));
    assert_eq!(config.out_port_ids(), vec!["out-0", "out-1", "out-2"]);
    assert!(config.in_port().is_some());
    assert!(config.alignment.as_ref().unwrap().is_valid);
}

#[test]
fn node_height_grows_with_content() {
    assert_eq!(geometry::node_height(0), 64.0);
    assert_eq!(geometry::node_height(1), 64.0);
    assert_eq!(geometry::node_height(3), 104.0);
}
