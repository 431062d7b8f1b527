use clap::Parser;
use keiro::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// A headless validator for campaign flow canvas snapshots
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the canvas snapshot JSON file
    flow_path: String,

    /// Check the looser draft-save rules instead of the publish gate
    #[arg(short, long)]
    save: bool,

    /// Load the snapshot into a host and collect it back, printing any
    /// repairs made along the way
    #[arg(short, long)]
    round_trip: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let raw = fs::read_to_string(&cli.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flow file '{}': {}",
            &cli.flow_path, e
        ))
    });
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow JSON: {}", e)));
    let load_duration = load_start.elapsed();

    // --- 2. Graph Reconstruction ---
    println!("\nLoading canvas snapshot into host...");
    let build_start = Instant::now();
    let mut host = MemoryHost::new();
    let renderer = CatalogRenderer;
    let loader = SnapshotLoader::new(&renderer);

    let snapshot = CanvasSnapshot::from_value(&payload)
        .unwrap_or_else(|e| exit_with_error(&format!("Malformed canvas data: {}", e)));
    let load_report = loader
        .load(&mut host, &snapshot)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to rebuild graph: {}", e)));
    let build_duration = build_start.elapsed();

    println!(
        "Graph rebuilt: {} nodes, {} edges",
        load_report.nodes_added, load_report.edges_added
    );
    for issue in &load_report.issues {
        println!("  repaired: {}", issue);
    }

    // --- 3. Validation ---
    let validate_start = Instant::now();
    let failed = if cli.save {
        let report = validate_for_save(&snapshot);
        print_save_report(&report);
        !report.is_valid
    } else {
        let report = validate(&snapshot, Some(&host));
        print_publish_report(&report);
        !report.pass
    };
    let validate_duration = validate_start.elapsed();

    // --- 4. Optional Round Trip ---
    if cli.round_trip {
        println!("\nCollecting host back into a snapshot...");
        let outcome = collect(&host);
        println!(
            "Collected {} nodes, {} edges",
            outcome.snapshot.nodes.len(),
            outcome.snapshot.connections.len()
        );
        for issue in &outcome.issues {
            println!("  issue: {}", issue);
        }
    }

    let total_duration = total_start.elapsed();
    println!("\n--- Performance Summary ---");
    println!("File Loading:         {:?}", load_duration);
    println!("Graph Reconstruction: {:?}", build_duration);
    println!("Validation:           {:?}", validate_duration);
    println!("---------------------------");
    println!("Total Execution:      {:?}", total_duration);
    println!();

    if failed {
        std::process::exit(2);
    }
}

fn print_publish_report(report: &PublishReport) {
    if report.pass {
        println!("\nPublish check passed, the flow is ready to go live.");
        return;
    }
    println!("\nPublish check failed:");
    for message in &report.messages {
        println!("  -> {}", message);
    }
}

fn print_save_report(report: &SaveReport) {
    if report.is_valid {
        println!("\nSave check passed.");
    } else {
        println!("\nSave check failed:");
        for error in &report.errors {
            println!("  -> error: {}", error);
        }
    }
    for warning in &report.warnings {
        println!("  -> warning: {}", warning);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
