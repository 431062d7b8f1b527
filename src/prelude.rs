//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! keiro crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a stored snapshot into an in-memory host
//! let payload: serde_json::Value =
//!     serde_json::from_str(&std::fs::read_to_string("path/to/flow.json")?)?;
//!
//! let mut host = MemoryHost::new();
//! let renderer = CatalogRenderer;
//! let loader = SnapshotLoader::new(&renderer);
//! loader.load_value(&mut host, &payload);
//!
//! // Collect it back and check whether it may be published
//! let outcome = collect(&host);
//! let report = validate(&outcome.snapshot, Some(&host));
//!
//! println!("publishable: {} ({:?})", report.pass, report.messages);
//! # Ok(())
//! # }
//! ```

// Graph host seam
pub use crate::host::{GraphHost, HostEdge, HostNode, IdSource, MemoryHost, SequentialIds};

// Snapshot collection and loading
pub use crate::snapshot::{
    CanvasSnapshot, CollectOutcome, LoadReport, RecoverableIssue, SnapshotLoader, collect,
};

// Node content rendering
pub use crate::content::{CatalogRenderer, ContentRenderer};

// Port layout and alignment
pub use crate::ports::{AlignmentReport, PortConfig, configure_ports, validate_alignment};

// Publish and save validation
pub use crate::publish::{PublishReport, SaveReport, validate, validate_for_save, validate_value};

// Task persistence
pub use crate::store::{MemoryTaskStore, TaskDraft, TaskRecord, TaskStatus, TaskStore};

// Error types
pub use crate::error::{HostError, LoadError, SnapshotShapeError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
