//! Snapshot persistence: the canonical data model, extraction from a live
//! graph, and reconstruction back into one.

pub mod collector;
pub mod loader;
pub mod model;

pub use collector::{CollectOutcome, collect};
pub use loader::{LoadReport, SnapshotLoader};
pub use model::{BranchSpec, CanvasSnapshot, EdgeRecord, NodeRecord, RecoverableIssue};
