//! # Keiro - Campaign Flow Canvas Data Layer
//!
//! **Keiro** is the headless data layer behind a node-based campaign flow
//! editor. It owns everything about a flow except the pixels: snapshot
//! collection and loading, publish validation, port layout and alignment
//! checking, and task persistence. A rendering frontend plugs in through two
//! small traits, [`host::GraphHost`] for the live canvas and
//! [`content::ContentRenderer`] for node body text.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Hand a raw snapshot payload (typically JSON from a stored
//!     task) to a [`snapshot::SnapshotLoader`]. It rebuilds the graph inside
//!     a [`host::GraphHost`], repairing what it can and reporting what it
//!     repaired as [`snapshot::RecoverableIssue`] entries.
//! 2.  **Edit**: The frontend mutates the host. Keiro computes port layouts
//!     with [`ports::configure_ports`] whenever a node's content changes.
//! 3.  **Validate**: Before publishing, run [`publish::validate`] to get a
//!     best-effort list of everything wrong with the flow, or
//!     [`publish::validate_for_save`] for the looser draft-save rules.
//! 4.  **Persist**: Collect the host back into a [`snapshot::CanvasSnapshot`]
//!     with [`snapshot::collect`] and hand it to a [`store::TaskStore`].
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//! use serde_json::json;
//!
//! // A minimal complete flow as it would arrive from a stored task.
//! let payload = json!({
//!     "nodes": [
//!         { "id": "n1", "type": "start", "x": 40.0, "y": 40.0 },
//!         { "id": "n2", "type": "sms", "x": 320.0, "y": 40.0,
//!           "isConfigured": true,
//!           "config": { "smsTemplate": "Welcome aboard" } },
//!         { "id": "n3", "type": "end", "x": 600.0, "y": 40.0 },
//!     ],
//!     "connections": [
//!         { "source": "n1", "target": "n2", "sourcePort": "out-0" },
//!         { "source": "n2", "target": "n3", "sourcePort": "out-0" },
//!     ],
//! });
//!
//! // Rebuild the graph inside an in-memory host.
//! let mut host = MemoryHost::new();
//! let renderer = CatalogRenderer;
//! let loader = SnapshotLoader::new(&renderer);
//! assert!(loader.load_value(&mut host, &payload));
//! assert_eq!(host.nodes().len(), 3);
//!
//! // Collect it back and gate publishing on the validator.
//! let outcome = keiro::snapshot::collect(&host);
//! let report = keiro::publish::validate(&outcome.snapshot, Some(&host));
//! assert!(report.pass, "unexpected findings: {:?}", report.messages);
//! ```

pub mod catalog;
pub mod content;
pub mod error;
pub mod geometry;
pub mod host;
pub mod ports;
pub mod prelude;
pub mod publish;
pub mod snapshot;
pub mod store;
