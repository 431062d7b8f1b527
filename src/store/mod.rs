//! Task persistence: a thin wrapper around `{metadata, snapshot, status}`.

pub mod artifact;

pub use artifact::TaskArtifact;

use crate::error::StoreError;
use crate::host::{IdSource, SequentialIds};
use crate::snapshot::CanvasSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Draft,
    Published,
}

/// Everything the caller hands over when storing a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(rename = "canvasData")]
    pub canvas: CanvasSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// A stored task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    /// Seconds since the Unix epoch at creation time.
    pub created_at: u64,
    pub metadata: Map<String, Value>,
    #[serde(rename = "canvasData")]
    pub canvas: CanvasSnapshot,
}

/// Storage backend for finished snapshots.
pub trait TaskStore {
    /// Persist a draft; a missing status defaults to [`TaskStatus::Draft`].
    fn create_task(&mut self, draft: TaskDraft) -> Result<TaskRecord, StoreError>;

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError>;
}

fn record_from_draft(id: String, draft: TaskDraft) -> TaskRecord {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    TaskRecord {
        id,
        name: draft.name,
        status: draft.status.unwrap_or(TaskStatus::Draft),
        created_at,
        metadata: draft.metadata,
        canvas: draft.canvas,
    }
}

/// In-process store, mostly for tests and headless tooling.
pub struct MemoryTaskStore {
    ids: Box<dyn IdSource>,
    tasks: Vec<TaskRecord>,
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::with_ids(Box::new(SequentialIds::new()))
    }

    pub fn with_ids(ids: Box<dyn IdSource>) -> Self {
        Self {
            ids,
            tasks: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }
}

impl TaskStore for MemoryTaskStore {
    fn create_task(&mut self, draft: TaskDraft) -> Result<TaskRecord, StoreError> {
        let record = record_from_draft(self.ids.next_id("task"), draft);
        self.tasks.push(record.clone());
        Ok(record)
    }

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(id.to_owned()))
    }
}

/// Directory-backed store writing one bincode artifact per task.
pub struct FileTaskStore {
    dir: PathBuf,
    ids: Box<dyn IdSource>,
}

impl FileTaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ids: Box::new(SequentialIds::new()),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.task"))
    }
}

impl TaskStore for FileTaskStore {
    fn create_task(&mut self, draft: TaskDraft) -> Result<TaskRecord, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        let record = record_from_draft(self.ids.next_id("task"), draft);
        TaskArtifact::new(record.clone()).save(&self.path_for(&record.id))?;
        Ok(record)
    }

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::TaskNotFound(id.to_owned()));
        }
        TaskArtifact::from_file(&path).map(|a| a.record)
    }
}
