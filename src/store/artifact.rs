//! Binary artifact wrapping a stored task.

use super::TaskRecord;
use crate::error::StoreError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Version tag for the on-disk encoding.
const ARTIFACT_VERSION: u16 = 1;

/// The unit written to disk by the file-backed task store.
///
/// Node configs are free-form JSON that bincode cannot decode on its own,
/// so the record travels as a JSON payload inside a versioned bincode
/// envelope.
#[derive(Debug)]
pub struct TaskArtifact {
    pub version: u16,
    pub record: TaskRecord,
}

impl TaskArtifact {
    pub fn new(record: TaskRecord) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            record,
        }
    }

    /// Serialize to the bincode wire format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let payload =
            serde_json::to_vec(&self.record).map_err(|e| StoreError::Encode(e.to_string()))?;
        encode_to_vec((self.version, payload), standard())
            .map_err(|e| StoreError::Encode(e.to_string()))
    }

    /// Deserialize from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let ((version, payload), _): ((u16, Vec<u8>), usize) =
            decode_from_slice(bytes, standard()).map_err(|e| StoreError::Decode(e.to_string()))?;
        let record =
            serde_json::from_slice(&payload).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self { version, record })
    }

    /// Save the artifact to a file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Load an artifact from a file.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let mut file = fs::File::open(path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_bytes(&bytes)
    }
}
