//! Persistence of the last successful result between runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::relay::TranscriptResult;

/// Key the last result is stored under
pub const STORE_KEY: &str = "youtube-transcript";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to access stored transcript: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored transcript is corrupt: {0}")]
    Corrupt(String),
}

/// Save/load/clear capability for the last result
pub trait ResultStore: Send + Sync {
    fn save(&self, result: &TranscriptResult) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing is stored
    fn load(&self) -> Result<Option<TranscriptResult>, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

fn decode(raw: &str) -> Result<TranscriptResult, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn encode(result: &TranscriptResult) -> Result<String, StoreError> {
    serde_json::to_string(result).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// One JSON file on disk
#[derive(Debug, Clone)]
pub struct FileResultStore {
    path: PathBuf,
}

impl FileResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for FileResultStore {
    fn save(&self, result: &TranscriptResult) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(&self.path, encode(result)?)?;
        tracing::debug!("Saved transcript to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<TranscriptResult>, StoreError> {
        match fs_err::read_to_string(&self.path) {
            Ok(raw) => decode(&raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs_err::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, holding the raw serialized value
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    raw: Mutex<Option<String>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an arbitrary raw value, e.g. to simulate corruption
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|raw| raw.clone())
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StoreError> {
        self.raw
            .lock()
            .map_err(|_| StoreError::Corrupt("store lock poisoned".to_string()))
    }
}

impl ResultStore for MemoryResultStore {
    fn save(&self, result: &TranscriptResult) -> Result<(), StoreError> {
        *self.slot()? = Some(encode(result)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<TranscriptResult>, StoreError> {
        self.slot()?.as_deref().map(decode).transpose()
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot()? = None;
        Ok(())
    }
}
