//! File-backed persistence for generation tasks and completed runs.
//!
//! Both stores are plain UTF-8 JSON-per-line files. Callers depend on the
//! [`TaskRepository`] and [`RunRepository`] traits so the JSONL backends can
//! be swapped for a real datastore.

pub mod runs;
pub mod tasks;

use std::path::{Path, PathBuf};

use thiserror::Error;
use zavod_core::{CoreError, GenerationTask, PersistedRun, TaskStatus};

pub use runs::JsonlRunStore;
pub use tasks::JsonlTaskQueue;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Queue of [`GenerationTask`]s in insertion order.
pub trait TaskRepository: Send + Sync {
    /// Append a new task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read or written.
    fn add(&self, task: &GenerationTask) -> Result<(), StoreError>;

    /// All tasks in insertion order, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn list(&self, status: Option<TaskStatus>) -> Result<Vec<GenerationTask>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn get(&self, id: &str) -> Result<Option<GenerationTask>, StoreError>;

    /// Replace the stored task with the same id, or append it when absent.
    ///
    /// `updated_at` is refreshed before writing; the stored version is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read or written.
    fn update(&self, task: GenerationTask) -> Result<GenerationTask, StoreError>;

    /// First `pending` task in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn fetch_next_pending(&self) -> Result<Option<GenerationTask>, StoreError> {
        Ok(self.list(Some(TaskStatus::Pending))?.into_iter().next())
    }
}

/// Append-only log of [`PersistedRun`]s.
pub trait RunRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be serialized or written.
    fn append(&self, run: &PersistedRun) -> Result<(), StoreError>;

    /// Up to `limit` stored records (all when `None`) in file order, untyped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn load(&self, limit: Option<usize>) -> Result<Vec<serde_json::Value>, StoreError>;

    /// Typed lookup by run id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] when the matching record is malformed.
    fn find(&self, run_id: &str) -> Result<Option<PersistedRun>, StoreError> {
        self.load(None)?
            .iter()
            .find(|record| record.get("id").and_then(serde_json::Value::as_str) == Some(run_id))
            .map(zavod_core::reconstruct_run)
            .transpose()
            .map_err(StoreError::from)
    }

    /// The most recently appended run.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] when the last record is malformed.
    fn latest(&self) -> Result<Option<PersistedRun>, StoreError> {
        self.load(None)?
            .last()
            .map(zavod_core::reconstruct_run)
            .transpose()
            .map_err(StoreError::from)
    }
}
