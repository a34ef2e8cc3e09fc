use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use zavod_core::PersistedRun;

use crate::{RunRepository, StoreError};

/// Append-only run log in a JSONL file.
///
/// Appends take an exclusive advisory lock and reads a shared one, so
/// separate worker processes can share the file.
#[derive(Debug, Clone)]
pub struct JsonlRunStore {
    path: PathBuf,
}

impl JsonlRunStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed variant of [`RunRepository::load`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] on the first record that fails to
    /// reconstruct.
    pub fn load_runs(&self, limit: Option<usize>) -> Result<Vec<PersistedRun>, StoreError> {
        self.load(limit)?
            .iter()
            .map(|record| zavod_core::reconstruct_run(record).map_err(StoreError::from))
            .collect()
    }
}

impl RunRepository for JsonlRunStore {
    fn append(&self, run: &PersistedRun) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut line = serde_json::to_string(run)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.lock().map_err(|e| StoreError::io(&self.path, e))?;
        let written = file.write_all(line.as_bytes()).and_then(|()| file.flush());
        file.unlock().map_err(|e| StoreError::io(&self.path, e))?;
        written.map_err(|e| StoreError::io(&self.path, e))?;

        tracing::info!(run_id = %run.id, url = %run.reference.url, "run persisted");
        Ok(())
    }

    fn load(&self, limit: Option<usize>) -> Result<Vec<Value>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        file.lock_shared()
            .map_err(|e| StoreError::io(&self.path, e))?;

        let max = limit.unwrap_or(usize::MAX);
        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(&file).lines().enumerate() {
            if records.len() >= max {
                break;
            }
            let line = line.map_err(|e| StoreError::io(&self.path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed run record"
                ),
            }
        }
        file.unlock().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(records)
    }
}
