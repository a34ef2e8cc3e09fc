use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use zavod_core::{GenerationTask, TaskStatus};

use crate::{StoreError, TaskRepository};

/// Task queue in a single JSONL file.
///
/// Every mutation loads the whole file, edits the set in memory, and writes
/// it back through a sibling temp file and a rename. There is no locking;
/// callers must serialize access.
#[derive(Debug, Clone)]
pub struct JsonlTaskQueue {
    path: PathBuf,
}

impl JsonlTaskQueue {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<Vec<GenerationTask>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut tasks = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<GenerationTask>(line) {
                Ok(task) => tasks.push(task),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed task record"
                ),
            }
        }
        Ok(tasks)
    }

    fn write_all(&self, tasks: &[GenerationTask]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut buf = String::new();
        for task in tasks {
            buf.push_str(&serde_json::to_string(task)?);
            buf.push('\n');
        }

        let tmp = self.tmp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(buf.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TaskRepository for JsonlTaskQueue {
    fn add(&self, task: &GenerationTask) -> Result<(), StoreError> {
        let mut tasks = self.load_all()?;
        tasks.push(task.clone());
        self.write_all(&tasks)?;
        tracing::debug!(task_id = %task.id, url = %task.source_url, "task added");
        Ok(())
    }

    fn list(&self, status: Option<TaskStatus>) -> Result<Vec<GenerationTask>, StoreError> {
        let mut tasks = self.load_all()?;
        if let Some(status) = status {
            tasks.retain(|t| t.status == status);
        }
        Ok(tasks)
    }

    fn get(&self, id: &str) -> Result<Option<GenerationTask>, StoreError> {
        Ok(self.load_all()?.into_iter().find(|t| t.id == id))
    }

    fn update(&self, mut task: GenerationTask) -> Result<GenerationTask, StoreError> {
        task.updated_at = Utc::now();
        let mut tasks = self.load_all()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write_all(&tasks)?;
        tracing::debug!(task_id = %task.id, status = %task.status, "task updated");
        Ok(task)
    }
}
