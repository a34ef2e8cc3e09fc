use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reference::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(format!(
                "unknown task status '{other}'; expected pending, in_progress, done, or failed"
            )),
        }
    }
}

/// A queued unit of end-to-end pipeline work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTask {
    pub id: String,
    pub source_url: String,
    pub platform: Platform,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerationTask {
    /// Creates a `pending` task with a fresh UUID v4 id.
    #[must_use]
    pub fn new(source_url: impl Into<String>, platform: Platform) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_url: source_url.into(),
            platform,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            run_id: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = TaskStatus::InProgress;
        self.error = None;
    }

    pub fn complete(&mut self, run_id: impl Into<String>) {
        self.status = TaskStatus::Done;
        self.run_id = Some(run_id.into());
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.error = Some(message.into());
    }
}
