//! Apify API v2 response types.
//!
//! Every object endpoint wraps its payload in `{"data": ...}`; [`Envelope`]
//! captures that pattern generically. Dataset items are returned as a bare
//! JSON array and are left untyped.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Lifecycle states reported for an actor run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(rename = "ABORTING")]
    Aborting,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal states that will never turn into `SUCCEEDED`.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of an actor run object the fetcher relies on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}
