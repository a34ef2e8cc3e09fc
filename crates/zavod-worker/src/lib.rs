//! Queue worker and batch pipeline wiring.

pub mod error;
pub mod worker;

use std::path::Path;

use zavod_core::{AppConfig, GenerationTask};
use zavod_fetch::ReferenceFetcher;
use zavod_llm::OpenAiClient;
use zavod_store::{JsonlRunStore, JsonlTaskQueue};

pub use error::WorkerError;
pub use worker::Worker;

/// Worker over the JSONL stores and the real HTTP backends.
pub type DefaultWorker = Worker<JsonlTaskQueue, JsonlRunStore, ReferenceFetcher, OpenAiClient>;

/// Build a [`DefaultWorker`] with stores under `data_dir`.
///
/// The LLM client is only constructed when `config.llm_enabled` is set.
///
/// # Errors
///
/// Returns [`WorkerError::Fetch`] or [`WorkerError::Llm`] when a client
/// cannot be built, including a missing OpenAI key with the LLM enabled.
pub fn default_worker(config: &AppConfig, data_dir: &Path) -> Result<DefaultWorker, WorkerError> {
    let llm = if config.llm_enabled {
        Some(OpenAiClient::from_config(config)?)
    } else {
        None
    };
    Ok(Worker::new(
        JsonlTaskQueue::new(data_dir.join("tasks.jsonl")),
        JsonlRunStore::new(data_dir.join("runs.jsonl")),
        ReferenceFetcher::from_config(config)?,
        llm,
    ))
}

/// Load configuration from the environment and process one pending task
/// from `root/data/tasks.jsonl`.
///
/// # Errors
///
/// Returns [`WorkerError`] on configuration errors or a failed task.
pub async fn process_one_pending(root: &Path) -> Result<Option<GenerationTask>, WorkerError> {
    let config = zavod_core::load_app_config()?;
    let worker = default_worker(&config, &root.join("data"))?;
    worker.process_one_pending().await
}
