use thiserror::Error;
use zavod_core::ConfigError;
use zavod_fetch::FetchError;
use zavod_llm::LlmError;
use zavod_store::StoreError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("reference fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("LLM stage failed: {0}")]
    Llm(#[from] LlmError),

    #[error("no reference found for URL: {0}")]
    ReferenceNotFound(String),
}
