use thiserror::Error;

/// Errors returned by the Apify client and the reference fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered but the answer cannot be used.
    #[error("Apify API error: {0}")]
    Api(String),

    /// The actor run reached a terminal state other than `SUCCEEDED`.
    #[error("actor run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    /// The actor run did not finish within the polling timeout.
    #[error("timed out after {waited_secs}s waiting for actor run {run_id}")]
    Timeout { run_id: String, waited_secs: u64 },

    /// No Apify token is configured.
    #[error("APIFY_TOKEN is not set")]
    MissingToken,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
