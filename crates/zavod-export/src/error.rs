use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("BLOTATO_API_KEY is required when dry-run is off")]
    MissingApiKey,
}
