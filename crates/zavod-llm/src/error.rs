use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The completion envelope did not have the expected shape.
    #[error("unexpected completion response: {0}")]
    UnexpectedResponse(String),

    /// The model's message content was not a JSON object.
    #[error("model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("OPENAI_API_KEY is required when the LLM is enabled")]
    MissingApiKey,
}
