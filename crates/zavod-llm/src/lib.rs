//! LLM stages of the pipeline: reference analysis and carousel generation
//! over a JSON-constrained completion backend.

pub mod analyzer;
pub mod client;
pub mod error;
pub mod generator;

pub use analyzer::{analyze, build_analysis_prompt, dummy_analysis, parse_analysis};
pub use client::{extract_json_block, parse_json_object, CompletionClient, OpenAiClient};
pub use error::LlmError;
pub use generator::{build_carousel_prompt, dummy_carousel, generate, parse_carousel};

use serde_json::Value;

/// Trimmed string content, `None` for non-strings and blank strings.
pub(crate) fn trimmed_str(value: &Value) -> Option<&str> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Read a 0..=1 score from a number or numeric string; anything else is 0.
pub(crate) fn score(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|f| f.is_finite())
        .map_or(0.0, |f| f.clamp(0.0, 1.0))
}
