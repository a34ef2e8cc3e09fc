//! Turning a finished run into something a human or a renderer can use:
//! a Blotato template payload, or a Markdown brief.

pub mod adapter;
pub mod client;
pub mod error;
pub mod markdown;
pub mod payload;

pub use adapter::to_blotato_payload;
pub use client::BlotatoClient;
pub use error::ExportError;
pub use markdown::run_to_markdown;
pub use payload::{CreateVideoPayload, SceneInput};
