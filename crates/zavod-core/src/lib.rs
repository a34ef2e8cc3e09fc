//! Shared domain model and configuration for the Zavod carousel pipeline.
//!
//! Every other crate in the workspace depends on these types: the fetcher
//! produces [`Reference`]s, the LLM crate turns them into [`AnalyzedContent`]
//! and [`CarouselSpec`], and the stores persist [`GenerationTask`]s and
//! [`PersistedRun`]s.

pub mod analysis;
pub mod app_config;
pub mod brand;
pub mod carousel;
pub mod config;
pub mod reference;
pub mod run;
pub mod task;

pub use analysis::{AnalyzedContent, ContentType};
pub use app_config::{AppConfig, Environment, Limits};
pub use brand::{load_brand_profile, resolve_brand_profile, BrandProfile, DEFAULT_TEMPLATE_ID};
pub use carousel::{CarouselSpec, Slide, SlideType};
pub use config::{load_app_config, load_app_config_from_env};
pub use reference::{EngagementMetrics, Platform, Reference};
pub use run::{reconstruct_analyzed_and_carousel, reconstruct_run, PersistedRun};
pub use task::{GenerationTask, TaskStatus};

use thiserror::Error;

/// Errors raised while loading configuration at process start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brand profile {path}: {source}")]
    BrandProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brand profile YAML: {0}")]
    BrandProfileParse(#[from] serde_yaml::Error),

    #[error("invalid brand profile: {0}")]
    Validation(String),
}

/// Errors raised while rebuilding typed records from stored JSON.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {context} record: {source}")]
    InvalidRecord {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing field `{0}` in stored run")]
    MissingField(&'static str),
}
