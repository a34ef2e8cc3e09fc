//! Reference discovery: Apify actor client, loosely-typed field mapping,
//! URL normalization, and the multi-query fetcher.

pub mod client;
pub mod error;
pub mod fetch;
pub mod mapping;
pub mod parse;
pub mod types;
pub mod url;

pub use client::ApifyClient;
pub use error::FetchError;
pub use fetch::{
    dedup_by_normalized_url, FetchOptions, ReferenceFetcher, ReferenceSource, DEFAULT_QUERIES,
    YOUTUBE_ACTOR_ID,
};
pub use mapping::{map_item, map_items, MappingOptions};
pub use parse::{coerce_count, parse_duration, parse_publish_date};
pub use types::{ActorRun, RunStatus};
pub use url::normalize_url;
