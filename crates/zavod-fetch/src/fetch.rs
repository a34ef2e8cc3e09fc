//! Multi-query reference collection and single-URL lookup on top of the
//! YouTube search actor.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use zavod_core::{AppConfig, Platform, Reference};

use crate::client::ApifyClient;
use crate::error::FetchError;
use crate::mapping::{map_items, MappingOptions};
use crate::url::normalize_url;

pub const YOUTUBE_ACTOR_ID: &str = "streamers~youtube-scraper";

/// Canned search queries for the "Wildberries from scratch" niche.
pub const DEFAULT_QUERIES: [&str; 9] = [
    "бизнес на вайлдберриз с нуля",
    "как начать продавать на вайлдберриз",
    "ошибки новичков вайлдберриз",
    "как выбрать товар на вайлдберриз",
    "юнит экономика вайлдберриз",
    "как настроить рекламу на вайлдберриз",
    "оформление карточки товара вайлдберриз",
    "анализ ниши вайлдберриз",
    "бизнес под ключ вайлдберриз",
];

/// Source of references consumed by the worker and front ends.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Collect references across every configured query.
    async fn fetch_all(&self) -> Result<Vec<Reference>, FetchError>;

    /// Find the reference whose normalized URL matches `url`.
    async fn fetch_one(&self, url: &str) -> Result<Option<Reference>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub queries: Vec<String>,
    pub max_queries: usize,
    pub max_results_per_query: usize,
    pub max_age_days: i64,
    pub skip_recency_filter: bool,
    pub default_missing_publish_date: bool,
}

impl FetchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            queries: DEFAULT_QUERIES.iter().map(ToString::to_string).collect(),
            max_queries: config.max_queries,
            max_results_per_query: config.max_results_per_query,
            max_age_days: config.max_age_days,
            skip_recency_filter: config.skip_recency_filter,
            default_missing_publish_date: config.default_missing_publish_date,
        }
    }

    fn mapping(&self) -> MappingOptions {
        MappingOptions {
            default_missing_publish_date: self.default_missing_publish_date,
        }
    }
}

/// Reference fetcher backed by the Apify YouTube search actor.
pub struct ReferenceFetcher {
    client: ApifyClient,
    options: FetchOptions,
}

impl ReferenceFetcher {
    #[must_use]
    pub fn new(client: ApifyClient, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// Build a fetcher from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingToken`] without an Apify token, or
    /// another [`FetchError`] if the Apify client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let token = config
            .apify_token
            .as_deref()
            .ok_or(FetchError::MissingToken)?;
        let client = ApifyClient::with_base_url(
            token,
            config.request_timeout_secs,
            &config.apify_base_url,
        )?
        .with_polling(
            std::time::Duration::from_secs(config.poll_interval_secs),
            std::time::Duration::from_secs(config.poll_timeout_secs),
        );
        Ok(Self::new(client, FetchOptions::from_config(config)))
    }

    #[must_use]
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Run one search query end to end: start, wait, download, map, filter.
    ///
    /// # Errors
    ///
    /// Propagates any [`FetchError`] from the actor run.
    pub async fn search(&self, query: &str) -> Result<Vec<Reference>, FetchError> {
        let input = json!({
            "searchKeywords": query,
            "maxResults": self.options.max_results_per_query,
            "postsFromDate": format!("{} days ago", self.options.max_age_days),
        });
        let items = self
            .run_actor(&input, self.options.max_results_per_query)
            .await?;

        let now = Utc::now();
        let mut references = map_items(&items, Platform::Youtube, &self.options.mapping(), now);
        if !self.options.skip_recency_filter {
            references.retain(|r| r.is_recent(self.options.max_age_days, now));
        }

        tracing::info!(
            query,
            items = items.len(),
            references = references.len(),
            "search query completed"
        );
        Ok(references)
    }

    /// Look up a single URL directly through the actor's `startUrls` input.
    ///
    /// # Errors
    ///
    /// Propagates any [`FetchError`] from the actor run.
    pub async fn lookup_direct(&self, url: &str) -> Result<Option<Reference>, FetchError> {
        let input = json!({
            "startUrls": [{ "url": url }],
            "maxResults": 1,
        });
        let items = self.run_actor(&input, 1).await?;
        let target = normalize_url(url);
        let references = map_items(&items, Platform::Youtube, &self.options.mapping(), Utc::now());
        Ok(references
            .into_iter()
            .find(|r| normalize_url(&r.url) == target))
    }

    async fn run_actor(&self, input: &Value, limit: usize) -> Result<Vec<Value>, FetchError> {
        let run = self.client.start_actor(YOUTUBE_ACTOR_ID, input).await?;
        let finished = self.client.wait_for_run(&run.id).await?;
        let dataset_id = finished.default_dataset_id.ok_or_else(|| {
            FetchError::Api(format!("actor run {} has no default dataset", finished.id))
        })?;
        self.client.get_dataset_items(&dataset_id, Some(limit)).await
    }
}

#[async_trait]
impl ReferenceSource for ReferenceFetcher {
    async fn fetch_all(&self) -> Result<Vec<Reference>, FetchError> {
        let mut collected = Vec::new();
        let mut first_error = None;
        let mut failures = 0usize;
        let queries: Vec<&String> = self
            .options
            .queries
            .iter()
            .take(self.options.max_queries)
            .collect();

        for query in &queries {
            match self.search(query).await {
                Ok(refs) => collected.extend(refs),
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "search query failed; skipping");
                    failures += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        if failures > 0 && failures == queries.len() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let deduped = dedup_by_normalized_url(collected);
        tracing::info!(
            queries = queries.len(),
            failures,
            references = deduped.len(),
            "reference fetch completed"
        );
        Ok(deduped)
    }

    async fn fetch_one(&self, url: &str) -> Result<Option<Reference>, FetchError> {
        match self.lookup_direct(url).await {
            Ok(Some(reference)) => return Ok(Some(reference)),
            Ok(None) => tracing::info!(url, "direct lookup found nothing; scanning search results"),
            Err(e) => tracing::warn!(url, error = %e, "direct lookup failed; scanning search results"),
        }

        let target = normalize_url(url);
        let references = self.fetch_all().await?;
        let found = references
            .into_iter()
            .find(|r| normalize_url(&r.url) == target);
        if found.is_none() {
            tracing::info!(url, "no reference matched url in search results");
        }
        Ok(found)
    }
}

/// Keep the first reference for each normalized URL, preserving encounter order.
#[must_use]
pub fn dedup_by_normalized_url(references: Vec<Reference>) -> Vec<Reference> {
    let mut seen = HashSet::new();
    let mut deduped = references;
    deduped.retain(|r| seen.insert(normalize_url(&r.url)));
    deduped
}
