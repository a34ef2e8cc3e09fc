//! HTTP client for the Apify API v2.
//!
//! Wraps `reqwest` with token handling, the `{"data": ...}` envelope, and a
//! polling loop that waits for an asynchronous actor run to finish.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::types::{ActorRun, Envelope, RunStatus};

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Client for the Apify REST API.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: Url,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ApifyClient {
    /// Creates a new client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidBaseUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("zavod/0.1 (reference-fetch)")
            .build()?;

        // A single trailing slash makes `Url::join` append to the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
            poll_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(600),
        })
    }

    /// Overrides the run polling cadence and overall wait budget.
    #[must_use]
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// Starts an actor run with the given input and returns the run as first
    /// reported.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure or non-2xx HTTP status.
    /// - [`FetchError::Deserialize`] if the response is not a run envelope.
    pub async fn start_actor(&self, actor_id: &str, input: &Value) -> Result<ActorRun, FetchError> {
        let url = self.build_url(&format!("acts/{actor_id}/runs"), &[])?;
        let response = self
            .client
            .post(url)
            .json(input)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let envelope: Envelope<ActorRun> =
            parse_body(&body, &format!("start_actor(actor={actor_id})"))?;

        tracing::debug!(actor_id, run_id = %envelope.data.id, "actor run started");
        Ok(envelope.data)
    }

    /// Fetches the current state of an actor run.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure or non-2xx HTTP status.
    /// - [`FetchError::Deserialize`] if the response is not a run envelope.
    pub async fn get_run(&self, run_id: &str) -> Result<ActorRun, FetchError> {
        let url = self.build_url(&format!("actor-runs/{run_id}"), &[])?;
        let body = self.get_text(url).await?;
        let envelope: Envelope<ActorRun> = parse_body(&body, &format!("get_run(id={run_id})"))?;
        Ok(envelope.data)
    }

    /// Polls a run until it succeeds, fails, or the polling timeout elapses.
    ///
    /// # Errors
    ///
    /// - [`FetchError::RunFailed`] if the run ends `FAILED`, `ABORTED`, or `TIMED-OUT`.
    /// - [`FetchError::Timeout`] if the run is still going when the budget runs out.
    /// - Any error from [`ApifyClient::get_run`].
    pub async fn wait_for_run(&self, run_id: &str) -> Result<ActorRun, FetchError> {
        let started = Instant::now();
        loop {
            let run = self.get_run(run_id).await?;
            if run.status == RunStatus::Succeeded {
                tracing::debug!(
                    run_id,
                    elapsed_secs = started.elapsed().as_secs(),
                    "actor run succeeded"
                );
                return Ok(run);
            }
            if run.status.is_failure() {
                return Err(FetchError::RunFailed {
                    run_id: run_id.to_string(),
                    status: run.status.to_string(),
                });
            }

            let elapsed = started.elapsed();
            if elapsed >= self.poll_timeout {
                return Err(FetchError::Timeout {
                    run_id: run_id.to_string(),
                    waited_secs: elapsed.as_secs(),
                });
            }

            tracing::debug!(run_id, status = %run.status, "actor run still in progress");
            let remaining = self.poll_timeout.saturating_sub(elapsed);
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }

    /// Fetches the items of a dataset, optionally capped at `limit`.
    ///
    /// A body that is valid JSON but not an array yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure or non-2xx HTTP status.
    /// - [`FetchError::Deserialize`] if the body is not valid JSON.
    pub async fn get_dataset_items(
        &self,
        dataset_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, FetchError> {
        let limit_str = limit.map(|n| n.to_string());
        let mut extra: Vec<(&str, &str)> = Vec::new();
        if let Some(ref l) = limit_str {
            extra.push(("limit", l));
        }

        let url = self.build_url(&format!("datasets/{dataset_id}/items"), &extra)?;
        let body = self.get_text(url).await?;
        let value: Value = parse_body(&body, &format!("get_dataset_items(id={dataset_id})"))?;

        Ok(match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    /// Joins `path` onto the base URL and appends the token plus any extra
    /// query parameters.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("token", &self.token);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
