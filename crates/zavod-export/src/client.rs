use std::time::Duration;

use serde_json::{json, Value};
use zavod_core::AppConfig;

use crate::error::ExportError;
use crate::payload::CreateVideoPayload;

const DEFAULT_BASE_URL: &str = "https://backend.blotato.com";

/// Client for Blotato's template render endpoint.
///
/// In dry-run mode no request is made; the call echoes the body it would
/// have sent.
pub struct BlotatoClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    dry_run: bool,
}

impl BlotatoClient {
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64, dry_run: bool) -> Result<Self, ExportError> {
        Self::with_base_url(api_key, timeout_secs, dry_run, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        dry_run: bool,
        base_url: &str,
    ) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("zavod/0.1 (carousel-pipeline)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
            dry_run,
        })
    }

    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ExportError> {
        Self::with_base_url(
            config.blotato_api_key.as_deref(),
            config.request_timeout_secs,
            config.blotato_dry_run,
            &config.blotato_base_url,
        )
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Submit one render request.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingApiKey`] in live mode without a key,
    /// [`ExportError::Http`] on transport failures or non-2xx statuses, and
    /// [`ExportError::Deserialize`] when the response is not JSON.
    pub async fn create_video_from_template(
        &self,
        payload: &CreateVideoPayload,
    ) -> Result<Value, ExportError> {
        let body = payload.to_request_body();

        if self.dry_run {
            tracing::info!(
                template_id = %payload.template_id,
                scenes = payload.scenes.len(),
                payload = %body,
                "dry run: render request not sent"
            );
            return Ok(json!({ "dry_run": true, "payload": body }));
        }

        let api_key = self.api_key.as_deref().ok_or(ExportError::MissingApiKey)?;
        let url = format!("{}/v2/videos/from-templates", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("blotato-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text).map_err(|e| ExportError::Deserialize {
            context: "render response".to_string(),
            source: e,
        })?;

        tracing::info!(template_id = %payload.template_id, "render request accepted");
        Ok(data)
    }
}
