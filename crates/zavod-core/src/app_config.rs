use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "dev"),
            Environment::Production => write!(f, "prod"),
        }
    }
}

/// Search and analysis limits that differ between environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_queries: usize,
    pub max_results_per_query: usize,
    pub llm_max_analyses_per_run: usize,
}

impl Limits {
    #[must_use]
    pub fn for_env(env: Environment) -> Self {
        match env {
            Environment::Production => Self {
                max_queries: 5,
                max_results_per_query: 10,
                llm_max_analyses_per_run: 20,
            },
            Environment::Development => Self {
                max_queries: 1,
                max_results_per_query: 2,
                llm_max_analyses_per_run: 1,
            },
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub brand_profile_path: Option<PathBuf>,

    pub apify_token: Option<String>,
    pub apify_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub blotato_api_key: Option<String>,
    pub blotato_base_url: String,
    pub blotato_dry_run: bool,

    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,

    pub max_age_days: i64,
    pub max_queries: usize,
    pub max_results_per_query: usize,
    pub llm_max_analyses_per_run: usize,
    pub llm_enabled: bool,

    /// Keep every mapped item regardless of its publish date.
    pub skip_recency_filter: bool,
    /// Substitute "now" for a missing or unparseable publish date instead of
    /// dropping the item.
    pub default_missing_publish_date: bool,
}

impl AppConfig {
    #[must_use]
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.jsonl")
    }

    #[must_use]
    pub fn runs_path(&self) -> PathBuf {
        self.data_dir.join("runs.jsonl")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("bind_addr", &self.bind_addr)
            .field("brand_profile_path", &self.brand_profile_path)
            .field("apify_token", &self.apify_token.as_ref().map(|_| "[redacted]"))
            .field("apify_base_url", &self.apify_base_url)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field(
                "blotato_api_key",
                &self.blotato_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("blotato_base_url", &self.blotato_base_url)
            .field("blotato_dry_run", &self.blotato_dry_run)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("max_age_days", &self.max_age_days)
            .field("max_queries", &self.max_queries)
            .field("max_results_per_query", &self.max_results_per_query)
            .field("llm_max_analyses_per_run", &self.llm_max_analyses_per_run)
            .field("llm_enabled", &self.llm_enabled)
            .field("skip_recency_filter", &self.skip_recency_filter)
            .field(
                "default_missing_publish_date",
                &self.default_missing_publish_date,
            )
            .finish()
    }
}
