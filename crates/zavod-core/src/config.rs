use crate::app_config::{AppConfig, Environment, Limits};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        optional(var).map_or(Ok(default), |raw| {
            raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
        })
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        optional(var).map_or(Ok(default), |raw| {
            raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
        })
    };

    let parse_i64 = |var: &str, default: i64| -> Result<i64, ConfigError> {
        optional(var).map_or(Ok(default), |raw| {
            raw.parse::<i64>().map_err(|e| invalid(var, e.to_string()))
        })
    };

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        optional(var).map_or(Ok(default), |raw| {
            parse_bool(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got '{raw}'")))
        })
    };

    let apify_token = optional("APIFY_TOKEN").or_else(|| optional("APIFY_API_TOKEN"));

    let env = parse_environment(&or_default("APP_MODE", "dev"));
    let limits = Limits::for_env(env);
    let is_development = env == Environment::Development;

    let bind_addr = or_default("ZAVOD_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ZAVOD_BIND_ADDR", e.to_string()))?;

    Ok(AppConfig {
        env,
        log_level: or_default("ZAVOD_LOG_LEVEL", "info"),
        data_dir: PathBuf::from(or_default("ZAVOD_DATA_DIR", "./data")),
        bind_addr,
        brand_profile_path: optional("ZAVOD_BRAND_PROFILE_PATH").map(PathBuf::from),
        apify_token,
        apify_base_url: or_default("ZAVOD_APIFY_BASE_URL", "https://api.apify.com/v2"),
        openai_api_key: optional("OPENAI_API_KEY"),
        openai_base_url: or_default("ZAVOD_OPENAI_BASE_URL", "https://api.openai.com/v1"),
        openai_model: or_default("ZAVOD_OPENAI_MODEL", "gpt-4o-mini"),
        blotato_api_key: optional("BLOTATO_API_KEY"),
        blotato_base_url: or_default("ZAVOD_BLOTATO_BASE_URL", "https://backend.blotato.com"),
        blotato_dry_run: parse_flag("ZAVOD_BLOTATO_DRY_RUN", true)?,
        request_timeout_secs: parse_u64("ZAVOD_REQUEST_TIMEOUT_SECS", 60)?,
        poll_interval_secs: parse_u64("ZAVOD_POLL_INTERVAL_SECS", 10)?,
        poll_timeout_secs: parse_u64("ZAVOD_POLL_TIMEOUT_SECS", 600)?,
        max_age_days: parse_i64("ZAVOD_MAX_AGE_DAYS", 90)?,
        max_queries: parse_usize("ZAVOD_MAX_QUERIES", limits.max_queries)?,
        max_results_per_query: parse_usize(
            "ZAVOD_MAX_RESULTS_PER_QUERY",
            limits.max_results_per_query,
        )?,
        llm_max_analyses_per_run: parse_usize(
            "ZAVOD_LLM_MAX_ANALYSES_PER_RUN",
            limits.llm_max_analyses_per_run,
        )?,
        llm_enabled: parse_flag("ZAVOD_LLM_ENABLED", true)?,
        skip_recency_filter: parse_flag("ZAVOD_SKIP_RECENCY_FILTER", is_development)?,
        default_missing_publish_date: parse_flag(
            "ZAVOD_DEFAULT_MISSING_PUBLISH_DATE",
            is_development,
        )?,
    })
}

/// Parse `APP_MODE` into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim().to_lowercase().as_str() {
        "prod" | "production" => Environment::Production,
        _ => Environment::Development,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
