use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
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
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let openai_api_key = require("OPENAI_API_KEY")?;
    let openai_model = or_default("PREMORTEM_OPENAI_MODEL", "gpt-4o");
    let openai_base_url = lookup("PREMORTEM_OPENAI_BASE_URL").ok();
    let reddit_base_url = lookup("PREMORTEM_REDDIT_BASE_URL").ok();
    let reddit_user_agent = or_default(
        "PREMORTEM_REDDIT_USER_AGENT",
        "premortem/0.1 (market research tool)",
    );
    let request_timeout_secs = parse_u64("PREMORTEM_REQUEST_TIMEOUT_SECS", "15")?;
    let max_concurrent_requests = parse_usize("PREMORTEM_MAX_CONCURRENT_REQUESTS", "5")?;
    let log_level = or_default("PREMORTEM_LOG_LEVEL", "info");
    let max_iterations = parse_u32("PREMORTEM_MAX_ITERATIONS", "3")?;
    let initial_queries = parse_usize("PREMORTEM_INITIAL_QUERIES", "6")?;
    let refinement_queries = parse_usize("PREMORTEM_REFINEMENT_QUERIES", "4")?;
    let min_signals_per_type = parse_usize("PREMORTEM_MIN_SIGNALS_PER_TYPE", "2")?;

    Ok(AppConfig {
        openai_api_key,
        openai_model,
        openai_base_url,
        reddit_base_url,
        reddit_user_agent,
        request_timeout_secs,
        max_concurrent_requests,
        log_level,
        max_iterations,
        initial_queries,
        refinement_queries,
        min_signals_per_type,
    })
}
