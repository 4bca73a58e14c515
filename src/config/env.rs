//! Model configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::model::{ModelConfig, DEFAULT_BASE_URL};

/// API credential (required).
pub const ENV_API_KEY: &str = "API_KEY";
/// Model identifier (required).
pub const ENV_MODEL: &str = "LLM_MODEL";
pub const ENV_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_MAX_ATTEMPTS: &str = "LLM_MAX_ATTEMPTS";
/// Delay between attempts, in seconds. Fractions are allowed.
pub const ENV_RETRY_DELAY: &str = "LLM_RETRY_DELAY";
pub const ENV_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
pub const ENV_TEMPERATURE: &str = "LLM_TEMPERATURE";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    MissingVar(&'static str),
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Load the model configuration from the process environment.
///
/// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
pub fn load_model_config() -> Result<ModelConfig, ConfigError> {
    load_model_config_with(|key| env::var(key).ok())
}

/// Load the model configuration from an arbitrary variable lookup.
pub fn load_model_config_with<F>(lookup: F) -> Result<ModelConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
    let model_name = get(ENV_MODEL).ok_or(ConfigError::MissingVar(ENV_MODEL))?;

    let mut config = ModelConfig::default()
        .with_base_url(get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
        .with_api_key(api_key)
        .with_model_name(model_name);

    if let Some(value) = get(ENV_MAX_ATTEMPTS) {
        let max_attempts: u32 = parse(ENV_MAX_ATTEMPTS, &value)?;
        if max_attempts == 0 {
            return Err(invalid(ENV_MAX_ATTEMPTS, &value, "must be at least 1"));
        }
        config = config.with_max_attempts(max_attempts);
    }

    if let Some(value) = get(ENV_RETRY_DELAY) {
        config = config.with_retry_delay(parse_delay(ENV_RETRY_DELAY, &value)?);
    }

    if let Some(value) = get(ENV_MAX_TOKENS) {
        config = config.with_max_tokens(parse(ENV_MAX_TOKENS, &value)?);
    }

    if let Some(value) = get(ENV_TEMPERATURE) {
        config = config.with_temperature(parse(ENV_TEMPERATURE, &value)?);
    }

    Ok(config)
}

/// Parse a delay in (possibly fractional) seconds. Negative values are rejected.
pub fn parse_delay(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = parse(name, value)?;
    Duration::try_from_secs_f64(secs).map_err(|e| invalid(name, value, &e.to_string()))
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(name, value, &e.to_string()))
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
