use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.keepa.com/";
pub const DEFAULT_CATALOG_USER_AGENT: &str = "asinscope/0.1 (catalog-discovery)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("ASINSCOPE_ENV", "development"))?;
    let bind_addr = parse_var(
        "ASINSCOPE_BIND_ADDR",
        &or_default("ASINSCOPE_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("ASINSCOPE_LOG_LEVEL", "info");

    let catalog_api_key = lookup("CATALOG_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let catalog_base_url = or_default("ASINSCOPE_CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL);
    let catalog_domain = parse_var(
        "ASINSCOPE_CATALOG_DOMAIN",
        &or_default("ASINSCOPE_CATALOG_DOMAIN", "1"),
    )?;
    let catalog_batch_size: usize = parse_var(
        "ASINSCOPE_CATALOG_BATCH_SIZE",
        &or_default("ASINSCOPE_CATALOG_BATCH_SIZE", "5"),
    )?;
    if catalog_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ASINSCOPE_CATALOG_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let catalog_timeout_secs: u64 = parse_var(
        "ASINSCOPE_CATALOG_TIMEOUT_SECS",
        &or_default("ASINSCOPE_CATALOG_TIMEOUT_SECS", "10"),
    )?;
    if catalog_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ASINSCOPE_CATALOG_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let catalog_user_agent = or_default("ASINSCOPE_CATALOG_USER_AGENT", DEFAULT_CATALOG_USER_AGENT);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_api_key,
        catalog_base_url,
        catalog_domain,
        catalog_batch_size,
        catalog_timeout_secs,
        catalog_user_agent,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ASINSCOPE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
