use crate::app_config::{AppConfig, ProxyConfig};
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("SURPLUS_LOG_LEVEL", "info");
    let counties_path = PathBuf::from(or_default(
        "SURPLUS_COUNTIES_PATH",
        "./config/counties.yaml",
    ));
    let output_dir = PathBuf::from(or_default("SURPLUS_OUTPUT_DIR", "./results"));

    let auction_host = or_default("SURPLUS_AUCTION_HOST", "manatee.realforeclose.com");
    if auction_host.contains("://") || auction_host.contains('/') {
        return Err(invalid(
            "SURPLUS_AUCTION_HOST",
            format!("expected a bare hostname, got \"{auction_host}\""),
        ));
    }

    let proxy = match optional("SURPLUS_PROXY_HOST") {
        Some(host) => Some(ProxyConfig {
            host,
            port: parse_u16("SURPLUS_PROXY_PORT", "9001")?,
            username: optional("PROXY_USERNAME"),
            password: optional("PROXY_PASSWORD"),
        }),
        None => None,
    };

    let spreadsheet_url = optional("SPREADSHEET_APPS_SCRIPT_URL");
    if let Some(url) = &spreadsheet_url {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(invalid(
                "SPREADSHEET_APPS_SCRIPT_URL",
                "must be an http(s) URL".to_string(),
            ));
        }
    }

    let request_timeout_secs = parse_u64("SURPLUS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SURPLUS_USER_AGENT", DEFAULT_USER_AGENT);

    let fetch_max_attempts = parse_u32("SURPLUS_FETCH_MAX_ATTEMPTS", "3")?;
    if fetch_max_attempts == 0 {
        return Err(invalid(
            "SURPLUS_FETCH_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let fetch_retry_delay_ms = parse_u64("SURPLUS_FETCH_RETRY_DELAY_MS", "1000")?;
    let inter_request_delay_ms = parse_u64("SURPLUS_INTER_REQUEST_DELAY_MS", "250")?;

    Ok(AppConfig {
        log_level,
        counties_path,
        output_dir,
        auction_host,
        proxy,
        spreadsheet_url,
        request_timeout_secs,
        user_agent,
        fetch_max_attempts,
        fetch_retry_delay_ms,
        inter_request_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
