use crate::app_config::{AppConfig, Environment, UpstreamConnection};
use crate::ConfigError;

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
/// Every variable is optional. A missing upstream URL or token leaves
/// `connection` as `None`, which the service layer treats as "not configured"
/// rather than as a startup failure.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("INVDASH_ENV", "development"));
    let log_level = or_default("INVDASH_LOG_LEVEL", "info");

    let connection = UpstreamConnection::from_parts(
        lookup("INVDASH_UPSTREAM_BASE_URL").ok(),
        lookup("INVDASH_UPSTREAM_TOKEN").ok(),
    );

    let request_timeout_secs = parse_u64("INVDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("INVDASH_USER_AGENT", "invdash/0.1 (inventory-dashboard)");
    let scan_page_size = parse_positive_u32("INVDASH_SCAN_PAGE_SIZE", "100")?;
    let scan_max_pages = parse_positive_usize("INVDASH_SCAN_MAX_PAGES", "100")?;
    let catalog_cache_ttl_secs = parse_u64("INVDASH_CATALOG_CACHE_TTL_SECS", "300")?;

    Ok(AppConfig {
        env,
        log_level,
        connection,
        request_timeout_secs,
        user_agent,
        scan_page_size,
        scan_max_pages,
        catalog_cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
