use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn connected_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("INVDASH_UPSTREAM_BASE_URL", "https://api.example.com/v1");
    m.insert("INVDASH_UPSTREAM_TOKEN", "secret-token");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn empty_env_builds_unconfigured_defaults() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert!(cfg.connection.is_none());
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "invdash/0.1 (inventory-dashboard)");
    assert_eq!(cfg.scan_page_size, 100);
    assert_eq!(cfg.scan_max_pages, 100);
    assert_eq!(cfg.catalog_cache_ttl_secs, 300);
    assert_eq!(cfg.catalog_cache_ttl().as_secs(), 300);
}

#[test]
fn connection_present_when_url_and_token_set() {
    let map = connected_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let conn = cfg.connection.expect("expected a connection");
    assert_eq!(conn.base_url, "https://api.example.com/v1");
    assert_eq!(conn.token, "secret-token");
}

#[test]
fn connection_absent_when_token_missing() {
    let mut map = HashMap::new();
    map.insert("INVDASH_UPSTREAM_BASE_URL", "https://api.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.connection.is_none());
}

#[test]
fn connection_absent_when_url_blank() {
    let mut map = connected_env();
    map.insert("INVDASH_UPSTREAM_BASE_URL", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.connection.is_none());
}

#[test]
fn debug_output_redacts_token() {
    let map = connected_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-token"), "token leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn scan_page_size_override() {
    let mut map = connected_env();
    map.insert("INVDASH_SCAN_PAGE_SIZE", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.scan_page_size, 50);
}

#[test]
fn scan_page_size_zero_is_rejected() {
    let mut map = connected_env();
    map.insert("INVDASH_SCAN_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INVDASH_SCAN_PAGE_SIZE"),
        "expected InvalidEnvVar(INVDASH_SCAN_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn scan_max_pages_invalid() {
    let mut map = connected_env();
    map.insert("INVDASH_SCAN_MAX_PAGES", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INVDASH_SCAN_MAX_PAGES"),
        "expected InvalidEnvVar(INVDASH_SCAN_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn cache_ttl_override_allows_zero() {
    let mut map = connected_env();
    map.insert("INVDASH_CATALOG_CACHE_TTL_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.catalog_cache_ttl_secs, 0);
}

#[test]
fn request_timeout_invalid() {
    let mut map = connected_env();
    map.insert("INVDASH_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "INVDASH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(INVDASH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}
