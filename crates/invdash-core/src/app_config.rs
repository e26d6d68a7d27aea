use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Base URL and bearer token for the upstream inventory API.
///
/// Both halves are required; a half-configured connection is treated as no
/// connection at all.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConnection {
    pub base_url: String,
    pub token: String,
}

impl UpstreamConnection {
    /// Builds a connection when both values are present and non-blank.
    #[must_use]
    pub fn from_parts(base_url: Option<String>, token: Option<String>) -> Option<Self> {
        let base_url = base_url.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())?;
        let token = token.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())?;
        Some(Self { base_url, token })
    }
}

impl std::fmt::Debug for UpstreamConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConnection")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub connection: Option<UpstreamConnection>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub scan_page_size: u32,
    pub scan_max_pages: usize,
    pub catalog_cache_ttl_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("connection", &self.connection)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("scan_page_size", &self.scan_page_size)
            .field("scan_max_pages", &self.scan_max_pages)
            .field("catalog_cache_ttl_secs", &self.catalog_cache_ttl_secs)
            .finish()
    }
}
