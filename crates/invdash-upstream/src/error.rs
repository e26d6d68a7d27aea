use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream connection is not configured (missing base URL or token)")]
    NotConfigured,

    #[error("invalid upstream base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no movement endpoint answered for product {product_id} ({attempts} tried)")]
    EndpointsExhausted { product_id: String, attempts: usize },
}

impl UpstreamError {
    /// `true` for failures in reaching or talking to the upstream API, as
    /// opposed to local configuration problems.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::NotConfigured | Self::InvalidBaseUrl { .. })
    }
}
