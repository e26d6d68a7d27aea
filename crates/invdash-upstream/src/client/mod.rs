//! HTTP client for the upstream inventory REST API.

mod endpoints;
mod movements;
mod scan;

use std::time::Duration;

use invdash_core::UpstreamConnection;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::UpstreamError;
use crate::pagination::ListQuery;
use crate::resolve::{resolve, Resolved, PRODUCT_CONTAINERS};

pub use endpoints::MovementEndpoint;
pub use movements::MovementFetch;
pub use scan::{ScanReport, ScanStop};

/// Authenticated client for one upstream deployment.
///
/// Every request carries the bearer token. Non-2xx responses surface as
/// [`UpstreamError::NotFound`] or [`UpstreamError::UnexpectedStatus`]; nothing
/// is retried.
pub struct InventoryClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl InventoryClient {
    /// Creates a client for `connection` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::InvalidBaseUrl`] if the base URL does not parse or
    ///   cannot carry path segments.
    /// - [`UpstreamError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        connection: &UpstreamConnection,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so joined paths extend the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", connection.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| UpstreamError::InvalidBaseUrl {
            base_url: connection.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl {
                base_url: connection.base_url.clone(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url,
            token: connection.token.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches one listing page and resolves its record container.
    ///
    /// # Errors
    ///
    /// Any transport, status, or JSON error from [`Self::get_json`].
    pub async fn fetch_product_page(&self, query: &ListQuery) -> Result<Resolved, UpstreamError> {
        let url = self.products_url(query);
        let payload = self.get_json(url, "product listing").await?;
        Ok(resolve(payload, &PRODUCT_CONTAINERS))
    }

    /// Fetches the raw detail payload for one product.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::NotFound`] when upstream answers 404, otherwise any
    /// error from [`Self::get_json`].
    pub async fn fetch_product(&self, product_id: &str) -> Result<Value, UpstreamError> {
        let url = self.product_url(product_id);
        self.get_json(url, "product detail").await
    }

    /// Sends an authenticated GET and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::NotFound`] on HTTP 404.
    /// - [`UpstreamError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`UpstreamError::Http`] on network or TLS failure.
    /// - [`UpstreamError::Deserialize`] if the body is not valid JSON.
    pub(crate) async fn get_json(&self, url: Url, context: &str) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| UpstreamError::Deserialize {
            context: format!("{context} from {}", url.path()),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
