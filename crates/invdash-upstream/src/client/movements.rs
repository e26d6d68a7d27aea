//! Movement history through the ordered endpoint fallback chain.

use crate::error::UpstreamError;
use crate::resolve::{resolve, Resolved, MOVEMENT_CONTAINERS};

use super::{InventoryClient, MovementEndpoint};

/// Records from the first movement endpoint that answered.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementFetch {
    pub endpoint: MovementEndpoint,
    pub resolved: Resolved,
}

impl InventoryClient {
    /// Tries each [`MovementEndpoint`] in order and returns the first that
    /// answers with a 2xx JSON body, even when that body holds no records.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::EndpointsExhausted`] when every candidate failed with
    /// a transport error, a non-2xx status, or an unparseable body.
    pub async fn fetch_movements(&self, product_id: &str) -> Result<MovementFetch, UpstreamError> {
        for endpoint in MovementEndpoint::ALL {
            let url = endpoint.url(&self.base_url, product_id);
            match self.get_json(url, "movement history").await {
                Ok(payload) => {
                    tracing::debug!(
                        product_id,
                        endpoint = endpoint.template(),
                        "movement endpoint answered"
                    );
                    return Ok(MovementFetch {
                        endpoint,
                        resolved: resolve(payload, &MOVEMENT_CONTAINERS),
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        product_id,
                        endpoint = endpoint.template(),
                        error = %e,
                        "movement endpoint failed, trying next"
                    );
                }
            }
        }

        tracing::warn!(
            product_id,
            attempts = MovementEndpoint::ALL.len(),
            "no movement endpoint answered"
        );
        Err(UpstreamError::EndpointsExhausted {
            product_id: product_id.to_owned(),
            attempts: MovementEndpoint::ALL.len(),
        })
    }
}
