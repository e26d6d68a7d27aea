//! URL construction for listing, detail, and movement-history endpoints.

use reqwest::Url;

use crate::pagination::ListQuery;

use super::InventoryClient;

/// Candidate movement-history endpoints, tried in [`MovementEndpoint::ALL`]
/// order. Which one exists depends on the upstream API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEndpoint {
    /// `/products/{id}/stock-movements`
    ProductStockMovements,
    /// `/products/{id}/movements`
    ProductMovements,
    /// `/stock-movements?productId={id}`
    StockMovementsByQuery,
    /// `/stock/movements/{id}`
    StockMovementsById,
}

impl MovementEndpoint {
    pub const ALL: [MovementEndpoint; 4] = [
        Self::ProductStockMovements,
        Self::ProductMovements,
        Self::StockMovementsByQuery,
        Self::StockMovementsById,
    ];

    /// Path template, for logs.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::ProductStockMovements => "/products/{id}/stock-movements",
            Self::ProductMovements => "/products/{id}/movements",
            Self::StockMovementsByQuery => "/stock-movements?productId={id}",
            Self::StockMovementsById => "/stock/movements/{id}",
        }
    }

    #[must_use]
    pub fn url(self, base: &Url, product_id: &str) -> Url {
        match self {
            Self::ProductStockMovements => {
                with_segments(base, &["products", product_id, "stock-movements"])
            }
            Self::ProductMovements => with_segments(base, &["products", product_id, "movements"]),
            Self::StockMovementsByQuery => {
                let mut url = with_segments(base, &["stock-movements"]);
                url.query_pairs_mut().append_pair("productId", product_id);
                url
            }
            Self::StockMovementsById => with_segments(base, &["stock", "movements", product_id]),
        }
    }
}

/// Appends percent-encoded path segments to `base`.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

impl InventoryClient {
    pub(crate) fn products_url(&self, query: &ListQuery) -> Url {
        let mut url = with_segments(&self.base_url, &["products"]);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    pub(crate) fn product_url(&self, product_id: &str) -> Url {
        with_segments(&self.base_url, &["products", product_id])
    }
}
