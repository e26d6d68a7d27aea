//! Sequential full-catalog scan over the listing endpoint.

use invdash_core::Product;
use serde_json::Value;

use crate::error::UpstreamError;
use crate::normalize::normalize_product;
use crate::outcome::EmptyReason;
use crate::pagination::ListQuery;

use super::InventoryClient;

/// Why a scan stopped.
#[derive(Debug)]
pub enum ScanStop {
    /// A page came back with fewer records than requested.
    ShortPage,
    /// The accumulated count reached the upstream-reported total.
    ReachedTotal,
    /// `max_pages` pages were fetched without reaching the end.
    PageCap,
    /// A page request failed; products hold everything gathered before it.
    Failed(UpstreamError),
}

#[derive(Debug)]
pub struct ScanReport {
    pub products: Vec<Product>,
    pub pages: usize,
    /// Last total reported by upstream, if any page reported one.
    pub reported_total: Option<usize>,
    /// Why the first page was empty, when it was.
    pub first_page_empty: Option<EmptyReason>,
    pub stop: ScanStop,
}

impl ScanReport {
    /// `true` unless the scan aborted on an error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !matches!(self.stop, ScanStop::Failed(_))
    }
}

impl InventoryClient {
    /// Walks the listing endpoint page by page, normalizing as it goes.
    ///
    /// Pages are requested strictly in sequence. The scan ends on a short
    /// page, when the accumulated count reaches a total upstream actually
    /// reported, or after `max_pages` pages. `on_page` sees each page's raw
    /// records before normalization.
    ///
    /// **Partial-result semantics**: a failed page does not discard earlier
    /// pages. The report carries [`ScanStop::Failed`] and whatever was
    /// accumulated before the failure.
    pub async fn scan_catalog<F>(
        &self,
        page_size: u32,
        max_pages: usize,
        mut on_page: F,
    ) -> ScanReport
    where
        F: FnMut(&[Value]),
    {
        let mut products: Vec<Product> = Vec::new();
        let mut reported_total: Option<usize> = None;
        let mut first_page_empty: Option<EmptyReason> = None;
        let mut pages = 0_usize;

        let stop = loop {
            if pages >= max_pages {
                tracing::warn!(pages, max_pages, "catalog scan hit page cap");
                break ScanStop::PageCap;
            }
            pages += 1;

            let page = u32::try_from(pages).unwrap_or(u32::MAX);
            let query = ListQuery::page(page, page_size);
            let resolved = match self.fetch_product_page(&query).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::warn!(
                        page,
                        accumulated = products.len(),
                        error = %e,
                        "catalog scan aborted, keeping partial results"
                    );
                    break ScanStop::Failed(e);
                }
            };

            if pages == 1 {
                first_page_empty = resolved.empty_reason();
            }
            if resolved.total_reported {
                reported_total = Some(resolved.total);
            }

            on_page(&resolved.records);
            let fetched = resolved.records.len();
            products.extend(resolved.records.iter().map(normalize_product));
            tracing::debug!(page, fetched, accumulated = products.len(), "catalog page fetched");

            if fetched < page_size as usize {
                break ScanStop::ShortPage;
            }
            if reported_total.is_some_and(|total| products.len() >= total) {
                break ScanStop::ReachedTotal;
            }
        };

        if !matches!(stop, ScanStop::Failed(_)) {
            tracing::info!(
                pages,
                products = products.len(),
                reported_total,
                stop = ?stop,
                "catalog scan complete"
            );
        }

        ScanReport {
            products,
            pages,
            reported_total,
            first_page_empty,
            stop,
        }
    }
}
