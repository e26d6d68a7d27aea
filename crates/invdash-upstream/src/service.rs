//! `InventoryService`: the facade the dashboard talks to.
//!
//! Owns the upstream client, the catalog cache, and the facet index. Every
//! operation returns a [`Fetched`] so callers can tell an empty catalog from
//! a missing connection or a failing upstream. Without a connection no
//! request is ever made.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use futures::future::join_all;
use invdash_core::{
    AppConfig, CatalogPage, Category, Product, Reference, StockMovement, Supplier,
    UpstreamConnection,
};

use crate::cache::TtlCache;
use crate::client::{InventoryClient, ScanStop};
use crate::error::UpstreamError;
use crate::facets::FacetIndex;
use crate::normalize::normalize_product;
use crate::outcome::{EmptyReason, Fetched};
use crate::pagination::ListQuery;
use crate::reconcile::reconcile_movements;
use crate::resolve::{resolve_record, Shape};

/// What the cache holds: the scanned products plus why they are empty, when
/// they are.
#[derive(Debug)]
struct CachedCatalog {
    products: Arc<Vec<Product>>,
    empty_reason: Option<EmptyReason>,
}

impl CachedCatalog {
    fn to_fetched(&self) -> Fetched<Arc<Vec<Product>>> {
        if self.products.is_empty() {
            Fetched::Empty(self.empty_reason.unwrap_or(EmptyReason::NoRecords))
        } else {
            Fetched::Data(Arc::clone(&self.products))
        }
    }
}

/// A scan that failed part way.
struct ScanAbort {
    products: Vec<Product>,
    error: UpstreamError,
}

/// Result of [`InventoryService::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub base_url: String,
    /// Listing total reported by upstream, or the records on the check page.
    pub total: usize,
    pub shape: Shape,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone)]
struct ScanSettings {
    page_size: u32,
    max_pages: usize,
    timeout_secs: u64,
    user_agent: String,
}

#[derive(Debug)]
pub struct InventoryService {
    settings: ScanSettings,
    client: RwLock<Option<Arc<InventoryClient>>>,
    /// Bumped on every reconfigure, under the `client` write lock. Scans
    /// started under an older value never reach the cache or the facets.
    generation: AtomicU64,
    catalog: TtlCache<CachedCatalog>,
    facets: FacetIndex,
}

impl InventoryService {
    /// Builds the service from configuration. A missing connection is not an
    /// error; every operation then short-circuits to
    /// `Empty(NotConfigured)`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidBaseUrl`] or [`UpstreamError::Http`] if
    /// a configured connection cannot produce a client.
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        let settings = ScanSettings {
            page_size: config.scan_page_size,
            max_pages: config.scan_max_pages,
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        };
        let client = config
            .connection
            .as_ref()
            .map(|connection| build_client(&settings, connection))
            .transpose()?;
        Ok(Self {
            settings,
            client: RwLock::new(client),
            generation: AtomicU64::new(0),
            catalog: TtlCache::new(config.catalog_cache_ttl()),
            facets: FacetIndex::new(),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client().is_some()
    }

    /// Swaps the upstream connection. The catalog cache and both facet lists
    /// are dropped even when the new client cannot be built, and a scan
    /// still running against the old connection will not refill them.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`]; on error the service is left unconfigured.
    pub fn reconfigure(&self, connection: Option<UpstreamConnection>) -> Result<(), UpstreamError> {
        let built = connection
            .as_ref()
            .map(|connection| build_client(&self.settings, connection))
            .transpose();

        let mut slot = self.client.write().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.catalog.invalidate();
        self.facets.clear();
        match built {
            Ok(client) => {
                tracing::info!(
                    configured = client.is_some(),
                    generation,
                    "upstream connection reconfigured"
                );
                *slot = client;
                Ok(())
            }
            Err(e) => {
                *slot = None;
                Err(e)
            }
        }
    }

    pub fn invalidate_cache(&self) {
        self.catalog.invalidate();
    }

    /// One page of the listing, normalized. Facets are updated from the page.
    pub async fn list_products(&self, query: &ListQuery) -> Fetched<CatalogPage> {
        let Some((client, generation)) = self.connection() else {
            return Fetched::Empty(EmptyReason::NotConfigured);
        };
        let resolved = match client.fetch_product_page(query).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(page = query.effective_page(), error = %e, "product listing failed");
                return Fetched::Failed(e);
            }
        };
        if let Some(reason) = resolved.empty_reason() {
            return Fetched::Empty(reason);
        }

        self.facets
            .extract_if(&resolved.records, || self.is_current(generation));
        let products: Vec<Product> = resolved.records.iter().map(normalize_product).collect();
        Fetched::Data(CatalogPage::new(
            products,
            resolved.total,
            query.effective_page(),
            query.limit,
        ))
    }

    /// A single product by id. A 404 is `Empty(NoRecords)`.
    pub async fn get_product(&self, product_id: &str) -> Fetched<Product> {
        let Some(client) = self.client() else {
            return Fetched::Empty(EmptyReason::NotConfigured);
        };
        match client.fetch_product(product_id).await {
            Ok(payload) => match resolve_record(payload) {
                Some(record) => Fetched::Data(normalize_product(&record)),
                None => Fetched::Empty(EmptyReason::UnrecognizedShape),
            },
            Err(UpstreamError::NotFound { .. }) => Fetched::Empty(EmptyReason::NoRecords),
            Err(e) => {
                tracing::warn!(product_id, error = %e, "product detail failed");
                Fetched::Failed(e)
            }
        }
    }

    /// Every product in the catalog, served from the TTL cache when fresh.
    ///
    /// Complete and page-capped scans are cached. A scan that fails part way
    /// yields `Partial` and is not cached, so the next call scans again.
    pub async fn all_products(&self) -> Fetched<Arc<Vec<Product>>> {
        let Some((client, generation)) = self.connection() else {
            return Fetched::Empty(EmptyReason::NotConfigured);
        };

        let refreshed = self
            .catalog
            .get_or_refresh_if(
                || self.scan(&client, generation),
                || self.is_current(generation),
            )
            .await;
        match refreshed {
            Ok(catalog) => catalog.to_fetched(),
            Err(ScanAbort { products, error }) if products.is_empty() => Fetched::Failed(error),
            Err(ScanAbort { products, error }) => Fetched::Partial {
                data: Arc::new(products),
                error,
            },
        }
    }

    async fn scan(
        &self,
        client: &InventoryClient,
        generation: u64,
    ) -> Result<CachedCatalog, ScanAbort> {
        let report = client
            .scan_catalog(self.settings.page_size, self.settings.max_pages, |records| {
                self.facets
                    .extract_if(records, || self.is_current(generation));
            })
            .await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "scan outlived its connection; results not retained");
        }

        match report.stop {
            ScanStop::Failed(error) => Err(ScanAbort {
                products: report.products,
                error,
            }),
            ScanStop::ShortPage | ScanStop::ReachedTotal | ScanStop::PageCap => Ok(CachedCatalog {
                products: Arc::new(report.products),
                empty_reason: report.first_page_empty,
            }),
        }
    }

    /// Movement history for one product via the endpoint fallback chain,
    /// newest first.
    pub async fn stock_movements(&self, product_id: &str) -> Fetched<Vec<StockMovement>> {
        let Some(client) = self.client() else {
            return Fetched::Empty(EmptyReason::NotConfigured);
        };
        let fetch = match client.fetch_movements(product_id).await {
            Ok(fetch) => fetch,
            Err(e) => return Fetched::Failed(e),
        };
        if let Some(reason) = fetch.resolved.empty_reason() {
            return Fetched::Empty(reason);
        }

        let mut movements = reconcile_movements(&fetch.resolved.records, product_id);
        let degraded = movements.iter().filter(|m| m.is_degraded()).count();
        if degraded > 0 {
            tracing::info!(
                product_id,
                degraded,
                total = movements.len(),
                "some movements were reconciled from incomplete records"
            );
        }
        sort_newest_first(&mut movements);
        Fetched::Data(movements)
    }

    /// Movement histories for several products, fetched concurrently with
    /// one chain per product. Output follows input order.
    pub async fn movements_for(
        &self,
        product_ids: &[String],
    ) -> Vec<(String, Fetched<Vec<StockMovement>>)> {
        let fetches = product_ids.iter().map(|id| self.stock_movements(id));
        let results = join_all(fetches).await;
        product_ids.iter().cloned().zip(results).collect()
    }

    /// Categories seen so far. When none have been seen yet, a catalog scan
    /// is run (or served from cache) to populate them.
    pub async fn categories(&self) -> Fetched<Vec<Category>> {
        self.facet_list(FacetIndex::categories).await
    }

    /// Suppliers seen so far; populated the same way as [`Self::categories`].
    pub async fn suppliers(&self) -> Fetched<Vec<Supplier>> {
        self.facet_list(FacetIndex::suppliers).await
    }

    async fn facet_list(&self, read: fn(&FacetIndex) -> Vec<Reference>) -> Fetched<Vec<Reference>> {
        let seen = read(&self.facets);
        if !seen.is_empty() {
            return Fetched::Data(seen);
        }

        match self.all_products().await {
            Fetched::Empty(reason) => Fetched::Empty(reason),
            Fetched::Failed(error) => Fetched::Failed(error),
            Fetched::Partial { error, .. } => {
                let seen = read(&self.facets);
                if seen.is_empty() {
                    Fetched::Failed(error)
                } else {
                    Fetched::Partial { data: seen, error }
                }
            }
            Fetched::Data(_) => {
                let seen = read(&self.facets);
                if seen.is_empty() {
                    Fetched::Empty(EmptyReason::NoRecords)
                } else {
                    Fetched::Data(seen)
                }
            }
        }
    }

    /// Requests a single listing record to prove the connection works.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::NotConfigured`] when no connection is set, otherwise
    /// whatever the check request failed with.
    pub async fn test_connection(&self) -> Result<ConnectionCheck, UpstreamError> {
        let client = self.client().ok_or(UpstreamError::NotConfigured)?;
        let started = Instant::now();
        let resolved = client.fetch_product_page(&ListQuery::page(1, 1)).await?;
        let check = ConnectionCheck {
            base_url: client.base_url().to_string(),
            total: resolved.total,
            shape: resolved.shape,
            elapsed_ms: started.elapsed().as_millis(),
        };
        tracing::info!(
            base_url = %check.base_url,
            total = check.total,
            elapsed_ms = check.elapsed_ms,
            "upstream connection ok"
        );
        Ok(check)
    }

    fn client(&self) -> Option<Arc<InventoryClient>> {
        self.connection().map(|(client, _)| client)
    }

    /// The current client with the generation it belongs to, read under one
    /// lock so the pair is consistent.
    fn connection(&self) -> Option<(Arc<InventoryClient>, u64)> {
        let slot = self.client.read().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.load(Ordering::SeqCst);
        slot.clone().map(|client| (client, generation))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

fn build_client(
    settings: &ScanSettings,
    connection: &UpstreamConnection,
) -> Result<Arc<InventoryClient>, UpstreamError> {
    InventoryClient::new(connection, settings.timeout_secs, &settings.user_agent).map(Arc::new)
}

/// Newest `created_at` first; undated movements last, in upstream order.
fn sort_newest_first(movements: &mut [StockMovement]) {
    movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use invdash_core::{Environment, MovementType, StockTrail, TypeSource};

    use super::*;

    fn config(connection: Option<UpstreamConnection>) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "debug".to_owned(),
            connection,
            request_timeout_secs: 5,
            user_agent: "invdash-test".to_owned(),
            scan_page_size: 100,
            scan_max_pages: 10,
            catalog_cache_ttl_secs: 300,
        }
    }

    fn movement(id: &str, day: Option<u32>) -> StockMovement {
        StockMovement {
            id: id.to_owned(),
            product_id: "p".to_owned(),
            movement_type: MovementType::Entry,
            quantity: 1.0,
            previous_stock: 0.0,
            new_stock: 1.0,
            reason: String::new(),
            reference: None,
            user_id: String::new(),
            user_name: String::new(),
            created_at: day.and_then(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).single()),
            type_source: TypeSource::Code,
            trail: StockTrail::Observed,
        }
    }

    #[tokio::test]
    async fn unconfigured_service_short_circuits() {
        let service = InventoryService::new(&config(None)).unwrap();
        assert!(!service.is_configured());
        assert!(matches!(
            service.all_products().await,
            Fetched::Empty(EmptyReason::NotConfigured)
        ));
        assert!(matches!(
            service.list_products(&ListQuery::default()).await,
            Fetched::Empty(EmptyReason::NotConfigured)
        ));
        assert!(matches!(
            service.stock_movements("1").await,
            Fetched::Empty(EmptyReason::NotConfigured)
        ));
        assert!(matches!(
            service.categories().await,
            Fetched::Empty(EmptyReason::NotConfigured)
        ));
        assert!(matches!(
            service.test_connection().await,
            Err(UpstreamError::NotConfigured)
        ));
    }

    #[test]
    fn bad_base_url_fails_construction() {
        let connection = UpstreamConnection {
            base_url: "::nope::".to_owned(),
            token: "t".to_owned(),
        };
        let err = InventoryService::new(&config(Some(connection))).unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn reconfigure_toggles_connection() {
        let service = InventoryService::new(&config(None)).unwrap();
        service
            .reconfigure(Some(UpstreamConnection {
                base_url: "https://api.example.com".to_owned(),
                token: "t".to_owned(),
            }))
            .unwrap();
        assert!(service.is_configured());

        service.reconfigure(None).unwrap();
        assert!(!service.is_configured());
    }

    #[test]
    fn failed_reconfigure_leaves_service_unconfigured() {
        let service = InventoryService::new(&config(Some(UpstreamConnection {
            base_url: "https://api.example.com".to_owned(),
            token: "t".to_owned(),
        })))
        .unwrap();
        let result = service.reconfigure(Some(UpstreamConnection {
            base_url: "::nope::".to_owned(),
            token: "t".to_owned(),
        }));
        assert!(result.is_err());
        assert!(!service.is_configured());
    }

    #[test]
    fn movements_sort_newest_first_with_undated_last() {
        let mut movements = vec![
            movement("old", Some(1)),
            movement("undated", None),
            movement("new", Some(20)),
            movement("mid", Some(10)),
        ];
        sort_newest_first(&mut movements);
        let ids: Vec<&str> = movements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old", "undated"]);
    }
}
