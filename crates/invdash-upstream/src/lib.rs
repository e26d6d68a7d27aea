//! Upstream inventory API adapter.
//!
//! Resolves heterogeneous list payloads, normalizes product records, reconciles
//! stock movements, scans the full catalog behind a TTL cache, and accumulates
//! category/supplier facets. [`InventoryService`] ties these together.

pub mod cache;
pub mod client;
pub mod error;
pub mod facets;
pub mod fields;
pub mod normalize;
pub mod outcome;
pub mod pagination;
pub mod reconcile;
pub mod resolve;
pub mod service;

pub use cache::{CacheStats, TtlCache};
pub use client::{InventoryClient, MovementEndpoint, MovementFetch, ScanReport, ScanStop};
pub use error::UpstreamError;
pub use facets::FacetIndex;
pub use normalize::normalize_product;
pub use outcome::{EmptyReason, Fetched};
pub use pagination::ListQuery;
pub use reconcile::{
    infer_type_from_sign, movement_type_from_code, reconcile_movement, reconcile_movements,
};
pub use resolve::{resolve, resolve_record, ContainerKeys, Resolved, Shape};
pub use service::{ConnectionCheck, InventoryService};
