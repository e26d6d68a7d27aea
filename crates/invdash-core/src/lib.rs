//! Canonical inventory schema and configuration shared by every `invdash` crate.
//!
//! Nothing in here talks to the upstream API: the types describe what the
//! normalization layer produces and what the analytics layer consumes.

pub mod app_config;
pub mod config;
pub mod movements;
pub mod products;
pub mod references;
pub mod stats;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, UpstreamConnection};
pub use config::{load_app_config, load_app_config_from_env};
pub use movements::{MovementType, StockMovement, StockTrail, TypeSource};
pub use products::{CatalogPage, ImageSize, Product, ProductImage, ProductStatus};
pub use references::{Category, Reference, Supplier};
pub use stats::{DailySnapshot, DashboardStats};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
