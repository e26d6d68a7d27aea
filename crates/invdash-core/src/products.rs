use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stock-derived lifecycle state of a product.
///
/// Never read from upstream: always recomputed from stock levels via
/// [`ProductStatus::from_stock_levels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
    LowStock,
    OutOfStock,
}

impl ProductStatus {
    /// Derives the status from available stock, the minimum threshold and an
    /// explicit inactive flag.
    ///
    /// Precedence is fixed: empty stock beats low stock, and both beat the
    /// inactive flag. Negative stock counts as empty.
    #[must_use]
    pub fn from_stock_levels(stock: f64, min_stock: f64, inactive: bool) -> Self {
        if stock <= 0.0 {
            Self::OutOfStock
        } else if stock <= min_stock {
            Self::LowStock
        } else if inactive {
            Self::Inactive
        } else {
            Self::Active
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named rendition of a product image, declared largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Original,
    Large,
    Medium,
    Small,
    Thumbnail,
}

impl ImageSize {
    /// Preference order when a single display URL is needed.
    pub const PRIORITY: [ImageSize; 5] = [
        ImageSize::Original,
        ImageSize::Large,
        ImageSize::Medium,
        ImageSize::Small,
        ImageSize::Thumbnail,
    ];
}

/// One entry of a product's image gallery.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// URLs keyed by rendition.
    pub sizes: BTreeMap<ImageSize, String>,
    /// Unsized URL, used when the upstream record carries a bare link.
    pub url: Option<String>,
    pub is_cover: bool,
}

impl ProductImage {
    /// The largest available rendition, degrading through
    /// [`ImageSize::PRIORITY`] and finally to the unsized URL.
    #[must_use]
    pub fn best_url(&self) -> Option<&str> {
        ImageSize::PRIORITY
            .iter()
            .find_map(|size| self.sizes.get(size))
            .or(self.url.as_ref())
            .map(String::as_str)
    }
}

/// A product in the canonical schema, independent of upstream field naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub supplier_sku: Option<String>,

    pub name: String,
    pub fiscal_name: String,
    pub description: String,
    pub category: String,
    pub category_id: Option<String>,
    pub brand: String,

    pub price: f64,
    pub cost_price: f64,
    pub cost_price_with_taxes: f64,

    /// Quantity available for sale.
    pub stock: f64,
    pub reserved_quantity: f64,
    pub min_stock: f64,
    pub max_stock: Option<f64>,
    pub unit: String,
    pub units_by_box: Option<f64>,
    pub status: ProductStatus,

    pub supplier: String,
    pub supplier_id: Option<String>,
    /// Supplier tax identifier (CNPJ/CPF).
    pub supplier_document: Option<String>,
    pub supplier_state_registration: Option<String>,

    pub weight: Option<f64>,
    pub box_weight: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    /// `"{width} x {height} x {length} cm"`, only when all three are known.
    pub dimensions: Option<String>,

    pub image_url: Option<String>,
    pub images: Vec<ProductImage>,
    pub video_link: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub avg_sells_quantity_past_7_days: Option<f64>,
    pub avg_sells_quantity_past_15_days: Option<f64>,
    pub avg_sells_quantity_past_30_days: Option<f64>,
    pub sold_quantity: Option<f64>,
}

impl Product {
    /// Stock valued at cost price.
    #[must_use]
    pub fn stock_value_at_cost(&self) -> f64 {
        self.cost_price * self.stock.max(0.0)
    }

    /// Stock valued at sale price.
    #[must_use]
    pub fn stock_value_at_price(&self) -> f64 {
        self.price * self.stock.max(0.0)
    }
}

/// One page of the catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// Upstream-reported total, or the number of records actually retrieved
    /// when upstream does not report one.
    pub total: usize,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl CatalogPage {
    #[must_use]
    pub fn new(products: Vec<Product>, total: usize, page: u32, limit: u32) -> Self {
        Self {
            products,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// `ceil(total / limit)`, or 0 when `limit` is 0.
#[must_use]
pub fn total_pages(total: usize, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(limit as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
