//! Dashboard aggregates and the daily snapshot row.

use chrono::NaiveDate;
use invdash_core::{DailySnapshot, DashboardStats, Product, ProductStatus};

/// Aggregates a full product scan. Category and supplier counts come from the
/// facet index rather than the products, since facets only ever grow.
#[must_use]
pub fn dashboard_stats(
    products: &[Product],
    categories: usize,
    suppliers: usize,
) -> DashboardStats {
    let mut stats = DashboardStats {
        total_products: products.len(),
        total_categories: categories,
        total_suppliers: suppliers,
        ..DashboardStats::default()
    };

    for product in products {
        match product.status {
            ProductStatus::Active => stats.active_products += 1,
            ProductStatus::Inactive => stats.inactive_products += 1,
            ProductStatus::LowStock => stats.low_stock_products += 1,
            ProductStatus::OutOfStock => stats.out_of_stock_products += 1,
        }
        stats.total_stock += product.stock.max(0.0);
        stats.total_reserved += product.reserved_quantity.max(0.0);
        stats.total_value += product.stock_value_at_cost();
        stats.total_sale_value += product.stock_value_at_price();
    }

    stats
}

/// The row the snapshot job persists for `date`.
#[must_use]
pub fn snapshot_row(stats: &DashboardStats, date: NaiveDate) -> DailySnapshot {
    DailySnapshot::from_stats(stats, date)
}
