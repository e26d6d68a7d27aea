use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregates over a full catalog scan. Always derived, never fetched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub active_products: usize,
    pub inactive_products: usize,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    /// Sum of available-for-sale units.
    pub total_stock: f64,
    pub total_reserved: f64,
    /// Inventory valued at cost price.
    pub total_value: f64,
    /// Inventory valued at sale price.
    pub total_sale_value: f64,
    pub total_categories: usize,
    pub total_suppliers: usize,
}

/// Row persisted once per day by the snapshot job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub total_products: usize,
    pub total_stock: f64,
    pub total_value: f64,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
}

impl DailySnapshot {
    #[must_use]
    pub fn from_stats(stats: &DashboardStats, date: NaiveDate) -> Self {
        Self {
            date,
            total_products: stats.total_products,
            total_stock: stats.total_stock,
            total_value: stats.total_value,
            low_stock_products: stats.low_stock_products,
            out_of_stock_products: stats.out_of_stock_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_snake_case_keys() {
        let stats = DashboardStats {
            total_products: 3,
            total_stock: 42.0,
            total_value: 120.5,
            low_stock_products: 1,
            out_of_stock_products: 1,
            ..DashboardStats::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let json = serde_json::to_value(DailySnapshot::from_stats(&stats, date)).unwrap();
        assert_eq!(json["date"], "2026-10-18");
        assert_eq!(json["total_products"], 3);
        assert_eq!(json["total_value"], 120.5);
        assert_eq!(json["out_of_stock_products"], 1);
    }
}
