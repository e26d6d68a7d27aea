//! Full-catalog reports: dashboard totals, ABC tiers, the daily snapshot row
//! and the connectivity check.

use std::sync::Arc;

use chrono::NaiveDate;
use invdash_analytics::{classify, dashboard_stats, snapshot_row, summarize, AbcClass};
use invdash_core::{DashboardStats, Product};
use invdash_upstream::{EmptyReason, Fetched, InventoryService};

use crate::output::{empty_message, fmt_money, fmt_qty, fmt_shape, settle, truncate};

/// Scan the catalog and compute dashboard totals. Facet counts are read
/// after the scan so they include everything it saw.
async fn load_stats(service: &InventoryService, products: &[Product]) -> DashboardStats {
    let categories = service.categories().await.into_data_or_default().len();
    let suppliers = service.suppliers().await.into_data_or_default().len();
    dashboard_stats(products, categories, suppliers)
}

/// Print dashboard totals for the full catalog.
///
/// # Errors
///
/// Returns an error if the catalog scan fails outright.
pub(crate) async fn run_stats(service: &InventoryService, json: bool) -> anyhow::Result<()> {
    let Some(products) = settle("products", service.all_products().await)? else {
        return Ok(());
    };
    let stats = load_stats(service, &products).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Products:        {}", stats.total_products);
    println!("  active:        {}", stats.active_products);
    println!("  inactive:      {}", stats.inactive_products);
    println!("  low stock:     {}", stats.low_stock_products);
    println!("  out of stock:  {}", stats.out_of_stock_products);
    println!("Units in stock:  {}", fmt_qty(stats.total_stock));
    println!("Units reserved:  {}", fmt_qty(stats.total_reserved));
    println!("Value at cost:   {}", fmt_money(stats.total_value));
    println!("Value at price:  {}", fmt_money(stats.total_sale_value));
    println!("Categories:      {}", stats.total_categories);
    println!("Suppliers:       {}", stats.total_suppliers);
    Ok(())
}

/// Print the ABC tier summary followed by the ranked products.
///
/// # Errors
///
/// Returns an error if the catalog scan fails outright.
pub(crate) async fn run_abc(
    service: &InventoryService,
    class_filter: Option<AbcClass>,
    limit: usize,
) -> anyhow::Result<()> {
    let Some(products) = settle("products", service.all_products().await)? else {
        return Ok(());
    };
    let classified = classify(&products);
    let summary = summarize(&classified);

    println!("{:<6}{:>10}{:>14}{:>9}", "TIER", "PRODUCTS", "SCORE", "SHARE");
    for class in [AbcClass::A, AbcClass::B, AbcClass::C] {
        let tier = summary.tier(class);
        println!(
            "{:<6}{:>10}{:>14}{:>8.1}%",
            class.as_str(),
            tier.products,
            fmt_qty(tier.score),
            tier.score_share
        );
    }
    println!();

    let header = format!(
        "{:>5}  {:<10}{:<6}{:>12}{:>9}  NAME",
        "RANK", "ID", "TIER", "SCORE", "CUM %"
    );
    println!("{header}");
    for (rank, item) in classified
        .iter()
        .enumerate()
        .filter(|(_, item)| class_filter.is_none_or(|class| item.classification == class))
        .take(limit)
    {
        println!(
            "{:>5}  {:<10}{:<6}{:>12}{:>8.1}%  {}",
            rank + 1,
            truncate(&item.product.id, 8),
            item.classification.as_str(),
            fmt_qty(item.sales_score),
            item.accumulated_percentage,
            truncate(&item.product.name, 50)
        );
    }
    Ok(())
}

/// Print the daily snapshot row for `date` as JSON.
///
/// The row is only produced from a complete scan; a partial scan would
/// persist understated totals.
///
/// # Errors
///
/// Returns an error if the scan fails or is incomplete, the upstream API is
/// not configured, or the payload shape is not recognized.
pub(crate) async fn run_snapshot(
    service: &InventoryService,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let products: Arc<Vec<Product>> = match service.all_products().await {
        Fetched::Data(products) => products,
        Fetched::Partial { error, .. } => {
            anyhow::bail!("refusing to snapshot {date} from an incomplete catalog scan: {error}")
        }
        Fetched::Empty(EmptyReason::NoRecords) => {
            tracing::info!(%date, "snapshot taken over an empty catalog");
            Arc::new(Vec::new())
        }
        Fetched::Empty(reason) => anyhow::bail!("{}", empty_message("snapshot", reason)),
        Fetched::Failed(error) => {
            return Err(anyhow::Error::new(error).context("catalog scan for snapshot failed"));
        }
    };

    let stats = load_stats(service, &products).await;
    let row = snapshot_row(&stats, date);
    println!("{}", serde_json::to_string_pretty(&row)?);
    Ok(())
}

/// Check the upstream API with a one-record listing request.
///
/// # Errors
///
/// Returns an error if the upstream API is not configured or the check fails.
pub(crate) async fn run_ping(service: &InventoryService) -> anyhow::Result<()> {
    let check = service.test_connection().await?;
    println!("ok: {}", check.base_url);
    println!("  payload:  {}", fmt_shape(check.shape));
    println!("  products: {}", check.total);
    println!("  latency:  {} ms", check.elapsed_ms);
    Ok(())
}
