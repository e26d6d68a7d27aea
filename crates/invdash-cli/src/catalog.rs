//! Catalog command handlers: listing, detail, movements and facets.
//!
//! Each handler goes through [`InventoryService`] so the CLI sees exactly the
//! normalized records the dashboard would.

use invdash_core::{Product, StockMovement};
use invdash_upstream::{InventoryService, ListQuery};

use crate::output::{fmt_money, fmt_qty, fmt_timestamp, settle, truncate};

/// Print one page of the catalog.
///
/// # Errors
///
/// Returns an error if the listing request fails or JSON output cannot be
/// serialized.
pub(crate) async fn run_products(
    service: &InventoryService,
    query: &ListQuery,
    json: bool,
) -> anyhow::Result<()> {
    let Some(page) = settle("products", service.list_products(query).await)? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    print_product_table(&page.products);
    println!();
    println!(
        "page {} of {} ({} products, {} per page)",
        page.page, page.total_pages, page.total, page.limit
    );
    Ok(())
}

/// Print a single product.
///
/// # Errors
///
/// Returns an error if the detail request fails.
pub(crate) async fn run_product(
    service: &InventoryService,
    product_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let what = format!("product '{product_id}'");
    let Some(product) = settle(&what, service.get_product(product_id).await)? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!("{} ({})", product.name, product.id);
    println!("SKU:        {}", product.sku);
    println!("Status:     {}", product.status);
    println!("Category:   {}", product.category);
    println!("Supplier:   {}", product.supplier);
    println!("Brand:      {}", product.brand);
    println!(
        "Stock:      {} {} (min {}, reserved {})",
        fmt_qty(product.stock),
        product.unit,
        fmt_qty(product.min_stock),
        fmt_qty(product.reserved_quantity)
    );
    println!(
        "Price:      {} (cost {})",
        fmt_money(product.price),
        fmt_money(product.cost_price)
    );
    if let Some(dimensions) = &product.dimensions {
        println!("Dimensions: {dimensions}");
    }
    if let Some(url) = &product.image_url {
        println!("Image:      {url}");
    }
    println!("Updated:    {}", fmt_timestamp(product.updated_at));
    Ok(())
}

/// Print reconciled movement histories, one block per product.
///
/// Products whose fallback chain fails are reported and skipped; the command
/// only fails when every product failed.
///
/// # Errors
///
/// Returns an error if no product's movements could be loaded, or JSON
/// output cannot be serialized.
pub(crate) async fn run_movements(
    service: &InventoryService,
    product_ids: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let results = service.movements_for(product_ids).await;
    let mut failures = 0usize;
    let mut loaded: Vec<(String, Vec<StockMovement>)> = Vec::with_capacity(results.len());

    for (product_id, fetched) in results {
        let what = format!("movements for product '{product_id}'");
        match settle(&what, fetched) {
            Ok(Some(movements)) => loaded.push((product_id, movements)),
            Ok(None) => loaded.push((product_id, Vec::new())),
            Err(e) => {
                failures += 1;
                eprintln!("error: {e:#}");
            }
        }
    }

    if failures > 0 && failures == product_ids.len() {
        anyhow::bail!("no movement endpoint answered for any of {failures} products");
    }

    if json {
        let by_product: serde_json::Map<String, serde_json::Value> = loaded
            .into_iter()
            .map(|(id, movements)| {
                Ok::<_, serde_json::Error>((id, serde_json::to_value(movements)?))
            })
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&by_product)?);
        return Ok(());
    }

    for (product_id, movements) in &loaded {
        if movements.is_empty() {
            continue;
        }
        println!("Product {product_id}");
        print_movement_table(movements);
        println!();
    }
    Ok(())
}

/// Print every category and supplier seen in the catalog.
///
/// # Errors
///
/// Returns an error if the catalog scan behind the facet lists fails.
pub(crate) async fn run_facets(service: &InventoryService) -> anyhow::Result<()> {
    if let Some(categories) = settle("categories", service.categories().await)? {
        println!("CATEGORIES ({})", categories.len());
        for category in &categories {
            println!("  {:<12}{}", category.id, category.name);
        }
    }
    println!();
    if let Some(suppliers) = settle("suppliers", service.suppliers().await)? {
        println!("SUPPLIERS ({})", suppliers.len());
        for supplier in &suppliers {
            println!("  {:<12}{}", supplier.id, supplier.name);
        }
    }
    Ok(())
}

fn print_product_table(products: &[Product]) {
    let header = format!(
        "{:<10}{:<14}{:<14}{:>9}{:>7}{:>11}  NAME",
        "ID", "SKU", "STATUS", "STOCK", "MIN", "PRICE"
    );
    println!("{header}");
    for product in products {
        println!(
            "{:<10}{:<14}{:<14}{:>9}{:>7}{:>11}  {}",
            truncate(&product.id, 8),
            truncate(&product.sku, 12),
            product.status.as_str(),
            fmt_qty(product.stock),
            fmt_qty(product.min_stock),
            fmt_money(product.price),
            truncate(&product.name, 50)
        );
    }
}

/// Degraded rows (type inferred from sign, or no stock trail) are flagged
/// with `*`.
fn print_movement_table(movements: &[StockMovement]) {
    let header = format!(
        "  {:<18}{:<12}{:>9}{:>9}{:>9}  REASON",
        "DATE", "TYPE", "QTY", "BEFORE", "AFTER"
    );
    println!("{header}");
    for movement in movements {
        let flag = if movement.is_degraded() { "*" } else { " " };
        println!(
            "{flag} {:<18}{:<12}{:>9}{:>9}{:>9}  {}",
            fmt_timestamp(movement.created_at),
            movement.movement_type.as_str(),
            fmt_qty(movement.quantity),
            fmt_qty(movement.previous_stock),
            fmt_qty(movement.new_stock),
            truncate(&movement.reason, 40)
        );
    }
}
