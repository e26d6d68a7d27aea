use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use invdash_analytics::AbcClass;
use invdash_upstream::{InventoryService, ListQuery};
use tracing_subscriber::EnvFilter;

mod catalog;
mod output;
mod report;

#[derive(Debug, Parser)]
#[command(name = "invdash")]
#[command(about = "Inventory dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List one page of the product catalog
    Products {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Products per page
        #[arg(long, default_value_t = invdash_upstream::pagination::DEFAULT_LIMIT)]
        limit: u32,
        /// Free-text search forwarded to upstream
        #[arg(long)]
        search: Option<String>,
        /// Restrict to a category id
        #[arg(long)]
        category: Option<String>,
        /// Restrict to a supplier id
        #[arg(long)]
        supplier: Option<String>,
        /// Upstream sort key
        #[arg(long)]
        order_by: Option<String>,
        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a single product
    Product {
        /// Upstream product id
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Show reconciled stock movements for one or more products
    Movements {
        /// Upstream product ids
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List categories and suppliers seen in the catalog
    Facets,
    /// Dashboard totals over the full catalog
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// ABC classification over the full catalog
    Abc {
        /// Only list products in this tier (A, B or C)
        #[arg(long, value_parser = parse_abc_class)]
        class: Option<AbcClass>,
        /// Maximum number of ranked products to list
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Print the daily snapshot row as JSON
    Snapshot {
        /// Snapshot date (YYYY-MM-DD); defaults to today in UTC
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Check that the upstream API answers with a known payload shape
    Ping,
}

fn parse_abc_class(value: &str) -> Result<AbcClass, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "A" => Ok(AbcClass::A),
        "B" => Ok(AbcClass::B),
        "C" => Ok(AbcClass::C),
        other => Err(format!("unknown ABC class '{other}'; expected A, B or C")),
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = invdash_core::load_app_config()?;
    init_tracing(&config.log_level);

    let Some(command) = cli.command else {
        println!("invdash ready; run `invdash --help` for commands");
        return Ok(());
    };

    let service = InventoryService::new(&config)?;
    tracing::debug!(
        env = %config.env,
        configured = service.is_configured(),
        "inventory service ready"
    );

    match command {
        Commands::Products {
            page,
            limit,
            search,
            category,
            supplier,
            order_by,
            json,
        } => {
            let query = build_list_query(page, limit, search, category, supplier, order_by);
            catalog::run_products(&service, &query, json).await?;
        }
        Commands::Product { id, json } => catalog::run_product(&service, &id, json).await?,
        Commands::Movements { ids, json } => catalog::run_movements(&service, &ids, json).await?,
        Commands::Facets => catalog::run_facets(&service).await?,
        Commands::Stats { json } => report::run_stats(&service, json).await?,
        Commands::Abc { class, limit } => report::run_abc(&service, class, limit).await?,
        Commands::Snapshot { date } => {
            let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            report::run_snapshot(&service, date).await?;
        }
        Commands::Ping => report::run_ping(&service).await?,
    }

    Ok(())
}

fn build_list_query(
    page: u32,
    limit: u32,
    search: Option<String>,
    category: Option<String>,
    supplier: Option<String>,
    order_by: Option<String>,
) -> ListQuery {
    let mut query = ListQuery::page(page, limit);
    if let Some(search) = search {
        query = query.with_search(search);
    }
    if let Some(category) = category {
        query = query.with_category(category);
    }
    if let Some(supplier) = supplier {
        query = query.with_supplier(supplier);
    }
    if let Some(order_by) = order_by {
        query = query.with_order_by(order_by);
    }
    query
}
