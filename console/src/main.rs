//! Warehouse Operations Console - report runner
//!
//! Terminal entry point: authenticates against the identity provider,
//! pulls the dashboard read models, recomputes the four trailing-window
//! reports, and prints them. The same services back the browser views
//! through the wasm crate.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shared::models::CounterpartyKind;
use warehouse_console::services::AnalyticsService;
use warehouse_console::{ApiClient, AppError, Config, TokenClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warehouse_console=debug,whc_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Warehouse Operations Console");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API: {}", config.api.base_url);

    let auth = Arc::new(TokenClient::new(config.auth.clone()));
    let api = ApiClient::new(&config.api, auth)?;

    let summary = api.dashboard_summary().await?;
    println!("== Dashboard ==");
    println!("materials: {}", summary.materials);
    println!("warehouses: {}", summary.warehouses);
    println!("total stock value: {}", summary.total_stock_value);
    println!("low stock items: {}", summary.low_stock_items);
    println!("receipts (30d): {}", summary.receipts_last_30_days);
    println!("issues (30d): {}", summary.issues_last_30_days);

    let window_days = config.reports.window_days;
    let top_n = config.reports.top_n;
    let analytics = AnalyticsService::new(api.clone(), config.reports.clone());

    let export_dir = config.reports.export_dir.clone();

    println!("\n== Top categories by sales ({window_days}d) ==");
    if let Some(rows) = analytics.top_categories(window_days, top_n).await? {
        for row in &rows {
            println!(
                "{:<30} qty {:>12}  value {:>14}  ({} txns, {} materials)",
                row.category_name,
                row.total_qty,
                row.total_value,
                row.transaction_count,
                row.distinct_materials
            );
        }
        export_report(&export_dir, "top_categories.csv", &rows)?;
    }

    println!("\n== Warehouse distribution ({window_days}d) ==");
    if let Some(rows) = analytics.warehouse_distribution(window_days, top_n).await? {
        for row in &rows {
            println!(
                "{:<30} qty {:>12}  value {:>14}  ({} txns)",
                row.warehouse_name, row.total_qty, row.total_value, row.transaction_count
            );
        }
        export_report(&export_dir, "warehouse_distribution.csv", &rows)?;
    }

    println!("\n== Top suppliers ({window_days}d) ==");
    if let Some(rows) = analytics.top_suppliers(window_days, top_n).await? {
        print_counterparties(&rows);
        export_report(&export_dir, "top_suppliers.csv", &rows)?;
    }

    println!("\n== Top customers ({window_days}d) ==");
    if let Some(rows) = analytics.top_customers(window_days, top_n).await? {
        print_counterparties(&rows);
        export_report(&export_dir, "top_customers.csv", &rows)?;
    }

    // Server-side rollup; older backends do not ship this endpoint
    println!("\n== Counterparty report (server) ==");
    match analytics
        .counterparty_report(CounterpartyKind::Clients, None, None)
        .await
    {
        Ok(Some(rows)) => {
            for row in &rows {
                println!(
                    "{:<30} {:>4} docs  qty {:>12}  total {:>14}",
                    row.name, row.docs_count, row.total_qty, row.total
                );
            }
        }
        Ok(None) => {}
        Err(err @ AppError::FeatureUnavailable { .. }) => {
            println!("{}", err.user_message());
        }
        Err(err) => return Err(err.into()),
    }

    analytics.shutdown();
    Ok(())
}

/// Write one report's rows as CSV under the configured export directory
fn export_report<T: serde::Serialize>(
    dir: &Option<String>,
    file_name: &str,
    rows: &[T],
) -> anyhow::Result<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)?;
    let path = std::path::Path::new(dir).join(file_name);
    std::fs::write(&path, AnalyticsService::export_to_csv(rows)?)?;
    tracing::info!("exported {}", path.display());
    Ok(())
}

fn print_counterparties(rows: &[shared::analytics::CounterpartyActivityRow]) {
    for row in rows {
        let recency = row
            .days_since_last
            .map(|d| format!("{d}d ago"))
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<30} {:>4} docs  value {:>14}  avg {:>12}  last {}",
            row.name, row.document_count, row.total_value, row.avg_value, recency
        );
    }
}
