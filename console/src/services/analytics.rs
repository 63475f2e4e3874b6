//! Analytics recomputation service
//!
//! One `AnalyticsService` per analytics view. Each report call begins a
//! fresh fetch cycle; when a newer call supersedes it mid-flight, the
//! older call resolves to `Ok(None)` and its result is discarded
//! rather than treated as a failure. Aggregation itself is pure and
//! lives in `shared::analytics`; this service only feeds it data.

use chrono::Utc;
use serde::Serialize;

use shared::analytics::{
    self, CategorySalesRow, CounterpartyActivityRow, WarehouseShareRow,
};
use shared::models::{CounterpartyKind, CounterpartyRow, LedgerFilter};
use shared::types::DateRange;

use crate::api::ApiClient;
use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};
use crate::services::cycle::RecomputeGuard;

pub struct AnalyticsService {
    api: ApiClient,
    guard: RecomputeGuard,
    defaults: ReportsConfig,
}

impl AnalyticsService {
    pub fn new(api: ApiClient, defaults: ReportsConfig) -> Self {
        Self {
            api,
            guard: RecomputeGuard::new(),
            defaults,
        }
    }

    /// Invalidate every in-flight recomputation; called on view teardown
    pub fn shutdown(&self) {
        self.guard.shutdown();
    }

    pub fn default_window_days(&self) -> i64 {
        self.defaults.window_days
    }

    /// Top categories by sales value over the trailing window.
    /// `Ok(None)` means a newer recomputation superseded this one.
    pub async fn top_categories(
        &self,
        window_days: i64,
        top_n: usize,
    ) -> AppResult<Option<Vec<CategorySalesRow>>> {
        let token = self.guard.begin();
        let now = Utc::now();
        let filter = LedgerFilter::issues().since(analytics::window_cutoff(now, window_days));

        let (ledger, materials, categories) = tokio::try_join!(
            self.api.stock_ledger(&filter),
            self.api.materials(),
            self.api.categories(),
        )?;
        log_undated(&ledger);
        if !token.is_current() {
            tracing::debug!(report = "top_categories", "cycle superseded, discarding");
            return Ok(None);
        }

        Ok(Some(analytics::top_categories_by_sales(
            &ledger,
            &materials,
            &categories,
            now,
            window_days,
            top_n,
        )))
    }

    /// Sales distribution across warehouses over the trailing window
    pub async fn warehouse_distribution(
        &self,
        window_days: i64,
        top_n: usize,
    ) -> AppResult<Option<Vec<WarehouseShareRow>>> {
        let token = self.guard.begin();
        let now = Utc::now();
        let filter = LedgerFilter::issues().since(analytics::window_cutoff(now, window_days));

        let (ledger, warehouses) =
            tokio::try_join!(self.api.stock_ledger(&filter), self.api.warehouses())?;
        log_undated(&ledger);
        if !token.is_current() {
            tracing::debug!(report = "warehouse_distribution", "cycle superseded, discarding");
            return Ok(None);
        }

        Ok(Some(analytics::warehouse_distribution(
            &ledger,
            &warehouses,
            now,
            window_days,
            top_n,
        )))
    }

    /// Top suppliers by delivered value over the trailing window
    pub async fn top_suppliers(
        &self,
        window_days: i64,
        top_n: usize,
    ) -> AppResult<Option<Vec<CounterpartyActivityRow>>> {
        let token = self.guard.begin();
        let now = Utc::now();

        let (receipts, suppliers) = tokio::try_join!(self.api.receipts(), self.api.suppliers())?;
        if !token.is_current() {
            tracing::debug!(report = "top_suppliers", "cycle superseded, discarding");
            return Ok(None);
        }

        Ok(Some(analytics::top_suppliers(
            &receipts,
            &suppliers,
            now,
            window_days,
            top_n,
        )))
    }

    /// Top customers by purchased value over the trailing window
    pub async fn top_customers(
        &self,
        window_days: i64,
        top_n: usize,
    ) -> AppResult<Option<Vec<CounterpartyActivityRow>>> {
        let token = self.guard.begin();
        let now = Utc::now();

        let (issues, clients) = tokio::try_join!(self.api.issues(), self.api.clients())?;
        if !token.is_current() {
            tracing::debug!(report = "top_customers", "cycle superseded, discarding");
            return Ok(None);
        }

        Ok(Some(analytics::top_customers(
            &issues,
            &clients,
            now,
            window_days,
            top_n,
        )))
    }

    /// Server-computed counterparty rollup. The backend-gap case
    /// (`FeatureUnavailable`) passes through so the view can show its
    /// dedicated message.
    pub async fn counterparty_report(
        &self,
        kind: CounterpartyKind,
        range: Option<&DateRange>,
        currency: Option<&str>,
    ) -> AppResult<Option<Vec<CounterpartyRow>>> {
        let token = self.guard.begin();
        let rows = self
            .api
            .counterparty_report(kind, range, currency, self.defaults.top_n)
            .await?;
        if !token.is_current() {
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Render any report's rows as CSV for download
    pub fn export_to_csv<T: Serialize>(rows: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in rows {
            wtr.serialize(row)
                .map_err(|e| AppError::CsvExport(format!("serialization error: {e}")))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::CsvExport(format!("writer error: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::CsvExport(format!("utf-8 error: {e}")))
    }
}

/// Entries with no usable timestamp are excluded from every window, not
/// treated as errors; leave a trace of how many were dropped.
fn log_undated(ledger: &[shared::models::LedgerEntry]) {
    let undated = ledger.iter().filter(|e| e.date_time.is_none()).count();
    if undated > 0 {
        tracing::debug!(undated, "ledger entries without a usable timestamp excluded");
    }
}
