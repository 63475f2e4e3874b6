//! Reporting reducers over raw API collections
//!
//! The external API hands back flat, unaggregated collections (ledger
//! entries, receipts, issues). Everything here folds them into ranked,
//! labeled summaries for a trailing time window. A pass always starts
//! from empty buckets and owns nothing between recomputations; callers
//! re-run it from scratch whenever a parameter changes.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{Category, Client, Issue, LedgerEntry, Material, Receipt, Supplier, Warehouse};
use crate::types::{CategoryId, ClientId, SupplierId, WarehouseId};

/// Trailing windows the period selector offers, in days
pub const PERIOD_CHOICES: &[i64] = &[7, 14, 30, 60, 90];

/// Default result size for ranked reports
pub const DEFAULT_TOP_N: usize = 10;

/// Start of a trailing window: records strictly before it are excluded
pub fn window_cutoff(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    now - Duration::days(window_days)
}

/// Accumulator for one grouping key
#[derive(Debug, Clone, Default)]
pub struct AggregationBucket {
    pub total_qty: Decimal,
    pub total_value: Decimal,
    pub transaction_count: u64,
    pub distinct_related: HashSet<i64>,
    pub last_event: Option<DateTime<Utc>>,
}

impl AggregationBucket {
    fn record(
        &mut self,
        qty: Decimal,
        value: Decimal,
        related: Option<i64>,
        at: Option<DateTime<Utc>>,
    ) {
        self.total_qty += qty;
        self.total_value += value;
        self.transaction_count += 1;
        if let Some(id) = related {
            self.distinct_related.insert(id);
        }
        if let Some(at) = at {
            if self.last_event.map_or(true, |seen| at > seen) {
                self.last_event = Some(at);
            }
        }
    }
}

/// Fold records into key → bucket, skipping records with no grouping key
fn fold_buckets<R>(
    records: impl Iterator<Item = R>,
    key_fn: impl Fn(&R) -> Option<i64>,
    mut apply: impl FnMut(&mut AggregationBucket, &R),
) -> HashMap<i64, AggregationBucket> {
    let mut buckets: HashMap<i64, AggregationBucket> = HashMap::new();
    for record in records {
        let Some(key) = key_fn(&record) else {
            continue;
        };
        apply(buckets.entry(key).or_default(), &record);
    }
    buckets
}

/// Rank buckets by total value (descending; tie order unspecified) and
/// keep the top N
fn rank_top_n(
    buckets: HashMap<i64, AggregationBucket>,
    top_n: usize,
) -> Vec<(i64, AggregationBucket)> {
    let mut ranked: Vec<(i64, AggregationBucket)> = buckets.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_value.cmp(&a.1.total_value));
    ranked.truncate(top_n);
    ranked
}

/// One category in the top-categories-by-sales report
#[derive(Debug, Clone, Serialize)]
pub struct CategorySalesRow {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total_qty: Decimal,
    pub total_value: Decimal,
    pub transaction_count: u64,
    pub distinct_materials: usize,
}

/// One warehouse in the sales-distribution report
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseShareRow {
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub transaction_count: u64,
    pub total_qty: Decimal,
    pub total_value: Decimal,
}

/// One supplier or client in a counterparty activity report
#[derive(Debug, Clone, Serialize)]
pub struct CounterpartyActivityRow {
    pub id: i64,
    pub name: String,
    pub document_count: u64,
    pub total_value: Decimal,
    pub avg_value: Decimal,
    pub last_event: Option<DateTime<Utc>>,
    /// Days since the most recent document in the window
    pub days_since_last: Option<i64>,
}

/// Top categories by sales value: issue ledger entries joined through
/// materials to categories. Entries whose material does not resolve, or
/// whose material has no category, are skipped; an orphaned category id
/// still gets a synthetic label.
pub fn top_categories_by_sales(
    ledger: &[LedgerEntry],
    materials: &[Material],
    categories: &[Category],
    now: DateTime<Utc>,
    window_days: i64,
    top_n: usize,
) -> Vec<CategorySalesRow> {
    let cutoff = window_cutoff(now, window_days);
    let category_of: HashMap<i64, Option<CategoryId>> =
        materials.iter().map(|m| (m.id, m.category_id)).collect();

    let buckets = fold_buckets(
        ledger
            .iter()
            .filter(|e| e.date_time.is_some_and(|at| at >= cutoff)),
        |entry| category_of.get(&entry.material_id).copied().flatten(),
        |bucket, entry| {
            let qty = entry.qty_change.abs();
            let value = qty * entry.unit_price.unwrap_or(Decimal::ZERO);
            bucket.record(qty, value, Some(entry.material_id), entry.date_time);
        },
    );

    rank_top_n(buckets, top_n)
        .into_iter()
        .map(|(category_id, bucket)| CategorySalesRow {
            category_id,
            category_name: categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Category #{category_id}")),
            total_qty: bucket.total_qty,
            total_value: bucket.total_value,
            transaction_count: bucket.transaction_count,
            distinct_materials: bucket.distinct_related.len(),
        })
        .collect()
}

/// Sales distribution across warehouses: issue ledger entries grouped
/// directly by warehouse, valued at |total_price|
pub fn warehouse_distribution(
    ledger: &[LedgerEntry],
    warehouses: &[Warehouse],
    now: DateTime<Utc>,
    window_days: i64,
    top_n: usize,
) -> Vec<WarehouseShareRow> {
    let cutoff = window_cutoff(now, window_days);

    let buckets = fold_buckets(
        ledger
            .iter()
            .filter(|e| e.date_time.is_some_and(|at| at >= cutoff)),
        |entry| Some(entry.warehouse_id),
        |bucket, entry| {
            bucket.record(
                entry.qty_change.abs(),
                entry.total_price.unwrap_or(Decimal::ZERO).abs(),
                Some(entry.material_id),
                entry.date_time,
            );
        },
    );

    rank_top_n(buckets, top_n)
        .into_iter()
        .map(|(warehouse_id, bucket)| WarehouseShareRow {
            warehouse_id,
            warehouse_name: warehouses
                .iter()
                .find(|w| w.id == warehouse_id)
                .map(|w| w.name.clone())
                .unwrap_or_else(|| format!("Warehouse #{warehouse_id}")),
            transaction_count: bucket.transaction_count,
            total_qty: bucket.total_qty,
            total_value: bucket.total_value,
        })
        .collect()
}

/// Top suppliers by delivered value over the window, with recency
pub fn top_suppliers(
    receipts: &[Receipt],
    suppliers: &[Supplier],
    now: DateTime<Utc>,
    window_days: i64,
    top_n: usize,
) -> Vec<CounterpartyActivityRow> {
    let cutoff = window_cutoff(now, window_days);

    let buckets = fold_buckets(
        receipts
            .iter()
            .filter(|r| r.date.is_some_and(|at| at >= cutoff)),
        |receipt| receipt.supplier_id,
        |bucket, receipt| {
            bucket.record(Decimal::ZERO, receipt.total_amount, None, receipt.date);
        },
    );

    finish_counterparties(buckets, now, top_n, |id: SupplierId| {
        suppliers
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Supplier #{id}"))
    })
}

/// Top customers by purchased value over the window, with recency
pub fn top_customers(
    issues: &[Issue],
    clients: &[Client],
    now: DateTime<Utc>,
    window_days: i64,
    top_n: usize,
) -> Vec<CounterpartyActivityRow> {
    let cutoff = window_cutoff(now, window_days);

    let buckets = fold_buckets(
        issues
            .iter()
            .filter(|i| i.date.is_some_and(|at| at >= cutoff)),
        |issue| issue.client_id,
        |bucket, issue| {
            bucket.record(Decimal::ZERO, issue.total_amount, None, issue.date);
        },
    );

    finish_counterparties(buckets, now, top_n, |id: ClientId| {
        clients
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Client #{id}"))
    })
}

fn finish_counterparties(
    buckets: HashMap<i64, AggregationBucket>,
    now: DateTime<Utc>,
    top_n: usize,
    label: impl Fn(i64) -> String,
) -> Vec<CounterpartyActivityRow> {
    rank_top_n(buckets, top_n)
        .into_iter()
        .map(|(id, bucket)| {
            let count = Decimal::from(bucket.transaction_count);
            CounterpartyActivityRow {
                id,
                name: label(id),
                document_count: bucket.transaction_count,
                total_value: bucket.total_value,
                avg_value: if count.is_zero() {
                    Decimal::ZERO
                } else {
                    bucket.total_value / count
                },
                last_event: bucket.last_event,
                days_since_last: bucket.last_event.map(|at| (now - at).num_days()),
            }
        })
        .collect()
}
