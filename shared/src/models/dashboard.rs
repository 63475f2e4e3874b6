//! Read models for the server-side dashboard aggregation endpoints
//!
//! These are computed entirely by the external API; the console only
//! deserializes and renders them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{lenient_datetime, MaterialId, WarehouseId};

/// `/api/dashboard/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub warehouses: i64,
    pub materials: i64,
    pub suppliers: i64,
    pub clients: i64,
    /// Valued in UAH at server-side fixed exchange rates
    pub total_stock_value: Decimal,
    pub low_stock_items: i64,
    pub receipts_last_30_days: i64,
    pub issues_last_30_days: i64,
}

/// `/api/dashboard/warehouse-stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseStat {
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub available: Decimal,
}

/// `/api/dashboard/low-stock-alert`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub material_id: MaterialId,
    pub code: String,
    pub name: String,
    pub min_stock: Decimal,
    pub available: Decimal,
    /// available / min_stock, clamped to 0..=100
    pub fill_rate: f64,
}

/// `/api/dashboard/recent-activities`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub movement_type: String,
    pub qty_change: Decimal,
    pub reference: Option<String>,
    pub warehouse: String,
    pub material: String,
}

/// One day of `/api/dashboard/receipts-issues-timeline`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub receipts_count: i64,
    pub receipts_total: Decimal,
    pub issues_count: i64,
    pub issues_total: Decimal,
}

/// `/api/dashboard/top-materials`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMaterial {
    pub material_id: MaterialId,
    pub code: String,
    pub name: String,
    pub total_issued: Decimal,
    pub total_amount: Decimal,
}

/// Which counterparty side a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    Clients,
    Suppliers,
}

impl CounterpartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterpartyKind::Clients => "clients",
            CounterpartyKind::Suppliers => "suppliers",
        }
    }
}

/// One row of `/api/dashboard/counterparty-report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterpartyRow {
    pub id: i64,
    pub name: String,
    pub docs_count: i64,
    pub total_qty: Decimal,
    pub total: Decimal,
}
