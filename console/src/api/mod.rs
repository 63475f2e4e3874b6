//! Client for the external inventory API
//!
//! All persistence, business-rule enforcement and aggregation authority
//! live behind this boundary. Every request carries a bearer token; a
//! 204 response is "no content", and a non-2xx response surfaces the
//! body's `detail` field (or raw text) verbatim as the error message.

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use validator::Validate;

use shared::models::{
    Category, CategoryCreate, Client, CounterpartyKind, CounterpartyRow, DashboardSummary,
    DocumentPayload, Issue, LedgerEntry, LedgerFilter, LowStockAlert, Material, MaterialCreate,
    PartyCreate, Receipt, RecentActivity, StockRow, Supplier, TimelinePoint, TopMaterial,
    Warehouse, WarehouseCreate, WarehouseStat,
};
use shared::types::{
    CategoryId, ClientId, DateRange, DocumentId, MaterialId, SupplierId, WarehouseId,
};

use crate::auth::TokenClient;
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Inventory API client
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<TokenClient>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, auth: Arc<TokenClient>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Issue one authenticated request. `Ok(None)` is a 204.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&impl Serialize>,
    ) -> AppResult<Option<T>> {
        let token = self.auth.access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status.is_success() {
            return Ok(Some(response.json().await?));
        }

        // Error path: prefer the JSON `detail` field, fall back to text
        let mut message = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        let text = response.text().await.unwrap_or_default();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            match value.get("detail") {
                Some(serde_json::Value::String(detail)) => {
                    message = format!("{message} — {detail}");
                }
                Some(detail) => message = format!("{message} — {detail}"),
                None if !text.is_empty() => message = format!("{message} — {text}"),
                None => {}
            }
        } else if !text.is_empty() {
            message = format!("{message} — {text}");
        }

        tracing::warn!(%url, status = status.as_u16(), "API request rejected");
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T> {
        let body: Option<&()> = None;
        self.send(Method::GET, path, query, body)
            .await?
            .ok_or_else(|| AppError::Api {
                status: 204,
                message: format!("{path} returned no content"),
            })
    }

    /// Collection GET: a 204 is an empty collection, not an error
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let body: Option<&()> = None;
        Ok(self
            .send(Method::GET, path, query, body)
            .await?
            .unwrap_or_default())
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send(Method::POST, path, &[], Some(body))
            .await?
            .ok_or_else(|| AppError::Api {
                status: 204,
                message: format!("{path} returned no content"),
            })
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send(Method::PUT, path, &[], Some(body))
            .await?
            .ok_or_else(|| AppError::Api {
                status: 204,
                message: format!("{path} returned no content"),
            })
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let body: Option<&()> = None;
        let _: Option<serde_json::Value> = self.send(Method::DELETE, path, &[], body).await?;
        Ok(())
    }

    /// Check a create/update payload's declarative constraints before
    /// it leaves the client
    fn precheck(payload: &impl Validate) -> AppResult<()> {
        payload
            .validate()
            .map_err(|e| AppError::InvalidPayload(e.to_string()))
    }

    // ---------- reference data ----------

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.get_list("/api/categories", &[]).await
    }

    pub async fn create_category(&self, payload: &CategoryCreate) -> AppResult<Category> {
        Self::precheck(payload)?;
        self.post("/api/categories", payload).await
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        payload: &CategoryCreate,
    ) -> AppResult<Category> {
        Self::precheck(payload)?;
        self.put(&format!("/api/categories/{id}"), payload).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> AppResult<()> {
        self.delete(&format!("/api/categories/{id}")).await
    }

    pub async fn materials(&self) -> AppResult<Vec<Material>> {
        self.get_list("/api/materials", &[]).await
    }

    pub async fn create_material(&self, payload: &MaterialCreate) -> AppResult<Material> {
        Self::precheck(payload)?;
        self.post("/api/materials", payload).await
    }

    pub async fn update_material(
        &self,
        id: MaterialId,
        payload: &MaterialCreate,
    ) -> AppResult<Material> {
        Self::precheck(payload)?;
        self.put(&format!("/api/materials/{id}"), payload).await
    }

    pub async fn delete_material(&self, id: MaterialId) -> AppResult<()> {
        self.delete(&format!("/api/materials/{id}")).await
    }

    pub async fn warehouses(&self) -> AppResult<Vec<Warehouse>> {
        self.get_list("/api/warehouses", &[]).await
    }

    pub async fn create_warehouse(&self, payload: &WarehouseCreate) -> AppResult<Warehouse> {
        Self::precheck(payload)?;
        self.post("/api/warehouses", payload).await
    }

    pub async fn update_warehouse(
        &self,
        id: WarehouseId,
        payload: &WarehouseCreate,
    ) -> AppResult<Warehouse> {
        Self::precheck(payload)?;
        self.put(&format!("/api/warehouses/{id}"), payload).await
    }

    pub async fn delete_warehouse(&self, id: WarehouseId) -> AppResult<()> {
        self.delete(&format!("/api/warehouses/{id}")).await
    }

    pub async fn suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.get_list("/api/suppliers", &[]).await
    }

    pub async fn create_supplier(&self, payload: &PartyCreate) -> AppResult<Supplier> {
        Self::precheck(payload)?;
        self.post("/api/suppliers", payload).await
    }

    pub async fn update_supplier(
        &self,
        id: SupplierId,
        payload: &PartyCreate,
    ) -> AppResult<Supplier> {
        Self::precheck(payload)?;
        self.put(&format!("/api/suppliers/{id}"), payload).await
    }

    pub async fn delete_supplier(&self, id: SupplierId) -> AppResult<()> {
        self.delete(&format!("/api/suppliers/{id}")).await
    }

    pub async fn clients(&self) -> AppResult<Vec<Client>> {
        self.get_list("/api/clients", &[]).await
    }

    pub async fn create_client(&self, payload: &PartyCreate) -> AppResult<Client> {
        Self::precheck(payload)?;
        self.post("/api/clients", payload).await
    }

    pub async fn update_client(&self, id: ClientId, payload: &PartyCreate) -> AppResult<Client> {
        Self::precheck(payload)?;
        self.put(&format!("/api/clients/{id}"), payload).await
    }

    pub async fn delete_client(&self, id: ClientId) -> AppResult<()> {
        self.delete(&format!("/api/clients/{id}")).await
    }

    // ---------- stock read models ----------

    pub async fn stock_current(&self) -> AppResult<Vec<StockRow>> {
        self.get_list("/api/stock/current", &[]).await
    }

    pub async fn stock_current_for(
        &self,
        warehouse_id: Option<WarehouseId>,
        material_id: Option<MaterialId>,
    ) -> AppResult<Vec<StockRow>> {
        let mut query = Vec::new();
        if let Some(id) = warehouse_id {
            query.push(("warehouse_id", id.to_string()));
        }
        if let Some(id) = material_id {
            query.push(("material_id", id.to_string()));
        }
        self.get_list("/api/stock/current", &query).await
    }

    pub async fn stock_ledger(&self, filter: &LedgerFilter) -> AppResult<Vec<LedgerEntry>> {
        let mut query = Vec::new();
        if let Some(id) = filter.warehouse_id {
            query.push(("warehouse_id", id.to_string()));
        }
        if let Some(id) = filter.material_id {
            query.push(("material_id", id.to_string()));
        }
        if let Some(movement) = filter.movement_type {
            query.push(("movement_type", movement.as_str().to_string()));
        }
        if let Some(from) = filter.date_from {
            query.push(("date_from", naive_utc(from)));
        }
        if let Some(to) = filter.date_to {
            query.push(("date_to", naive_utc(to)));
        }
        self.get_list("/api/stock-ledger", &query).await
    }

    // ---------- documents ----------

    pub async fn receipts(&self) -> AppResult<Vec<Receipt>> {
        self.get_list("/api/receipts", &[]).await
    }

    pub async fn issues(&self) -> AppResult<Vec<Issue>> {
        self.get_list("/api/issues", &[]).await
    }

    pub async fn create_receipt(&self, payload: &DocumentPayload) -> AppResult<Receipt> {
        self.post("/api/receipts", payload).await
    }

    pub async fn update_receipt(
        &self,
        id: DocumentId,
        payload: &DocumentPayload,
    ) -> AppResult<Receipt> {
        self.put(&format!("/api/receipts/{id}"), payload).await
    }

    pub async fn delete_receipt(&self, id: DocumentId) -> AppResult<()> {
        self.delete(&format!("/api/receipts/{id}")).await
    }

    pub async fn create_issue(&self, payload: &DocumentPayload) -> AppResult<Issue> {
        self.post("/api/issues", payload).await
    }

    pub async fn update_issue(&self, id: DocumentId, payload: &DocumentPayload) -> AppResult<Issue> {
        self.put(&format!("/api/issues/{id}"), payload).await
    }

    pub async fn delete_issue(&self, id: DocumentId) -> AppResult<()> {
        self.delete(&format!("/api/issues/{id}")).await
    }

    // ---------- dashboard read models ----------

    pub async fn dashboard_summary(&self) -> AppResult<DashboardSummary> {
        self.get("/api/dashboard/summary", &[]).await
    }

    pub async fn warehouse_stats(&self) -> AppResult<Vec<WarehouseStat>> {
        self.get_list("/api/dashboard/warehouse-stats", &[]).await
    }

    pub async fn low_stock_alert(&self, limit: usize) -> AppResult<Vec<LowStockAlert>> {
        self.get_list("/api/dashboard/low-stock-alert", &[("limit", limit.to_string())])
            .await
    }

    pub async fn recent_activities(&self, limit: usize) -> AppResult<Vec<RecentActivity>> {
        self.get(
            "/api/dashboard/recent-activities",
            &[("limit", limit.to_string())],
        )
        .await
    }

    pub async fn receipts_issues_timeline(
        &self,
        range: Option<&DateRange>,
        fallback_days: i64,
    ) -> AppResult<Vec<TimelinePoint>> {
        let mut query = vec![("days", fallback_days.to_string())];
        if let Some(range) = range {
            query.push(("from", range.from.to_string()));
            query.push(("to", range.to.to_string()));
        }
        self.get_list("/api/dashboard/receipts-issues-timeline", &query)
            .await
    }

    pub async fn top_materials(
        &self,
        limit: usize,
        range: Option<&DateRange>,
    ) -> AppResult<Vec<TopMaterial>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(range) = range {
            query.push(("from", range.from.to_string()));
            query.push(("to", range.to.to_string()));
        }
        self.get_list("/api/dashboard/top-materials", &query).await
    }

    /// Server-side counterparty rollup. This endpoint is not guaranteed
    /// to exist on every deployment; a 404 maps to the explicit
    /// "feature unavailable" case instead of a generic API error.
    pub async fn counterparty_report(
        &self,
        kind: CounterpartyKind,
        range: Option<&DateRange>,
        currency: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<CounterpartyRow>> {
        const PATH: &str = "/api/dashboard/counterparty-report";
        let mut query = vec![
            ("type", kind.as_str().to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(range) = range {
            query.push(("from", range.from.to_string()));
            query.push(("to", range.to.to_string()));
        }
        if let Some(currency) = currency {
            query.push(("currency", currency.to_string()));
        }
        match self.get_list(PATH, &query).await {
            Err(AppError::Api { status: 404, .. }) => Err(AppError::FeatureUnavailable {
                endpoint: PATH.to_string(),
            }),
            other => other,
        }
    }
}

/// Timestamps go out as naive UTC; the API treats unzoned values as UTC
fn naive_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}
