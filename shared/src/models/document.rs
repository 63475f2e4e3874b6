//! Inventory document models: receipts (inbound) and issues (outbound)
//!
//! The external API owns `total_amount` and every stock effect; these types
//! only describe what the console reads back and what it submits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{
    lenient_datetime, ClientId, DocumentId, MaterialId, SupplierId, WarehouseId,
};

/// Which side of the warehouse a document moves goods on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Inbound from a supplier
    Receipt,
    /// Outbound to a client
    Issue,
}

/// One persisted line of a receipt or issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: DocumentId,
    pub material_id: MaterialId,
    pub warehouse_id: Option<WarehouseId>,
    pub qty: Decimal,
    pub unit_price: Decimal,
    pub currency: String,
    /// Computed server-side
    pub total_price: Decimal,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
}

/// A persisted receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: DocumentId,
    pub document_number: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub supplier_id: Option<SupplierId>,
    pub currency: String,
    /// Computed server-side
    pub total_amount: Decimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<DocumentItem>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A persisted issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: DocumentId,
    pub document_number: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub client_id: Option<ClientId>,
    pub currency: String,
    /// Computed server-side
    pub total_amount: Decimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<DocumentItem>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One line of a create/update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DocumentItemPayload {
    pub material_id: MaterialId,
    pub warehouse_id: Option<WarehouseId>,
    pub qty: Decimal,
    pub unit_price: Decimal,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    pub weight: Option<Decimal>,
    pub notes: Option<String>,
}

/// Create/update request body for either document kind. The counterparty
/// field submitted depends on the kind: `supplier_id` for receipts,
/// `client_id` for issues, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DocumentPayload {
    #[validate(length(max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemPayload>,
}
