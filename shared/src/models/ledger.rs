//! Stock ledger models
//!
//! Ledger entries are immutable, server-generated records of single
//! quantity changes. The console only ever reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{lenient_datetime, MaterialId, WarehouseId};

/// Kinds of inventory movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Receipt,
    Issue,
    Adjustment,
    Transfer,
    Reservation,
    ReleaseReservation,
    Return,
}

impl MovementType {
    /// Value used in the `movement_type` query filter
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "receipt",
            MovementType::Issue => "issue",
            MovementType::Adjustment => "adjustment",
            MovementType::Transfer => "transfer",
            MovementType::Reservation => "reservation",
            MovementType::ReleaseReservation => "release_reservation",
            MovementType::Return => "return",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `/api/stock-ledger` read model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date_time: Option<DateTime<Utc>>,
    pub warehouse_id: WarehouseId,
    pub material_id: MaterialId,
    pub movement_type: MovementType,
    /// Signed: negative for outbound movements
    pub qty_change: Decimal,
    pub unit_price: Option<Decimal>,
    pub currency: Option<String>,
    pub total_price: Option<Decimal>,
    pub reference_doc_type: Option<String>,
    pub reference_doc_id: Option<i64>,
    pub remarks: Option<String>,
}

/// Query filters accepted by the ledger endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgerFilter {
    pub warehouse_id: Option<WarehouseId>,
    pub material_id: Option<MaterialId>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl LedgerFilter {
    pub fn issues() -> Self {
        Self {
            movement_type: Some(MovementType::Issue),
            ..Self::default()
        }
    }

    /// Restrict to entries at or after `cutoff`
    pub fn since(mut self, cutoff: DateTime<Utc>) -> Self {
        self.date_from = Some(cutoff);
        self
    }
}
