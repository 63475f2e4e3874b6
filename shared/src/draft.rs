//! Document draft editing logic
//!
//! A draft is the in-memory form state of a receipt or issue being created
//! or edited. Field values are kept as the raw strings the form controls
//! hold; parsing happens on demand and blank or non-numeric input is
//! treated as zero so derived totals can never fail. The external API is
//! the authority on stock effects: everything here is advisory except the
//! payload shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{
    DocumentItem, DocumentItemPayload, DocumentKind, DocumentPayload, Issue, Material, Receipt,
    StockRow,
};
use crate::types::{
    decimal_or_none, decimal_or_zero, id_or_none, DocumentId, MaterialId, WarehouseId,
    DEFAULT_CURRENCY,
};

/// Whether the draft edits a persisted document or composes a new one.
///
/// Kept as an explicit tagged union so "has a persisted identity" is a
/// matter of the type, not of a nullable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentIdentity {
    New,
    Existing(DocumentId),
}

/// One editable line of a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    pub material_id: String,
    pub warehouse_id: String,
    pub qty: String,
    pub unit_price: String,
    pub currency: String,
    pub weight: String,
    pub notes: String,
}

impl LineDraft {
    /// A fresh line with form defaults
    pub fn empty(currency: &str) -> Self {
        Self {
            material_id: String::new(),
            warehouse_id: String::new(),
            qty: "1".to_string(),
            unit_price: "0".to_string(),
            currency: currency.to_string(),
            weight: String::new(),
            notes: String::new(),
        }
    }

    fn from_item(item: &DocumentItem, document_currency: &str) -> Self {
        Self {
            material_id: item.material_id.to_string(),
            warehouse_id: item
                .warehouse_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            qty: item.qty.to_string(),
            unit_price: item.unit_price.to_string(),
            currency: if item.currency.is_empty() {
                document_currency.to_string()
            } else {
                item.currency.clone()
            },
            weight: item.weight.map(|w| w.to_string()).unwrap_or_default(),
            notes: item.notes.clone().unwrap_or_default(),
        }
    }

    /// Derived line total, recomputed from the current raw values
    pub fn total(&self) -> Decimal {
        decimal_or_zero(&self.qty) * decimal_or_zero(&self.unit_price)
    }

    /// A line the user never touched: no material and no warehouse chosen.
    /// Such lines are dropped at submit instead of being reported as
    /// incomplete.
    pub fn is_blank(&self) -> bool {
        self.material_id.trim().is_empty() && self.warehouse_id.trim().is_empty()
    }

    fn material(&self) -> Option<MaterialId> {
        id_or_none(&self.material_id)
    }

    fn warehouse(&self) -> Option<WarehouseId> {
        id_or_none(&self.warehouse_id)
    }
}

/// Shallow patch applied to one line; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePatch {
    pub material_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub qty: Option<String>,
    pub unit_price: Option<String>,
    pub currency: Option<String>,
    pub weight: Option<String>,
    pub notes: Option<String>,
}

impl LinePatch {
    pub fn warehouse(id: impl Into<String>) -> Self {
        Self {
            warehouse_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn material(id: impl Into<String>) -> Self {
        Self {
            material_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn qty(value: impl Into<String>) -> Self {
        Self {
            qty: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Document-level fields reachable through `set_field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    DocumentNumber,
    Counterparty,
    Currency,
    Notes,
}

/// Warehouse → material → available quantity, projected from the
/// current-stock snapshot. Always rebuilt from scratch; never patched.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_warehouse: HashMap<WarehouseId, HashMap<MaterialId, Decimal>>,
}

impl AvailabilityIndex {
    pub fn from_stock(rows: &[StockRow]) -> Self {
        let mut by_warehouse: HashMap<WarehouseId, HashMap<MaterialId, Decimal>> = HashMap::new();
        for row in rows {
            let entry = by_warehouse
                .entry(row.warehouse_id)
                .or_default()
                .entry(row.material_id)
                .or_insert(Decimal::ZERO);
            *entry += row.available();
        }
        Self { by_warehouse }
    }

    /// Available (quantity − reserved) for a pair, `None` if the warehouse
    /// has never stocked the material
    pub fn available(&self, warehouse: WarehouseId, material: MaterialId) -> Option<Decimal> {
        self.by_warehouse
            .get(&warehouse)
            .and_then(|m| m.get(&material))
            .copied()
    }

    /// Presence-only membership, used by the receipt-side filter
    pub fn is_stocked(&self, warehouse: WarehouseId, material: MaterialId) -> bool {
        self.available(warehouse, material).is_some()
    }

    /// Warehouses where the material can currently be issued from
    pub fn warehouses_with_available(&self, material: MaterialId) -> Vec<WarehouseId> {
        let mut out: Vec<WarehouseId> = self
            .by_warehouse
            .iter()
            .filter(|(_, stock)| {
                stock
                    .get(&material)
                    .is_some_and(|qty| *qty > Decimal::ZERO)
            })
            .map(|(wh, _)| *wh)
            .collect();
        out.sort_unstable();
        out
    }

    /// Warehouses that have ever stocked the material
    pub fn warehouses_stocking(&self, material: MaterialId) -> Vec<WarehouseId> {
        let mut out: Vec<WarehouseId> = self
            .by_warehouse
            .iter()
            .filter(|(_, stock)| stock.contains_key(&material))
            .map(|(wh, _)| *wh)
            .collect();
        out.sort_unstable();
        out
    }
}

/// A material offered by a line's material selector
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableMaterial<'a> {
    pub material: &'a Material,
    /// `None` when the chosen warehouse has never stocked it
    pub available: Option<Decimal>,
    /// Receipt-side flag: selectable, but not yet stocked here
    pub new_to_warehouse: bool,
}

/// Advisory warning raised when an issue line exceeds availability.
/// Submission is never blocked on it; the server has the final word.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityWarning {
    pub line: usize,
    pub material_id: MaterialId,
    pub warehouse_id: WarehouseId,
    pub requested: Decimal,
    pub available: Decimal,
}

/// Why a draft could not be turned into a request payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Supplier is required")]
    MissingSupplier,
    #[error("Client is required")]
    MissingClient,
    #[error("Add at least one item")]
    NoLines,
    #[error("Material, Warehouse and Qty are required (line {0})")]
    IncompleteLine(usize),
    #[error("Quantity must be greater than zero (line {0})")]
    NonPositiveQuantity(usize),
    #[error("Unit price cannot be negative (line {0})")]
    NegativePrice(usize),
}

/// In-progress receipt or issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub kind: DocumentKind,
    pub identity: DocumentIdentity,
    pub document_number: String,
    /// Raw select value of the counterparty: a supplier for receipts, a
    /// client for issues
    pub counterparty_id: String,
    pub currency: String,
    pub notes: String,
    pub lines: Vec<LineDraft>,
}

impl DocumentDraft {
    /// Fresh draft for the create flow: one empty line, default currency
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            identity: DocumentIdentity::New,
            document_number: String::new(),
            counterparty_id: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            notes: String::new(),
            lines: vec![LineDraft::empty(DEFAULT_CURRENCY)],
        }
    }

    /// Hydrate the edit flow from a persisted receipt
    pub fn from_receipt(receipt: &Receipt) -> Self {
        Self::hydrate(
            DocumentKind::Receipt,
            DocumentIdentity::Existing(receipt.id),
            &receipt.document_number,
            receipt.supplier_id,
            &receipt.currency,
            receipt.notes.as_deref(),
            &receipt.items,
        )
    }

    /// Hydrate the edit flow from a persisted issue
    pub fn from_issue(issue: &Issue) -> Self {
        Self::hydrate(
            DocumentKind::Issue,
            DocumentIdentity::Existing(issue.id),
            &issue.document_number,
            issue.client_id,
            &issue.currency,
            issue.notes.as_deref(),
            &issue.items,
        )
    }

    fn hydrate(
        kind: DocumentKind,
        identity: DocumentIdentity,
        document_number: &str,
        counterparty: Option<i64>,
        currency: &str,
        notes: Option<&str>,
        items: &[DocumentItem],
    ) -> Self {
        let currency = if currency.is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            currency.to_string()
        };
        let lines = if items.is_empty() {
            vec![LineDraft::empty(&currency)]
        } else {
            items
                .iter()
                .map(|item| LineDraft::from_item(item, &currency))
                .collect()
        };
        Self {
            kind,
            identity,
            document_number: document_number.to_string(),
            counterparty_id: counterparty.map(|id| id.to_string()).unwrap_or_default(),
            currency,
            notes: notes.unwrap_or_default().to_string(),
            lines,
        }
    }

    /// Update a document-level field. Validation is deferred to submit.
    pub fn set_field(&mut self, field: DocumentField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DocumentField::DocumentNumber => self.document_number = value,
            DocumentField::Counterparty => self.counterparty_id = value,
            DocumentField::Currency => {
                self.currency = if value.is_empty() {
                    DEFAULT_CURRENCY.to_string()
                } else {
                    value
                };
            }
            DocumentField::Notes => self.notes = value,
        }
    }

    /// Apply a patch to one line, enforcing the cross-field policy:
    ///
    /// 1. a warehouse change that invalidates the current material clears
    ///    the material (issues also reset the price);
    /// 2. choosing a material with no warehouse picked auto-selects the
    ///    only warehouse it is available on;
    /// 3. choosing a material on an issue pre-fills the unit price from
    ///    the material's reference price.
    pub fn set_line_field(
        &mut self,
        index: usize,
        patch: LinePatch,
        materials: &[Material],
        availability: &AvailabilityIndex,
    ) {
        let Some(line) = self.lines.get(index) else {
            return;
        };
        let mut patch = patch;

        if self.kind == DocumentKind::Issue {
            if let Some(new_wh) = patch
                .warehouse_id
                .as_deref()
                .filter(|wh| *wh != line.warehouse_id)
            {
                let still_valid = match (id_or_none(new_wh), line.material()) {
                    (Some(wh), Some(mat)) => availability
                        .available(wh, mat)
                        .is_some_and(|qty| qty > Decimal::ZERO),
                    (_, None) => true,
                    (None, Some(_)) => false,
                };
                if !still_valid {
                    patch.material_id = Some(String::new());
                    patch.unit_price = Some("0".to_string());
                }
            }
        }

        if let Some(mat) = patch.material_id.as_deref().and_then(id_or_none) {
            let warehouse_pending = patch
                .warehouse_id
                .as_deref()
                .unwrap_or(&line.warehouse_id)
                .trim()
                .is_empty();
            if warehouse_pending {
                let candidates = match self.kind {
                    DocumentKind::Issue => availability.warehouses_with_available(mat),
                    DocumentKind::Receipt => availability.warehouses_stocking(mat),
                };
                if let [only] = candidates.as_slice() {
                    patch.warehouse_id = Some(only.to_string());
                }
            }

            if self.kind == DocumentKind::Issue && patch.unit_price.is_none() {
                if let Some(material) = materials.iter().find(|m| m.id == mat) {
                    patch.unit_price = Some(material.price.to_string());
                }
            }
        }

        let line = &mut self.lines[index];
        if let Some(v) = patch.material_id {
            line.material_id = v;
        }
        if let Some(v) = patch.warehouse_id {
            line.warehouse_id = v;
        }
        if let Some(v) = patch.qty {
            line.qty = v;
        }
        if let Some(v) = patch.unit_price {
            line.unit_price = v;
        }
        if let Some(v) = patch.currency {
            line.currency = if v.is_empty() {
                self.currency.clone()
            } else {
                v
            };
        }
        if let Some(v) = patch.weight {
            line.weight = v;
        }
        if let Some(v) = patch.notes {
            line.notes = v;
        }
    }

    /// Append a new line defaulted to the document currency
    pub fn add_line(&mut self) {
        self.lines.push(LineDraft::empty(&self.currency));
    }

    /// Remove one line; the one-line minimum is only enforced at submit
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Document total: Σ qty × price over all lines, blanks as zero
    pub fn compute_total(&self) -> Decimal {
        self.lines.iter().map(LineDraft::total).sum()
    }

    /// Materials the given line's selector should offer.
    ///
    /// Issues list only materials with available quantity > 0 on the
    /// chosen warehouse, but the line's current selection is always kept
    /// so it cannot silently vanish from its own selector. Receipts list
    /// every material; ones the warehouse has never stocked are flagged
    /// as new to it.
    ///
    /// A selection whose id no longer resolves in `materials` (stale
    /// reference data) cannot be rendered and is absent from the
    /// selector, but the line keeps its raw value and still submits.
    pub fn selectable_materials<'a>(
        &self,
        index: usize,
        materials: &'a [Material],
        availability: &AvailabilityIndex,
    ) -> Vec<SelectableMaterial<'a>> {
        let Some(line) = self.lines.get(index) else {
            return Vec::new();
        };
        let warehouse = line.warehouse();
        let selected = line.material();

        match self.kind {
            DocumentKind::Issue => {
                let Some(wh) = warehouse else {
                    // The material selector stays disabled until a
                    // warehouse is picked.
                    return Vec::new();
                };
                let mut out = Vec::new();
                if let Some(current) = selected {
                    if let Some(material) = materials.iter().find(|m| m.id == current) {
                        out.push(SelectableMaterial {
                            material,
                            available: Some(
                                availability.available(wh, current).unwrap_or(Decimal::ZERO),
                            ),
                            new_to_warehouse: false,
                        });
                    }
                }
                for material in materials {
                    if Some(material.id) == selected {
                        continue;
                    }
                    if let Some(qty) = availability.available(wh, material.id) {
                        if qty > Decimal::ZERO {
                            out.push(SelectableMaterial {
                                material,
                                available: Some(qty),
                                new_to_warehouse: false,
                            });
                        }
                    }
                }
                out
            }
            DocumentKind::Receipt => materials
                .iter()
                .map(|material| {
                    let available = warehouse.and_then(|wh| availability.available(wh, material.id));
                    SelectableMaterial {
                        material,
                        available,
                        new_to_warehouse: warehouse.is_some() && available.is_none(),
                    }
                })
                .collect(),
        }
    }

    /// Advisory warnings for issue lines whose quantity exceeds what the
    /// warehouse can currently provide
    pub fn availability_warnings(&self, availability: &AvailabilityIndex) -> Vec<AvailabilityWarning> {
        if self.kind != DocumentKind::Issue {
            return Vec::new();
        }
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let material_id = line.material()?;
                let warehouse_id = line.warehouse()?;
                let requested = decimal_or_none(&line.qty)?;
                let available = availability
                    .available(warehouse_id, material_id)
                    .unwrap_or(Decimal::ZERO);
                (requested > available).then_some(AvailabilityWarning {
                    line: i,
                    material_id,
                    warehouse_id,
                    requested,
                    available,
                })
            })
            .collect()
    }

    /// Map the draft into the external API's create/update body.
    ///
    /// Wholly blank lines are dropped; partially filled ones are an
    /// error. The counterparty and at least one complete line are
    /// required; the document number is not.
    pub fn build_payload(&self) -> Result<DocumentPayload, DraftError> {
        let counterparty = id_or_none(&self.counterparty_id).ok_or(match self.kind {
            DocumentKind::Receipt => DraftError::MissingSupplier,
            DocumentKind::Issue => DraftError::MissingClient,
        })?;

        let mut items = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if line.is_blank() {
                continue;
            }
            let material_id = line.material().ok_or(DraftError::IncompleteLine(i))?;
            let warehouse_id = line.warehouse().ok_or(DraftError::IncompleteLine(i))?;
            let qty = decimal_or_none(&line.qty).ok_or(DraftError::IncompleteLine(i))?;
            if qty <= Decimal::ZERO {
                return Err(DraftError::NonPositiveQuantity(i));
            }
            let unit_price = decimal_or_zero(&line.unit_price);
            if unit_price < Decimal::ZERO {
                return Err(DraftError::NegativePrice(i));
            }
            items.push(DocumentItemPayload {
                material_id,
                warehouse_id: Some(warehouse_id),
                qty,
                unit_price,
                currency: if line.currency.is_empty() {
                    self.currency.clone()
                } else {
                    line.currency.clone()
                },
                weight: decimal_or_none(&line.weight),
                notes: if line.notes.trim().is_empty() {
                    None
                } else {
                    Some(line.notes.clone())
                },
            });
        }
        if items.is_empty() {
            return Err(DraftError::NoLines);
        }

        let (supplier_id, client_id) = match self.kind {
            DocumentKind::Receipt => (Some(counterparty), None),
            DocumentKind::Issue => (None, Some(counterparty)),
        };
        Ok(DocumentPayload {
            document_number: if self.document_number.trim().is_empty() {
                None
            } else {
                Some(self.document_number.clone())
            },
            supplier_id,
            client_id,
            currency: self.currency.clone(),
            notes: if self.notes.trim().is_empty() {
                None
            } else {
                Some(self.notes.clone())
            },
            items,
        })
    }
}
