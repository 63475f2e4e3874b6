//! WebAssembly module for the Warehouse Operations Console
//!
//! Provides client-side computation for the browser views:
//! - Draft line and document totals
//! - Payload assembly and validation before submit
//! - Availability lookups against the current stock snapshot
//!
//! All real logic lives in the `shared` crate; this layer only adapts
//! it to JSON-over-JsValue calling conventions.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::draft::{AvailabilityIndex, DocumentDraft};
use shared::models::{low_stock_rows, Material, StockRow};
use shared::types::{decimal_or_zero, format_money};
use shared::validation::{is_low_stock, validate_currency_code};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Total of one draft line from its raw input strings. Unparsable
/// input counts as zero, never NaN.
#[wasm_bindgen]
pub fn compute_line_total(quantity: &str, unit_price: &str) -> f64 {
    let total = decimal_or_zero(quantity) * decimal_or_zero(unit_price);
    total.to_string().parse().unwrap_or(0.0)
}

/// Total of a whole document draft (JSON-serialized `DocumentDraft`)
#[wasm_bindgen]
pub fn compute_document_total(draft_json: &str) -> Result<f64, JsValue> {
    let draft: DocumentDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;
    Ok(draft.compute_total().to_string().parse().unwrap_or(0.0))
}

/// Build the submit payload from a draft. Returns the payload as JSON,
/// or the first validation failure as an error string.
#[wasm_bindgen]
pub fn build_document_payload(draft_json: &str) -> Result<String, JsValue> {
    let draft: DocumentDraft = serde_json::from_str(draft_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid draft JSON: {}", e)))?;
    let payload = draft
        .build_payload()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&payload)
        .map_err(|e| JsValue::from_str(&format!("Payload serialization error: {}", e)))
}

/// Available quantity of one material on one warehouse, from the
/// current stock snapshot (JSON array of stock rows)
#[wasm_bindgen]
pub fn available_quantity(
    stock_json: &str,
    warehouse_id: i64,
    material_id: i64,
) -> Result<f64, JsValue> {
    let rows: Vec<StockRow> = serde_json::from_str(stock_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid stock JSON: {}", e)))?;
    let index = AvailabilityIndex::from_stock(&rows);
    Ok(index
        .available(warehouse_id, material_id)
        .unwrap_or(Decimal::ZERO)
        .to_string()
        .parse()
        .unwrap_or(0.0))
}

/// Low-stock rows projected from the stock snapshot and the material
/// reference data, as JSON, most depleted first
#[wasm_bindgen]
pub fn project_low_stock(stock_json: &str, materials_json: &str) -> Result<String, JsValue> {
    let stock: Vec<StockRow> = serde_json::from_str(stock_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid stock JSON: {}", e)))?;
    let materials: Vec<Material> = serde_json::from_str(materials_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid materials JSON: {}", e)))?;
    serde_json::to_string(&low_stock_rows(&stock, &materials))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Whether an available quantity is below the material's minimum
#[wasm_bindgen]
pub fn check_low_stock(available: f64, min_stock: f64) -> bool {
    let available = Decimal::try_from(available).unwrap_or(Decimal::ZERO);
    let min_stock = Decimal::try_from(min_stock).unwrap_or(Decimal::ZERO);
    is_low_stock(available, min_stock)
}

/// Validate a currency code the way the submit path will
#[wasm_bindgen]
pub fn is_valid_currency(code: &str) -> bool {
    validate_currency_code(code).is_ok()
}

/// Format a raw amount string as money with two decimal places
#[wasm_bindgen]
pub fn format_amount(raw: &str) -> String {
    format_money(decimal_or_zero(raw))
}
