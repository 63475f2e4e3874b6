//! Current-stock projection models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{lenient_datetime, MaterialId, WarehouseId};
use crate::validation::is_low_stock;

use super::Material;

/// One row of the `/api/stock/current` read model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub id: i64,
    pub warehouse_id: WarehouseId,
    pub material_id: MaterialId,
    pub quantity: Decimal,
    pub reserved_quantity: Decimal,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl StockRow {
    /// Quantity actually usable for new issues
    pub fn available(&self) -> Decimal {
        self.quantity - self.reserved_quantity
    }
}

/// A material whose available quantity has fallen below its minimum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockRow {
    pub material_id: MaterialId,
    pub code: String,
    pub name: String,
    pub min_stock: Decimal,
    pub warehouse_id: WarehouseId,
    pub quantity: Decimal,
    pub available: Decimal,
}

/// Client-side low-stock projection over the current-stock snapshot,
/// most depleted first. Rows whose material does not resolve in the
/// reference data are skipped.
pub fn low_stock_rows(stock: &[StockRow], materials: &[Material]) -> Vec<LowStockRow> {
    let mut out: Vec<LowStockRow> = stock
        .iter()
        .filter_map(|row| {
            let material = materials.iter().find(|m| m.id == row.material_id)?;
            let available = row.available();
            is_low_stock(available, material.min_stock).then(|| LowStockRow {
                material_id: row.material_id,
                code: material.code.clone(),
                name: material.name.clone(),
                min_stock: material.min_stock,
                warehouse_id: row.warehouse_id,
                quantity: row.quantity,
                available,
            })
        })
        .collect();
    out.sort_by(|a, b| a.available.cmp(&b.available));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(warehouse_id: i64, material_id: i64, qty: &str, reserved: &str) -> StockRow {
        StockRow {
            id: warehouse_id * 1000 + material_id,
            warehouse_id,
            material_id,
            quantity: dec(qty),
            reserved_quantity: dec(reserved),
            last_updated: None,
        }
    }

    fn material(id: i64, min_stock: &str) -> Material {
        Material {
            id,
            code: format!("MAT-{id}"),
            name: format!("Material {id}"),
            unit: "kg".to_string(),
            weight_per_unit: None,
            description: None,
            price: Decimal::ZERO,
            currency: "UAH".to_string(),
            min_stock: dec(min_stock),
            category_id: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn reservations_count_against_the_minimum() {
        let materials = vec![material(1, "10"), material(2, "10")];
        let rows = low_stock_rows(
            &[
                row(1, 1, "12", "5"), // available 7, below minimum
                row(1, 2, "12", "0"), // available 12, fine
            ],
            &materials,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].material_id, 1);
        assert_eq!(rows[0].available, dec("7"));
    }

    #[test]
    fn most_depleted_rows_come_first() {
        let materials = vec![material(1, "100"), material(2, "100")];
        let rows = low_stock_rows(&[row(1, 1, "60", "0"), row(1, 2, "5", "0")], &materials);
        assert_eq!(rows[0].material_id, 2);
        assert_eq!(rows[1].material_id, 1);
    }

    #[test]
    fn unresolved_materials_are_skipped() {
        let rows = low_stock_rows(&[row(1, 99, "0", "0")], &[material(1, "10")]);
        assert!(rows.is_empty());
    }
}
