//! Reference-data models: categories, materials, warehouses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{lenient_datetime, CategoryId, MaterialId, WarehouseId};

/// A material category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
}

/// A stocked material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub weight_per_unit: Option<Decimal>,
    pub description: Option<String>,
    /// Reference price, used to pre-fill issue line prices
    pub price: Decimal,
    pub currency: String,
    pub min_stock: Decimal,
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MaterialCreate {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
    pub weight_per_unit: Option<Decimal>,
    pub description: Option<String>,
    pub price: Decimal,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    pub min_stock: Decimal,
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
}

/// A warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub address: Option<String>,
    pub manager_name: Option<String>,
    pub capacity: Option<Decimal>,
    pub capacity_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WarehouseCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(max = 200))]
    pub manager_name: Option<String>,
    pub capacity: Option<Decimal>,
    #[validate(length(max = 32))]
    pub capacity_unit: Option<String>,
}
