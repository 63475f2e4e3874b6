//! Reference-data payload tests
//!
//! The create/update payloads carry declarative constraints mirroring
//! the backend's column limits; the client checks them before a request
//! ever leaves the machine.

use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use shared::models::{CategoryCreate, MaterialCreate, PartyCreate, WarehouseCreate};
use warehouse_console::config::{ApiConfig, AuthConfig};
use warehouse_console::{ApiClient, AppError, TokenClient};

fn material_create(code: &str, currency: &str) -> MaterialCreate {
    MaterialCreate {
        code: code.to_string(),
        name: "Copper wire".to_string(),
        unit: "m".to_string(),
        weight_per_unit: None,
        description: None,
        price: Decimal::new(125, 1),
        currency: currency.to_string(),
        min_stock: Decimal::ZERO,
        category_id: None,
        is_active: true,
    }
}

#[test]
fn category_name_is_required() {
    let blank = CategoryCreate {
        name: String::new(),
        description: None,
    };
    assert!(blank.validate().is_err());

    let ok = CategoryCreate {
        name: "Fasteners".to_string(),
        description: Some("Bolts, nuts, washers".to_string()),
    };
    assert!(ok.validate().is_ok());
}

#[test]
fn material_currency_must_be_three_characters() {
    assert!(material_create("CU-01", "UAH").validate().is_ok());
    assert!(material_create("CU-01", "HRYVNIA").validate().is_err());
    assert!(material_create("", "UAH").validate().is_err());
}

#[test]
fn warehouse_and_party_names_are_bounded() {
    let warehouse = WarehouseCreate {
        name: "Central".to_string(),
        address: None,
        manager_name: Some("x".repeat(300)),
        capacity: None,
        capacity_unit: None,
    };
    assert!(warehouse.validate().is_err());

    let party = PartyCreate {
        name: "Postach LLC".to_string(),
        contact_info: None,
    };
    assert!(party.validate().is_ok());
}

/// An invalid payload is rejected client-side; no token is fetched and
/// no request is sent (the endpoints here are unroutable on purpose)
#[tokio::test]
async fn invalid_create_payload_never_leaves_the_client() {
    let auth = TokenClient::new(AuthConfig {
        token_url: "http://127.0.0.1:1/oauth/token".to_string(),
        client_id: "console".to_string(),
        client_secret: "secret".to_string(),
        audience: "inventory-api".to_string(),
        claims_namespace: "https://warehouse-console/".to_string(),
    });
    let api = ApiClient::new(
        &ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
        },
        Arc::new(auth),
    )
    .unwrap();

    let result = api.create_material(&material_create("CU-01", "HRYVNIA")).await;
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}
