//! Validation utilities for the Warehouse Operations Console
//!
//! Client-side checks are a convenience; the external API re-validates
//! everything and its rejection is authoritative.

use rust_decimal::Decimal;

/// Validate an ISO 4217-style currency code (3 uppercase ASCII letters)
pub fn validate_currency_code(code: &str) -> Result<(), &'static str> {
    if code.len() != 3 {
        return Err("Currency code must be exactly 3 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err("Currency code must be uppercase letters");
    }
    Ok(())
}

/// Validate a free-text document number against the API's column limit
pub fn validate_document_number(number: &str) -> Result<(), &'static str> {
    if number.len() > 100 {
        return Err("Document number must be at most 100 characters");
    }
    Ok(())
}

/// Validate an issued/received quantity
pub fn validate_quantity(qty: Decimal) -> Result<(), &'static str> {
    if qty <= Decimal::ZERO {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate a unit price
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Whether a (warehouse, material) pair should raise a low-stock alert
pub fn is_low_stock(available: Decimal, min_stock: Decimal) -> bool {
    available < min_stock
}

/// available / min_stock as a percentage, clamped to 0..=100
pub fn fill_rate(available: Decimal, min_stock: Decimal) -> f64 {
    if min_stock <= Decimal::ZERO {
        return 0.0;
    }
    let rate = (available / min_stock * Decimal::from(100))
        .try_into()
        .unwrap_or(0.0f64);
    rate.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn currency_codes() {
        assert!(validate_currency_code("UAH").is_ok());
        assert!(validate_currency_code("uah").is_err());
        assert!(validate_currency_code("UAHX").is_err());
        assert!(validate_currency_code("").is_err());
    }

    #[test]
    fn quantities_and_prices() {
        assert!(validate_quantity(dec("0.0001")).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(dec("-1")).is_err());
    }

    #[test]
    fn fill_rate_is_clamped() {
        assert_eq!(fill_rate(dec("5"), dec("10")), 50.0);
        assert_eq!(fill_rate(dec("30"), dec("10")), 100.0);
        assert_eq!(fill_rate(dec("5"), Decimal::ZERO), 0.0);
    }
}
