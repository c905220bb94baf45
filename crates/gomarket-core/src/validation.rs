//! # Validation Module
//!
//! Input checks for items entering the cart.
//!
//! The cart treats item fields as opaque. The one thing it cannot accept is
//! a price that JSON has no number for: `serde_json` writes NaN and infinity
//! as `null`, and the next load would reject the whole stored cart.

use crate::error::ValidationError;
use crate::types::NewCartItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use gomarket_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(9.99).is_ok());
/// assert!(validate_unit_price(f64::NAN).is_err());
/// ```
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NonFinitePrice {
            field: "price".to_string(),
            value: price,
        });
    }

    Ok(())
}

/// Validates an item before it is added to the cart.
pub fn validate_new_item(item: &NewCartItem) -> ValidationResult<()> {
    validate_unit_price(item.unit_price)
}
