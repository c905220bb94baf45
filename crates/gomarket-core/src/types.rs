//! # Domain Types
//!
//! The cart has exactly one entity: the line item.
//!
//! ## Wire Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartItem: Rust vs. Wire                              │
//! │                                                                         │
//! │   Rust field        Wire key        Type                                │
//! │   ──────────        ────────        ────                                │
//! │   id                "id"            string (opaque, caller supplied)    │
//! │   title             "title"         string                              │
//! │   image_url         "image_url"     string                              │
//! │   unit_price        "price"         number                              │
//! │   quantity          "quantity"      integer                             │
//! │                                                                         │
//! │   Wire keys are fixed. Renaming a Rust field must never rename a key.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::INITIAL_QUANTITY;

// =============================================================================
// Cart Item
// =============================================================================

/// One product entry in the cart together with its quantity.
///
/// ## Design Notes
/// - `unit_price` is opaque to the cart: no currency, no rounding, no totals.
/// - `quantity` is not clamped. A value `<= 0` means "removed" and is
///   dropped the next time the list is loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Product identifier, stable per catalog product.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image location.
    pub image_url: String,

    /// Unit price as given by the catalog.
    #[serde(rename = "price")]
    pub unit_price: f64,

    /// Count of this product in the cart.
    #[ts(type = "number")]
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart line from a catalog item at the initial quantity.
    pub fn from_new(item: NewCartItem) -> Self {
        CartItem {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            unit_price: item.unit_price,
            quantity: INITIAL_QUANTITY,
        }
    }

    /// Whether this line still counts as being in the cart.
    #[inline]
    pub fn is_in_cart(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// New Cart Item
// =============================================================================

/// A cart item without a quantity: what the UI hands to `add_to_cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(rename = "price")]
    pub unit_price: f64,
}

impl NewCartItem {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        NewCartItem {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            unit_price,
        }
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        CartItem::from_new(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_item_starts_at_one() {
        let item = CartItem::from_new(NewCartItem::new("p-1", "Tea", "img", 3.5));
        assert_eq!(item.quantity, 1);
        assert!(item.is_in_cart());
    }

    #[test]
    fn test_wire_field_names() {
        let item = CartItem {
            id: "p-1".to_string(),
            title: "Tea".to_string(),
            image_url: "https://img/tea.png".to_string(),
            unit_price: 3.5,
            quantity: 2,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p-1",
                "title": "Tea",
                "image_url": "https://img/tea.png",
                "price": 3.5,
                "quantity": 2
            })
        );
    }

    #[test]
    fn test_zero_and_negative_are_not_in_cart() {
        let mut item = CartItem::from_new(NewCartItem::new("p-1", "Tea", "img", 3.5));
        item.quantity = 0;
        assert!(!item.is_in_cart());
        item.quantity = -1;
        assert!(!item.is_in_cart());
    }
}
