//! # gomarket-core: Pure Cart Logic
//!
//! This crate is the pure half of the GoMarketplace cart. It knows what a cart
//! line item is, how the three cart mutations change a list of them, and how
//! the list looks on the wire. It never touches storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile Storefront UI                           │   │
//! │  │    Product List ──► Cart Screen ──► (+) / (-) buttons          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ get_cart / add_to_cart / ...           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            apps/storefront (CartProvider → CartStore)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gomarket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   error   │  │ validation│  │   │
//! │  │   │ CartItem  │  │   Cart    │  │ CoreError │  │   rules   │  │   │
//! │  │   │NewCartItem│  │  to_json  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               gomarket-db (DurableKv: SQLite, memory)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `CartItem` and `NewCartItem`
//! - [`cart`] - The `Cart` list, its mutations and its JSON codec
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks for `add_to_cart`
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, NewCartItem};
//!
//! let mut cart = Cart::new();
//! cart.add(NewCartItem::new("p-1", "Coffee", "https://img/coffee.png", 12.5));
//! cart.increment("p-1");
//!
//! let json = cart.to_json().unwrap();
//! let reloaded = Cart::from_json(&json).unwrap();
//! assert_eq!(reloaded.find("p-1").map(|i| i.quantity), Some(2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, MutationOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::{CartItem, NewCartItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Durable storage key the whole cart is written under.
///
/// ## Why this exact string?
/// Installed apps already hold carts under this key. Changing it would
/// silently empty every existing cart on upgrade.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

/// Quantity a product starts with when first added.
pub const INITIAL_QUANTITY: i64 = 1;
