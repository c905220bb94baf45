//! # Cart Commands
//!
//! Commands for reading and changing the cart.
//!
//! ## Cart Screen Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Screen                                          │
//! │                                                                         │
//! │  Product list ── "Add" ──► add_to_cart(item)   ──► qty 1 (or as is)    │
//! │                                                                         │
//! │  Cart row ────── (+) ────► increment(id)       ──► qty + 1             │
//! │           ────── (-) ────► decrement(id)       ──► qty - 1             │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                           qty 0 → row disappears       │
//! │                                                                         │
//! │  Screen open ────────────► get_cart()          ──► (read only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use gomarket_core::{CartItem, MutationOutcome, NewCartItem};

use crate::error::ApiError;
use crate::state::CartProvider;

/// Cart response: the lines after the call, plus what the call did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<MutationOutcome>,
}

impl CartResponse {
    fn new(items: Vec<CartItem>, outcome: Option<MutationOutcome>) -> Self {
        CartResponse { items, outcome }
    }
}

/// Gets the current cart contents.
pub fn get_cart(provider: &CartProvider) -> Result<CartResponse, ApiError> {
    debug!("get_cart command");

    let cart = provider.use_cart()?;
    Ok(CartResponse::new(cart.products()?, None))
}

/// Adds a product to the cart at quantity 1.
///
/// ## Behavior
/// - Not in cart: appended with quantity 1
/// - Already in cart: left unchanged (`outcome.status == "already_in_cart"`)
pub async fn add_to_cart(
    provider: &CartProvider,
    item: NewCartItem,
) -> Result<CartResponse, ApiError> {
    debug!(id = %item.id, "add_to_cart command");

    let cart = provider.use_cart()?;
    let outcome = cart.add_to_cart(item).await?;

    Ok(CartResponse::new(cart.products()?, Some(outcome)))
}

/// Raises a line's quantity by one.
///
/// ## Arguments
/// * `id` - Product id of the cart line; unknown ids return `not_found`
pub async fn increment(provider: &CartProvider, id: String) -> Result<CartResponse, ApiError> {
    debug!(id = %id, "increment command");

    let cart = provider.use_cart()?;
    let outcome = cart.increment(&id).await?;

    Ok(CartResponse::new(cart.products()?, Some(outcome)))
}

/// Lowers a line's quantity by one. The line is gone from the response once
/// it reaches zero.
pub async fn decrement(provider: &CartProvider, id: String) -> Result<CartResponse, ApiError> {
    debug!(id = %id, "decrement command");

    let cart = provider.use_cart()?;
    let outcome = cart.decrement(&id).await?;

    Ok(CartResponse::new(cart.products()?, Some(outcome)))
}
