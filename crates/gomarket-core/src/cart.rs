//! # Cart
//!
//! The ordered list of cart lines and the three mutations the UI can apply.
//!
//! ## Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Mutations                                    │
//! │                                                                         │
//! │  add(item)        id absent  ──► push { ..item, quantity: 1 }           │
//! │                   id present ──► list unchanged (no increment)          │
//! │                                                                         │
//! │  increment(id)    found      ──► quantity += 1                          │
//! │                   not found  ──► no-op                                  │
//! │                                                                         │
//! │  decrement(id)    found      ──► quantity -= 1 (no floor)               │
//! │                   not found  ──► no-op                                  │
//! │                                                                         │
//! │  Loading from storage is the only place lines are dropped:             │
//! │  from_json() keeps quantity > 0 and the first line per id.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping eviction in one place means "is this item still in the cart"
//! has a single answer: whatever the last load produced.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{CartItem, NewCartItem};

// =============================================================================
// Mutation Outcome
// =============================================================================

/// What a cart mutation did to the in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// A new line was appended at quantity 1.
    Added,
    /// The id was already in the cart; the list is unchanged.
    AlreadyInCart,
    /// The line's quantity changed to `quantity`.
    Updated { quantity: i64 },
    /// No line has this id; nothing changed.
    NotFound,
}

impl MutationOutcome {
    /// Whether the list needs to be written back to storage.
    ///
    /// `AlreadyInCart` still writes: `add_to_cart` always commits and
    /// resynchronizes, even when the line was already there.
    pub fn needs_commit(&self) -> bool {
        !matches!(self, MutationOutcome::NotFound)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `id`
/// - Order is insertion order of the first add
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Wraps an already-committed list.
    ///
    /// The list is taken as is; use [`Cart::from_stored`] for anything read
    /// back from storage.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Cart { items }
    }

    /// Builds a cart from lines read out of storage.
    ///
    /// Drops every line with `quantity <= 0` and every repeated `id` after
    /// its first occurrence.
    pub fn from_stored(items: Vec<CartItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(CartItem::is_in_cart)
            .filter(|item| seen.insert(item.id.clone()))
            .collect();

        Cart { items }
    }

    /// Decodes the stored JSON array and applies the load filter.
    ///
    /// ## Errors
    /// `CoreError::CorruptState` when the payload is not an array of items.
    pub fn from_json(payload: &str) -> CoreResult<Self> {
        let items: Vec<CartItem> =
            serde_json::from_str(payload).map_err(|e| CoreError::corrupt(e.to_string()))?;

        Ok(Cart::from_stored(items))
    }

    /// Encodes the full list, zero-quantity lines included, as a JSON array.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(&self.items).map_err(|e| CoreError::Encode(e.to_string()))
    }

    /// Adds a catalog item at quantity 1 unless its id is already present.
    pub fn add(&mut self, item: NewCartItem) -> MutationOutcome {
        if self.contains(&item.id) {
            return MutationOutcome::AlreadyInCart;
        }

        self.items.push(CartItem::from_new(item));
        MutationOutcome::Added
    }

    /// Raises the quantity of `id` by one, stopping at `i64::MAX`.
    pub fn increment(&mut self, id: &str) -> MutationOutcome {
        self.adjust(id, 1)
    }

    /// Lowers the quantity of `id` by one. The line stays until the next load.
    pub fn decrement(&mut self, id: &str) -> MutationOutcome {
        self.adjust(id, -1)
    }

    fn adjust(&mut self, id: &str, delta: i64) -> MutationOutcome {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(delta);
                MutationOutcome::Updated {
                    quantity: item.quantity,
                }
            }
            None => MutationOutcome::NotFound,
        }
    }

    /// Looks up a line by id.
    pub fn find(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Checks whether a line with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns the lines in order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the cart, returning its lines.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
