//! # Commands Module
//!
//! The calls the storefront UI makes against the cart.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! └── cart.rs     ◄─── get_cart, add_to_cart, increment, decrement
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  const { items } = await cart.increment('p-1');                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  async fn increment(                                                    │
//! │      provider: &CartProvider,  ◄── The mounted cart scope              │
//! │      id: String,               ◄── From the call                       │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  UI receives: { items: [...], outcome: { status: "updated", ... } }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command resolves the cart through `CartProvider::use_cart`, so a
//! call made with nothing mounted comes back as a `USAGE_ERROR`.

pub mod cart;

pub use cart::{add_to_cart, decrement, get_cart, increment, CartResponse};
