//! # State Module
//!
//! Cart state for the storefront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌───────────────────────────────────────┐ │
//! │  │   CartConfig     │──────► │   CartProvider                        │ │
//! │  │  storage_key     │        │   Option<Arc<CartStore>>              │ │
//! │  │  database_path   │        │   init task                           │ │
//! │  │  on_corrupt      │        └───────────────┬───────────────────────┘ │
//! │  └──────────────────┘                        │ use_cart()              │
//! │                                              ▼                         │
//! │                              ┌───────────────────────────────────────┐ │
//! │                              │   CartHandle (Weak<CartStore>)        │ │
//! │                              └───────────────┬───────────────────────┘ │
//! │                                              ▼                         │
//! │                              ┌───────────────────────────────────────┐ │
//! │                              │   CartStore                           │ │
//! │                              │   watch<Vec<CartItem>> + write lock   │ │
//! │                              │   Arc<dyn DurableKv>                  │ │
//! │                              └───────────────────────────────────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Reads clone the latest list out of the watch channel                │
//! │  • Loads and mutations take the store's tokio Mutex, one at a time     │
//! │  • CartConfig is read-only after mount                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod provider;

pub use cart::CartStore;
pub use config::{CartConfig, CorruptStatePolicy};
pub use provider::{CartHandle, CartProvider};
