//! # gomarket-db: Durable Storage for the Cart
//!
//! The cart persists into an asynchronous, string-keyed, string-valued store.
//! This crate defines that seam ([`DurableKv`]) and ships two backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Data Flow                                 │
//! │                                                                         │
//! │  CartStore (storefront)                                                │
//! │       │  set(key, json) / get(key)                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   gomarket-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   DurableKv   │    │   SqliteKv    │    │   MemoryKv   │  │   │
//! │  │   │   (trait)     │◄───│  kv_store     │    │  HashMap     │  │   │
//! │  │   │               │◄───┼───────────────┼────│  (tests/dev) │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                        ┌───────▼───────┐                        │   │
//! │  │                        │   Database    │ pool + migrations      │   │
//! │  │                        └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`kv`] - The `DurableKv` trait and its backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_db::{Database, DbConfig, DurableKv};
//!
//! let db = Database::new(DbConfig::new("path/to/cart.db")).await?;
//! let kv = db.kv();
//!
//! kv.set("@GoMarketPlace:products", "[]").await?;
//! assert_eq!(kv.get("@GoMarketPlace:products").await?.as_deref(), Some("[]"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::memory::MemoryKv;
pub use kv::sqlite::SqliteKv;
pub use kv::DurableKv;
pub use pool::{Database, DbConfig};
