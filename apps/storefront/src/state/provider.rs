//! # Cart Provider
//!
//! Scopes one [`CartStore`] to the part of the app that shows the cart.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Provider Lifecycle                                   │
//! │                                                                         │
//! │  CartProvider::mount(kv, &config)                                      │
//! │       │  creates the store, spawns store.initialize()                  │
//! │       ▼                                                                 │
//! │  provider.use_cart() ──► CartHandle (weak ref to the store)            │
//! │       │                                                                 │
//! │       │  handle.add_to_cart / increment / decrement / products         │
//! │       ▼                                                                 │
//! │  provider.unmount()                                                    │
//! │       │  aborts a pending load, drops the store                        │
//! │       ▼                                                                 │
//! │  provider.use_cart()      ──► Err(CartError::OutsideProvider)          │
//! │  old_handle.increment(..) ──► Err(CartError::OutsideProvider)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The background load never blocks `mount`. Callers that need the stored
//! cart before rendering can `ready().await`; mutations issued earlier are
//! still safe because the store loads before it mutates.

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use gomarket_core::{CartItem, MutationOutcome, NewCartItem};
use gomarket_db::DurableKv;

use super::cart::CartStore;
use super::config::CartConfig;
use crate::error::{CartError, CartResult};

// =============================================================================
// Provider
// =============================================================================

/// Owner of the cart store for the cart feature's lifetime.
#[derive(Debug, Default)]
pub struct CartProvider {
    store: Option<Arc<CartStore>>,
    init_task: Option<JoinHandle<CartResult<()>>>,
}

impl CartProvider {
    /// Creates the store and starts loading it in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(kv: Arc<dyn DurableKv>, config: &CartConfig) -> Self {
        let store = Arc::new(CartStore::new(kv, config));

        let loader = Arc::clone(&store);
        let init_task = tokio::spawn(async move {
            let result = loader.initialize().await;
            if let Err(e) = &result {
                error!(error = %e, "Initial cart load failed");
            }
            result
        });

        info!(key = %config.storage_key, "Cart provider mounted");

        CartProvider {
            store: Some(store),
            init_task: Some(init_task),
        }
    }

    /// A provider with nothing mounted. Every `use_cart` fails.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// Whether a store is mounted.
    pub fn is_mounted(&self) -> bool {
        self.store.is_some()
    }

    /// Waits for the background load and returns its result.
    ///
    /// Once that result has been taken, later calls load directly, so a
    /// caller can retry after a transient storage failure.
    pub async fn ready(&mut self) -> CartResult<()> {
        let store = self.store()?;

        match self.init_task.take() {
            Some(task) => task.await.map_err(|e| CartError::Task(e.to_string()))?,
            None => {
                debug!("No pending load; loading directly");
                store.initialize().await
            }
        }
    }

    /// Returns a handle to the mounted cart.
    ///
    /// ## Errors
    /// `CartError::OutsideProvider` when nothing is mounted.
    pub fn use_cart(&self) -> CartResult<CartHandle> {
        let store = self.store()?;

        Ok(CartHandle {
            store: Arc::downgrade(&store),
        })
    }

    /// Tears the store down. Outstanding handles stop working.
    pub fn unmount(&mut self) {
        if let Some(task) = self.init_task.take() {
            task.abort();
        }

        if self.store.take().is_some() {
            info!("Cart provider unmounted");
        }
    }

    fn store(&self) -> CartResult<Arc<CartStore>> {
        self.store.clone().ok_or_else(outside_provider)
    }
}

impl Drop for CartProvider {
    fn drop(&mut self) {
        if let Some(task) = self.init_task.take() {
            task.abort();
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// The cart API as seen by UI code inside the provider.
///
/// Holds a weak reference, so a handle that outlives its provider fails
/// loudly instead of keeping a detached cart alive.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Weak<CartStore>,
}

impl CartHandle {
    /// Current cart lines.
    pub fn products(&self) -> CartResult<Vec<CartItem>> {
        Ok(self.store()?.products())
    }

    /// Receiver notified on every cart change.
    pub fn subscribe(&self) -> CartResult<watch::Receiver<Vec<CartItem>>> {
        Ok(self.store()?.subscribe())
    }

    /// See [`CartStore::add_to_cart`].
    pub async fn add_to_cart(&self, item: NewCartItem) -> CartResult<MutationOutcome> {
        self.store()?.add_to_cart(item).await
    }

    /// See [`CartStore::increment`].
    pub async fn increment(&self, id: &str) -> CartResult<MutationOutcome> {
        self.store()?.increment(id).await
    }

    /// See [`CartStore::decrement`].
    pub async fn decrement(&self, id: &str) -> CartResult<MutationOutcome> {
        self.store()?.decrement(id).await
    }

    /// See [`CartStore::reload`].
    pub async fn reload(&self) -> CartResult<()> {
        self.store()?.reload().await
    }

    fn store(&self) -> CartResult<Arc<CartStore>> {
        self.store.upgrade().ok_or_else(outside_provider)
    }
}

fn outside_provider() -> CartError {
    error!("Cart API used outside of a mounted CartProvider");
    CartError::OutsideProvider
}
