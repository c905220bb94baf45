//! # Cart Store
//!
//! Owns the authoritative in-memory cart and keeps it in step with durable
//! storage.
//!
//! ## Write Ordering
//! Every load and every mutation runs under one `tokio::sync::Mutex`. Tokio's
//! mutex is fair, so operations are applied in the order they were issued,
//! and each one computes its change from the list the previous one
//! committed. Two rapid `increment`s therefore land as +2, never +1.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Mutation (write lock held)                       │
//! │                                                                         │
//! │  lock ──► loaded? ──no──► resync (get + filter)                        │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  Cart::from_items(committed list) ──► apply add/increment/decrement    │
//! │             │                                                           │
//! │             ├── NotFound ──────────────────────────► return (no write) │
//! │             ▼                                                           │
//! │  commit: kv.set(key, to_json)   ── fails ──► Err, items untouched      │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  resync: kv.get(key) ──► Cart::from_json (drops qty <= 0)              │
//! │             │       └── fails ──► Err(ResyncFailed), write kept        │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  items.send_replace(...) ──► observers notified                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use gomarket_core::validation::validate_new_item;
use gomarket_core::{Cart, CartItem, CoreError, MutationOutcome, NewCartItem};
use gomarket_db::DurableKv;

use super::config::{CartConfig, CorruptStatePolicy};
use crate::error::{CartError, CartResult};

/// The cart store.
///
/// ## Invariants
/// - `items` only changes inside a load, after the write lock is taken
/// - `loaded` is true only while `items` mirrors what storage last returned
#[derive(Debug)]
pub struct CartStore {
    kv: Arc<dyn DurableKv>,
    storage_key: String,
    on_corrupt_state: CorruptStatePolicy,
    items: watch::Sender<Vec<CartItem>>,
    loaded: AtomicBool,
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Creates a store with an empty cart. Nothing is read until
    /// [`initialize`](Self::initialize) or the first mutation.
    pub fn new(kv: Arc<dyn DurableKv>, config: &CartConfig) -> Self {
        let (items, _) = watch::channel(Vec::new());

        CartStore {
            kv,
            storage_key: config.storage_key.clone(),
            on_corrupt_state: config.on_corrupt_state,
            items,
            loaded: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Returns the current cart lines.
    pub fn products(&self) -> Vec<CartItem> {
        self.items.borrow().clone()
    }

    /// Returns a receiver that sees every change to the cart lines.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.items.subscribe()
    }

    /// Whether the in-memory cart reflects a completed load.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads the cart from storage unless a load has already completed.
    pub async fn initialize(&self) -> CartResult<()> {
        let _guard = self.write_lock.lock().await;

        if self.is_loaded() {
            debug!("Cart already loaded");
            return Ok(());
        }

        self.resync().await?;
        info!(items = self.items.borrow().len(), "Cart loaded");
        Ok(())
    }

    /// Re-reads storage unconditionally and replaces the in-memory cart.
    pub async fn reload(&self) -> CartResult<()> {
        let _guard = self.write_lock.lock().await;
        self.resync().await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product at quantity 1. If the id is already in the cart the
    /// list is left as is, but it is still committed and reloaded.
    pub async fn add_to_cart(&self, item: NewCartItem) -> CartResult<MutationOutcome> {
        validate_new_item(&item)?;
        debug!(id = %item.id, "add_to_cart");

        self.mutate("add_to_cart", |cart| cart.add(item)).await
    }

    /// Raises the quantity of `id` by one. Unknown ids are a no-op.
    pub async fn increment(&self, id: &str) -> CartResult<MutationOutcome> {
        debug!(id = %id, "increment");
        self.mutate("increment", |cart| cart.increment(id)).await
    }

    /// Lowers the quantity of `id` by one. A line reaching zero is dropped by
    /// the reload that follows the write. Unknown ids are a no-op.
    pub async fn decrement(&self, id: &str) -> CartResult<MutationOutcome> {
        debug!(id = %id, "decrement");
        self.mutate("decrement", |cart| cart.decrement(id)).await
    }

    async fn mutate<F>(&self, op: &'static str, apply: F) -> CartResult<MutationOutcome>
    where
        F: FnOnce(&mut Cart) -> MutationOutcome,
    {
        let _guard = self.write_lock.lock().await;

        // A mutation can beat the background load to the lock; never
        // compute against the empty placeholder list.
        if !self.is_loaded() {
            debug!(op, "Loading cart before mutation");
            self.resync().await?;
        }

        let mut cart = Cart::from_items(self.products());
        let outcome = apply(&mut cart);

        if !outcome.needs_commit() {
            debug!(op, ?outcome, "Nothing to commit");
            return Ok(outcome);
        }

        self.commit(op, &cart).await?;

        // Past this point the change is durable; a failed read must not
        // look like a failed write or the caller will apply it twice.
        self.resync().await.map_err(|e| match e {
            CartError::Storage(e) => CartError::ResyncFailed(e),
            other => other,
        })?;

        debug!(op, ?outcome, "Cart mutation committed");
        Ok(outcome)
    }

    // =========================================================================
    // Storage Round Trip (write lock must be held)
    // =========================================================================

    async fn commit(&self, op: &'static str, cart: &Cart) -> CartResult<()> {
        let payload = cart.to_json()?;

        if let Err(e) = self.kv.set(&self.storage_key, &payload).await {
            error!(op, error = %e, "Failed to persist cart; mutation not applied");
            return Err(e.into());
        }

        Ok(())
    }

    async fn resync(&self) -> CartResult<()> {
        match self.read_committed().await {
            Ok(cart) => {
                self.items.send_replace(cart.into_items());
                self.loaded.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                // Storage may now be ahead of memory; force a reload next time.
                self.loaded.store(false, Ordering::SeqCst);
                warn!(error = %e, "Cart resync failed");
                Err(e)
            }
        }
    }

    async fn read_committed(&self) -> CartResult<Cart> {
        let Some(payload) = self.kv.get(&self.storage_key).await? else {
            debug!(key = %self.storage_key, "No stored cart");
            return Ok(Cart::new());
        };

        match Cart::from_json(&payload) {
            Ok(cart) => Ok(cart),
            Err(CoreError::CorruptState { reason })
                if self.on_corrupt_state == CorruptStatePolicy::Reset =>
            {
                warn!(
                    key = %self.storage_key,
                    reason = %reason,
                    "Stored cart is corrupt; starting from an empty cart"
                );
                Ok(Cart::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gomarket_db::{Database, DbConfig, DbError, MemoryKv};
    use std::collections::HashSet;
    use std::time::Duration;

    const KEY: &str = gomarket_core::DEFAULT_STORAGE_KEY;

    fn coffee() -> NewCartItem {
        NewCartItem::new("p-1", "Coffee", "https://img/coffee.png", 12.5)
    }

    fn tea() -> NewCartItem {
        NewCartItem::new("p-2", "Tea", "https://img/tea.png", 3.25)
    }

    fn store_on(kv: Arc<MemoryKv>) -> CartStore {
        CartStore::new(kv, &CartConfig::default())
    }

    async fn loaded_store() -> (CartStore, Arc<MemoryKv>) {
        let kv = Arc::new(MemoryKv::new());
        let store = store_on(kv.clone());
        store.initialize().await.unwrap();
        (store, kv)
    }

    fn quantity_of(store: &CartStore, id: &str) -> Option<i64> {
        store
            .products()
            .into_iter()
            .find(|i| i.id == id)
            .map(|i| i.quantity)
    }

    #[tokio::test]
    async fn test_empty_start() {
        let (store, kv) = loaded_store().await;

        assert!(store.is_loaded());
        assert!(store.products().is_empty());
        assert_eq!(kv.write_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_filters_stored_zero_quantities() {
        let payload = r#"[
            {"id":"p-1","title":"Coffee","image_url":"a","price":12.5,"quantity":0},
            {"id":"p-2","title":"Tea","image_url":"b","price":3.25,"quantity":3},
            {"id":"p-3","title":"Milk","image_url":"c","price":1.0,"quantity":-2}
        ]"#;
        let kv = Arc::new(MemoryKv::with_entry(KEY, payload));
        let store = store_on(kv);

        store.initialize().await.unwrap();

        let ids: Vec<String> = store.products().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["p-2".to_string()]);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let kv = Arc::new(MemoryKv::with_entry(KEY, "[]"));
        let store = store_on(kv.clone());
        store.initialize().await.unwrap();

        // Storage changes behind the store's back; a second initialize is a no-op
        kv.set(
            KEY,
            r#"[{"id":"p-9","title":"x","image_url":"y","price":1.0,"quantity":1}]"#,
        )
        .await
        .unwrap();
        store.initialize().await.unwrap();
        assert!(store.products().is_empty());

        // reload always re-reads
        store.reload().await.unwrap();
        assert_eq!(quantity_of(&store, "p-9"), Some(1));
    }

    #[tokio::test]
    async fn test_add_appends_at_quantity_one() {
        let (store, kv) = loaded_store().await;

        let outcome = store.add_to_cart(coffee()).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Added);
        assert_eq!(quantity_of(&store, "p-1"), Some(1));
        assert_eq!(kv.write_count(), 1);
    }

    #[tokio::test]
    async fn test_re_add_is_idempotent() {
        let (store, kv) = loaded_store().await;

        store.add_to_cart(coffee()).await.unwrap();
        let outcome = store.add_to_cart(coffee()).await.unwrap();

        assert_eq!(outcome, MutationOutcome::AlreadyInCart);
        assert_eq!(store.products().len(), 1);
        assert_eq!(quantity_of(&store, "p-1"), Some(1));
        // Re-adding still commits
        assert_eq!(kv.write_count(), 2);
    }

    #[tokio::test]
    async fn test_uniqueness_over_many_adds() {
        let (store, _kv) = loaded_store().await;

        for item in [coffee(), tea(), coffee(), tea(), coffee()] {
            store.add_to_cart(item).await.unwrap();
        }

        let products = store.products();
        let ids: HashSet<&str> = products.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(products.len(), 2);
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_decrement_symmetry() {
        let (store, _kv) = loaded_store().await;
        store.add_to_cart(coffee()).await.unwrap();
        store.increment("p-1").await.unwrap();
        let before = quantity_of(&store, "p-1");

        store.increment("p-1").await.unwrap();
        store.decrement("p-1").await.unwrap();

        assert_eq!(quantity_of(&store, "p-1"), before);
        assert_eq!(before, Some(2));
    }

    #[tokio::test]
    async fn test_decrement_to_zero_evicts_on_resync() {
        let (store, kv) = loaded_store().await;
        store.add_to_cart(coffee()).await.unwrap();
        store.add_to_cart(tea()).await.unwrap();

        let outcome = store.decrement("p-1").await.unwrap();

        assert_eq!(outcome, MutationOutcome::Updated { quantity: 0 });
        assert_eq!(quantity_of(&store, "p-1"), None);
        assert_eq!(quantity_of(&store, "p-2"), Some(1));

        // Storage still holds the zero line; the load filter is what drops it
        let stored = kv.get(KEY).await.unwrap().unwrap();
        assert!(stored.contains("\"quantity\":0"));
    }

    #[tokio::test]
    async fn test_missing_id_is_a_deterministic_no_op() {
        let (store, kv) = loaded_store().await;
        store.add_to_cart(coffee()).await.unwrap();
        let writes = kv.write_count();

        assert_eq!(store.increment("ghost").await.unwrap(), MutationOutcome::NotFound);
        assert_eq!(store.decrement("ghost").await.unwrap(), MutationOutcome::NotFound);

        assert_eq!(kv.write_count(), writes);
        assert_eq!(quantity_of(&store, "p-1"), Some(1));
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_on(kv.clone());
        store.initialize().await.unwrap();
        store.add_to_cart(coffee()).await.unwrap();
        store.add_to_cart(tea()).await.unwrap();
        store.increment("p-2").await.unwrap();
        store.increment("p-2").await.unwrap();
        store.decrement("p-1").await.unwrap();

        let expected: HashSet<(String, i64)> = store
            .products()
            .into_iter()
            .map(|i| (i.id, i.quantity))
            .collect();

        // A fresh store over the same storage, as after an app restart
        let restarted = store_on(kv);
        restarted.initialize().await.unwrap();
        let actual: HashSet<(String, i64)> = restarted
            .products()
            .into_iter()
            .map(|i| (i.id, i.quantity))
            .collect();

        assert_eq!(actual, expected);
        assert_eq!(actual, HashSet::from([("p-2".to_string(), 3)]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_then_increment_issued_together_is_not_lost() {
        let (store, kv) = loaded_store().await;
        // Make every write suspend so the two operations overlap in time
        kv.set_write_delay(Duration::from_millis(20));

        let (added, incremented) =
            tokio::join!(store.add_to_cart(coffee()), store.increment("p-1"));

        assert_eq!(added.unwrap(), MutationOutcome::Added);
        assert_eq!(incremented.unwrap(), MutationOutcome::Updated { quantity: 2 });
        assert_eq!(quantity_of(&store, "p-1"), Some(2));

        let restarted = store_on(kv);
        restarted.initialize().await.unwrap();
        assert_eq!(quantity_of(&restarted, "p-1"), Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_from_many_tasks() {
        let (store, _kv) = loaded_store().await;
        let store = Arc::new(store);
        store.add_to_cart(coffee()).await.unwrap();

        let tasks: Vec<_> = (0..25)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment("p-1").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(quantity_of(&store, "p-1"), Some(26));
    }

    #[tokio::test]
    async fn test_mutation_before_initialize_keeps_stored_cart() {
        let payload =
            r#"[{"id":"p-2","title":"Tea","image_url":"b","price":3.25,"quantity":4}]"#;
        let kv = Arc::new(MemoryKv::with_entry(KEY, payload));
        let store = store_on(kv);

        // No initialize() yet
        store.add_to_cart(coffee()).await.unwrap();

        assert!(store.is_loaded());
        assert_eq!(quantity_of(&store, "p-2"), Some(4));
        assert_eq!(quantity_of(&store, "p-1"), Some(1));
    }

    #[tokio::test]
    async fn test_corrupt_state_resets_by_default() {
        let kv = Arc::new(MemoryKv::with_entry(KEY, "{not json"));
        let store = store_on(kv.clone());

        store.initialize().await.unwrap();
        assert!(store.is_loaded());
        assert!(store.products().is_empty());

        // The next commit replaces the corrupt payload
        store.add_to_cart(coffee()).await.unwrap();
        let stored = kv.get(KEY).await.unwrap().unwrap();
        assert!(Cart::from_json(&stored).is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_state_propagates_when_configured() {
        let kv = Arc::new(MemoryKv::with_entry(KEY, r#"[{"id":"p-1"}]"#));
        let config = CartConfig {
            on_corrupt_state: CorruptStatePolicy::Propagate,
            ..Default::default()
        };
        let store = CartStore::new(kv, &config);

        let err = store.initialize().await.unwrap_err();
        assert!(matches!(err, CartError::Core(CoreError::CorruptState { .. })));
        assert!(!store.is_loaded());

        // Mutations refuse to build on a cart they could not read
        assert!(store.add_to_cart(coffee()).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_write_is_not_committed() {
        let (store, kv) = loaded_store().await;
        store.add_to_cart(coffee()).await.unwrap();
        let stored_before = kv.get(KEY).await.unwrap();

        kv.set_fail_writes(true);
        let err = store.increment("p-1").await.unwrap_err();

        assert!(matches!(err, CartError::Storage(DbError::Unavailable(_))));
        assert_eq!(quantity_of(&store, "p-1"), Some(1));
        assert_eq!(kv.get(KEY).await.unwrap(), stored_before);

        // Retry once storage recovers
        kv.set_fail_writes(false);
        store.increment("p-1").await.unwrap();
        assert_eq!(quantity_of(&store, "p-1"), Some(2));
    }

    #[tokio::test]
    async fn test_failed_resync_forces_reload_before_next_mutation() {
        let (store, kv) = loaded_store().await;

        kv.set_fail_reads(true);
        let err = store.add_to_cart(coffee()).await.unwrap_err();
        assert!(matches!(err, CartError::ResyncFailed(_)));
        assert!(!store.is_loaded());
        // The write landed, memory has not caught up yet
        assert!(store.products().is_empty());

        kv.set_fail_reads(false);
        store.increment("p-1").await.unwrap();

        assert_eq!(quantity_of(&store, "p-1"), Some(2));
    }

    #[tokio::test]
    async fn test_saved_but_unreadable_increment_is_applied_once() {
        let (store, kv) = loaded_store().await;
        store.add_to_cart(coffee()).await.unwrap();

        kv.set_fail_reads(true);
        let err = store.increment("p-1").await.unwrap_err();
        assert!(matches!(err, CartError::ResyncFailed(DbError::Unavailable(_))));

        // The right recovery is a reload, which shows the saved increment
        kv.set_fail_reads(false);
        store.reload().await.unwrap();
        assert_eq!(quantity_of(&store, "p-1"), Some(2));
    }

    #[tokio::test]
    async fn test_load_failure_before_mutation_is_a_storage_error() {
        let kv = Arc::new(MemoryKv::with_entry(KEY, "[]"));
        let store = store_on(kv.clone());
        kv.set_fail_reads(true);

        let err = store.add_to_cart(coffee()).await.unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(kv.write_count(), 0);
    }

    #[tokio::test]
    async fn test_increment_at_max_quantity_does_not_overflow() {
        let payload = format!(
            r#"[{{"id":"p-1","title":"Coffee","image_url":"a","price":12.5,"quantity":{}}}]"#,
            i64::MAX
        );
        let kv = Arc::new(MemoryKv::with_entry(KEY, payload));
        let store = store_on(kv);
        store.initialize().await.unwrap();

        let outcome = store.increment("p-1").await.unwrap();

        assert_eq!(outcome, MutationOutcome::Updated { quantity: i64::MAX });
        assert_eq!(quantity_of(&store, "p-1"), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_non_finite_price_is_rejected_without_write() {
        let (store, kv) = loaded_store().await;

        let err = store
            .add_to_cart(NewCartItem::new("p-1", "Coffee", "img", f64::NAN))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Core(CoreError::Validation(_))));
        assert_eq!(kv.write_count(), 0);
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_observers_are_notified() {
        let (store, _kv) = loaded_store().await;
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.add_to_cart(coffee()).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.increment("p-1").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().first().map(|i| i.quantity), Some(2));
    }

    #[tokio::test]
    async fn test_sqlite_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.db");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            let store = CartStore::new(Arc::new(db.kv()), &CartConfig::default());
            store.initialize().await.unwrap();
            store.add_to_cart(coffee()).await.unwrap();
            store.add_to_cart(tea()).await.unwrap();
            store.increment("p-1").await.unwrap();
            store.decrement("p-2").await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let store = CartStore::new(Arc::new(db.kv()), &CartConfig::default());
        store.initialize().await.unwrap();

        let products = store.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p-1");
        assert_eq!(products[0].quantity, 2);
        assert_eq!(products[0].unit_price, 12.5);
    }
}
