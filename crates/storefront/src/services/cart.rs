//! Persistent cart store.
//!
//! [`CartStore`] is the single source of truth for cart contents. It wraps a
//! [`CartState`] with three responsibilities:
//!
//! - **Serialization**: mutations run under a mutex, so two mutations never
//!   interleave and each persistence write happens before the next mutation
//!   is accepted.
//! - **Persistence**: every state change is written to the key-value store.
//!   Write failures are logged and ignored; the in-memory cart stays
//!   authoritative for the rest of the process.
//! - **Publication**: every state change publishes a fresh [`CartSnapshot`]
//!   on a `watch` channel for observers such as the toast service.
//!
//! Every method blocks for the duration of the storage write, which for a
//! [`FileStore`](crate::storage::FileStore) includes an fsync. Async callers
//! should run mutations on the blocking pool.

use std::sync::{Arc, Mutex, PoisonError};

use serene_home_core::{CartSnapshot, CartState, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;

/// Storage key of the persisted cart record.
pub const CART_STORAGE_KEY: &str = "cart";

/// Owned, observable, persistent cart.
pub struct CartStore {
    state: Mutex<CartState>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    changes: watch::Sender<Arc<CartSnapshot>>,
}

impl CartStore {
    /// Open the cart persisted under [`CART_STORAGE_KEY`].
    ///
    /// A missing, unreadable, or invalid record yields an empty cart.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Open the cart persisted under `key`.
    #[must_use]
    pub fn open_with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = restore(storage.as_ref(), &key);
        let (changes, _) = watch::channel(Arc::new(state.snapshot()));

        Self {
            state: Mutex::new(state),
            storage,
            key,
            changes,
        }
    }

    /// Add one unit of `product`, merging with an existing line.
    ///
    /// An addition that would overflow the quantity or the cart total is
    /// dropped and the cart is left as it was.
    pub fn add(&self, product: &Product) -> Arc<CartSnapshot> {
        self.mutate(|cart| match cart.add(product) {
            Some(quantity) => {
                debug!(product_id = %product.id, quantity = quantity.get(), "Added to cart");
                true
            }
            None => {
                warn!(product_id = %product.id, "Cart total would overflow; addition dropped");
                false
            }
        })
    }

    /// Set a product's quantity; zero or below removes it, unknown ids are ignored.
    pub fn update_quantity(&self, id: ProductId, quantity: i64) -> Arc<CartSnapshot> {
        self.mutate(|cart| {
            let changed = cart.update_quantity(id, quantity);
            debug!(product_id = %id, quantity, changed, "Updated cart quantity");
            changed
        })
    }

    /// Remove a product's line if present.
    pub fn remove(&self, id: ProductId) -> Arc<CartSnapshot> {
        self.mutate(|cart| {
            let removed = cart.remove(id).is_some();
            debug!(product_id = %id, removed, "Removed from cart");
            removed
        })
    }

    /// Empty the cart.
    pub fn clear(&self) -> Arc<CartSnapshot> {
        self.mutate(|cart| {
            let cleared = cart.clear();
            if cleared {
                info!("Cart cleared");
            }
            cleared
        })
    }

    /// The current items with derived total and count.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CartSnapshot> {
        Arc::clone(&self.changes.borrow())
    }

    /// Receive a snapshot after every change to the cart.
    ///
    /// The receiver starts out holding the current snapshot, marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartSnapshot>> {
        self.changes.subscribe()
    }

    /// Apply `op` under the lock; persist and publish if it reports a change.
    fn mutate(&self, op: impl FnOnce(&mut CartState) -> bool) -> Arc<CartSnapshot> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !op(&mut state) {
            return self.snapshot();
        }

        self.persist(&state);

        let snapshot = Arc::new(state.snapshot());
        debug!(
            items = snapshot.items.len(),
            count = snapshot.count,
            "Publishing cart snapshot"
        );
        self.changes.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    fn persist(&self, state: &CartState) {
        let encoded = match state.to_json() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart; keeping it in memory only");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &encoded) {
            warn!(error = %e, key = %self.key, "Failed to persist cart; keeping it in memory only");
        }
    }
}

/// Load the persisted cart, falling back to an empty one.
fn restore(storage: &dyn KeyValueStore, key: &str) -> CartState {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No persisted cart; starting empty");
            return CartState::new();
        }
        Err(e) => {
            warn!(error = %e, key, "Failed to read persisted cart; starting empty");
            return CartState::new();
        }
    };

    match CartState::from_json(&raw) {
        Ok(state) => {
            info!(key, items = state.items().len(), "Restored persisted cart");
            state
        }
        Err(e) => {
            warn!(error = %e, key, "Discarding invalid persisted cart");
            CartState::new()
        }
    }
}
