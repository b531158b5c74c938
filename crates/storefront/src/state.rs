//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::{CartStore, ToastHandle, ToastService};
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the storefront's one
/// cart store. Handlers reach the cart through [`AppState::cart`]; nothing
/// else holds it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: CartStore,
    toasts: ToastHandle,
}

impl AppState {
    /// Create application state over an explicit storage backend.
    ///
    /// Restores the persisted cart and starts the toast service, which
    /// takes the restored cart as its baseline. Must be called from within
    /// a tokio runtime.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        catalog: Catalog,
    ) -> Self {
        let cart = CartStore::open(storage);
        let toasts = ToastService::spawn(cart.subscribe(), config.toast_duration);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                toasts,
            }),
        }
    }

    /// Create application state backed by files under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage = FileStore::open(&config.data_dir)?;
        Ok(Self::new(config, Arc::new(storage), Catalog::serene_home()))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the toast service handle.
    #[must_use]
    pub fn toasts(&self) -> &ToastHandle {
        &self.inner.toasts
    }
}
