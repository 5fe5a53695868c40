//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::store::CartStateStore;
use crate::config::StorefrontConfig;
use crate::shopify::{CartClient, CatalogClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// Storefront API clients, per-cart state, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartClient,
    carts: CartStateStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.shopify);
        let cart = CartClient::new(&config.shopify);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                carts: CartStateStore::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart client.
    #[must_use]
    pub fn cart(&self) -> &CartClient {
        &self.inner.cart
    }

    /// Get a reference to the per-cart state store.
    #[must_use]
    pub fn carts(&self) -> &CartStateStore {
        &self.inner.carts
    }
}
