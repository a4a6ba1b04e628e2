//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::OwnerLocks;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    shopify: AdminClient,
    locks: OwnerLocks,
}

impl AppState {
    /// Build state from configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        let locks = OwnerLocks::new(config.serialize_field_writes);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                locks,
            }),
        }
    }

    /// Relay configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Shopify Admin API client, also the production field store.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Per-customer write locks.
    #[must_use]
    pub fn locks(&self) -> &OwnerLocks {
        &self.inner.locks
    }
}
