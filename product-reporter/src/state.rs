//! Application state

use std::sync::Arc;

use shared::store::{ProductReader, ProductStore, StoreResult};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read side of the product store
    pub products: Arc<dyn ProductReader>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductReader>) -> Self {
        Self { products }
    }

    /// Connect to the configured store (bounded retry)
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let store = ProductStore::connect_with(&config.store, &config.store_retry).await?;
        Ok(Self::new(Arc::new(store)))
    }
}
