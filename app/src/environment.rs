//! Dependencies injected into the reducers

use pawfetch_catalog::{DogCatalogClient, Transport};
use pawfetch_core::environment::KeyValueStore;
use std::sync::Arc;

/// Catalog client and durable storage
pub struct AppEnvironment<T> {
    /// Catalog API client
    pub catalog: Arc<DogCatalogClient<T>>,
    /// Durable key-value storage
    pub storage: Arc<dyn KeyValueStore>,
}

impl<T: Transport> AppEnvironment<T> {
    /// Build an environment with a default client over `transport`
    #[must_use]
    pub fn new(transport: T, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            catalog: Arc::new(DogCatalogClient::new(transport)),
            storage,
        }
    }

    /// Build an environment from an existing client
    #[must_use]
    pub fn with_client(catalog: Arc<DogCatalogClient<T>>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { catalog, storage }
    }
}

impl<T> Clone for AppEnvironment<T> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            storage: Arc::clone(&self.storage),
        }
    }
}
