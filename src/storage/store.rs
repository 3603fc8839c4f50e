//! Store Module
//!
//! Registry of named collections with a permanent default collection, a
//! capacity limit, and helpers that address objects by collection name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::error::{Result, StoreError};
use crate::storage::{Collection, Object, RequestSettings, DEFAULT_COLLECTION};

// == Store ==
/// Registry of collections shared by request handlers and the sweeper.
#[derive(Debug)]
pub struct Store {
    /// Registered collections, including the default one
    collections: RwLock<HashMap<String, Arc<Collection>>>,
    /// The default collection, never removed from the registry
    default: Arc<Collection>,
    /// Storage settings
    config: StorageConfig,
}

impl Store {
    // == Constructor ==
    /// Creates a store holding only the default collection.
    pub fn new(config: StorageConfig) -> Self {
        let default = Arc::new(Collection::new(DEFAULT_COLLECTION));
        let mut collections = HashMap::new();
        collections.insert(DEFAULT_COLLECTION.to_string(), default.clone());

        Self {
            collections: RwLock::new(collections),
            default,
            config,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    // == Default Timeout ==
    /// Expiry horizon for objects stored without explicit settings.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.default_ttl)
    }

    // == New Collection ==
    /// Registers an empty collection under `name`.
    ///
    /// The empty name refers to the default collection and therefore
    /// always already exists.
    pub async fn new_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;

        if name.is_empty() || collections.contains_key(name) {
            return Err(StoreError::AlreadyExists(format!("collection '{}'", name)));
        }

        if collections.len() >= self.config.max_collections_count {
            return Err(StoreError::CapacityExceeded(format!(
                "at most {} collections allowed",
                self.config.max_collections_count
            )));
        }

        collections.insert(name.to_string(), Arc::new(Collection::new(name)));
        Ok(())
    }

    // == Get Collection ==
    /// Resolves a collection by name; the empty name resolves to the default.
    pub async fn get_collection(&self, name: &str) -> Result<Arc<Collection>> {
        if name.is_empty() {
            return Ok(self.default.clone());
        }

        self.collections
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("collection '{}'", name)))
    }

    // == Delete Collection ==
    /// Removes a collection and every object in it.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        if name.is_empty() || name == DEFAULT_COLLECTION {
            return Err(StoreError::ProtectedResource(
                "the default collection cannot be deleted".to_string(),
            ));
        }

        match self.collections.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("collection '{}'", name))),
        }
    }

    // == Snapshot ==
    /// Point-in-time list of registered collections.
    pub async fn collections_snapshot(&self) -> Vec<Arc<Collection>> {
        self.collections.read().await.values().cloned().collect()
    }

    pub async fn collection_count(&self) -> usize {
        self.collections.read().await.len()
    }

    // == Object Helpers ==
    /// Reads an object from the named collection.
    pub async fn get_object(&self, collection: &str, key: &str) -> Result<Object> {
        self.get_collection(collection).await?.get(key).await
    }

    /// Resolves `settings` into an object and stores it in the named collection.
    pub async fn set_object(
        &self,
        collection: &str,
        key: &str,
        settings: RequestSettings,
    ) -> Result<()> {
        let collection = self.get_collection(collection).await?;
        let object = Object::resolve(settings, self.default_timeout());
        collection.set(key, object).await;
        Ok(())
    }

    /// Deletes an object from the named collection.
    pub async fn delete_object(&self, collection: &str, key: &str) -> Result<()> {
        self.get_collection(collection).await?.delete(key).await
    }
}
