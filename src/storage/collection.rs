//! Collection Module
//!
//! A concurrency-safe namespace of keyed objects with lazy eviction on read
//! and a cancellable bulk refresh.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StoreError};
use crate::storage::Object;

/// Number of entries a refresh scans between yields to the runtime.
const REFRESH_YIELD_INTERVAL: usize = 256;

// == Collection ==
/// Named mapping from key to [`Object`], guarded by a read-write lock.
#[derive(Debug)]
pub struct Collection {
    name: String,
    entries: RwLock<HashMap<String, Object>>,
}

impl Collection {
    // == Constructor ==
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Retrieves an object by key.
    ///
    /// An expired entry is evicted and reported as not found. Eviction only
    /// removes the entry if the one currently stored is still expired, so a
    /// concurrent `set` is never discarded.
    pub async fn get(&self, key: &str) -> Result<Object> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Err(not_found(key)),
                Some(object) if !object.is_expired_at(now) => return Ok(object.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|object| object.is_expired_at(now))
        {
            entries.remove(key);
        }
        Err(not_found(key))
    }

    // == Set ==
    /// Stores an object, replacing any existing entry for `key`.
    pub async fn set(&self, key: impl Into<String>, object: Object) {
        self.entries.write().await.insert(key.into(), object);
    }

    // == Delete ==
    /// Removes an entry by key.
    pub async fn delete(&self, key: &str) -> Result<()> {
        match self.entries.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(not_found(key)),
        }
    }

    // == Refresh ==
    /// Removes every expired entry.
    ///
    /// `cancel` is observed while waiting for the lock and before each entry,
    /// so a cancelled refresh stops scanning instead of running to completion.
    /// Returns the number of entries removed.
    pub async fn refresh(&self, cancel: &CancellationToken) -> usize {
        let mut entries = tokio::select! {
            biased;
            _ = cancel.cancelled() => return 0,
            guard = self.entries.write() => guard,
        };

        let now = Utc::now();
        let mut expired = Vec::new();
        for (scanned, (key, object)) in entries.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            if object.is_expired_at(now) {
                expired.push(key.clone());
            }
            if (scanned + 1) % REFRESH_YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
        }

        for key in &expired {
            entries.remove(key);
        }
        expired.len()
    }

    // == Keys ==
    /// Returns the keys of all live (non-expired) entries, sorted.
    pub async fn keys(&self) -> Vec<String> {
        live_keys(&*self.entries.read().await)
    }

    /// Stored entry count and sorted live keys, read under one lock.
    pub async fn len_and_keys(&self) -> (usize, Vec<String>) {
        let entries = self.entries.read().await;
        (entries.len(), live_keys(&entries))
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn read_lock(&self) -> tokio::sync::RwLockReadGuard<'_, HashMap<String, Object>> {
        self.entries.read().await
    }
}

fn live_keys(entries: &HashMap<String, Object>) -> Vec<String> {
    let now = Utc::now();
    let mut keys: Vec<String> = entries
        .iter()
        .filter(|(_, object)| !object.is_expired_at(now))
        .map(|(key, _)| key.clone())
        .collect();
    keys.sort();
    keys
}

fn not_found(key: &str) -> StoreError {
    StoreError::NotFound(format!("object '{}'", key))
}
