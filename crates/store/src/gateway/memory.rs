//! In-memory gateway implementations.
//!
//! `InMemoryDocumentStore` backs tests and embedded deployments with a
//! plain map of collections. `MokaCache` is the default in-process cache,
//! built with the same TTL + max-capacity shape the production caches use.

use std::collections::HashMap;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::config::StoreConfig;

use super::{CacheStore, DocumentStore, GatewayError};

/// Map-backed document store. Collections are created lazily on first
/// write; reading an unknown collection behaves as an empty one.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, GatewayError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, GatewayError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, id: &str, doc: Value) -> Result<(), GatewayError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, doc: Value) -> Result<(), GatewayError> {
        // Full overwrite; identical to create for a map-backed store.
        self.create(collection, id, doc).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Moka-backed in-process cache with TTL and bounded capacity.
pub struct MokaCache {
    cache: Cache<String, Value>,
}

impl MokaCache {
    /// Build a cache from the configured TTL and capacity.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, GatewayError> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), GatewayError> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), GatewayError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
