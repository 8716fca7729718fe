//! External collaborator contracts: the durable document store and the
//! volatile key-value cache.
//!
//! Both tiers are independently owned services. Documents cross this
//! boundary as [`serde_json::Value`]; the services (de)serialize their own
//! entities so the gateways stay object-safe and entity-agnostic. Each
//! call is an independent unit — no gateway holds a lock or a transaction
//! across calls, and cancellation/timeout policy belongs to the
//! implementation behind the trait.

mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use memory::{InMemoryDocumentStore, MokaCache};

/// Errors surfaced by gateway implementations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backing service could not be reached or refused the call.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// A document could not be (de)serialized at the boundary.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable JSON document store, organized into named collections.
///
/// The collection is scoped per call. The original repository this
/// replaces carried a stateful `init(collection)` instead; with a shared
/// repository instance that is a race between callers, so the scoping
/// moved into each method signature.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document by id, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, GatewayError>;

    /// Fetch every document in a collection. Ordering is unspecified;
    /// callers establish their own.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, GatewayError>;

    /// Create a document under the given id.
    async fn create(&self, collection: &str, id: &str, doc: Value) -> Result<(), GatewayError>;

    /// Replace the document under the given id (full overwrite).
    async fn update(&self, collection: &str, id: &str, doc: Value) -> Result<(), GatewayError>;

    /// Delete the document under the given id. Deleting an absent id is
    /// not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError>;
}

/// Volatile key-value cache.
///
/// `remove` goes beyond the get/set pair the original cache repository
/// exposed; write-through cart storage needs eviction on delete.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value under a key, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Value>, GatewayError>;

    /// Store a value under a key (full overwrite).
    async fn set(&self, key: &str, value: Value) -> Result<(), GatewayError>;

    /// Evict a key. Evicting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), GatewayError>;
}

// =============================================================================
// Typed boundary helpers
// =============================================================================

/// Deserialize a document fetched from a gateway.
pub(crate) fn from_doc<T: DeserializeOwned>(doc: Value) -> Result<T, GatewayError> {
    Ok(serde_json::from_value(doc)?)
}

/// Serialize an entity for the gateway boundary.
pub(crate) fn to_doc<T: Serialize>(entity: &T) -> Result<Value, GatewayError> {
    Ok(serde_json::to_value(entity)?)
}
