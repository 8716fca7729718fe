//! Integration test harness for Driftwood.
//!
//! Builds the full service stack over the in-memory gateways and offers
//! seeding helpers that write the collections the external collaborators
//! own in production (`"Items"` for the catalog, `"Community"` for the
//! feed). Tests in `tests/` exercise the services end to end.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use driftwood_store::StoreConfig;
use driftwood_store::gateway::{DocumentStore, InMemoryDocumentStore, MokaCache};
use driftwood_store::services::{CartService, CatalogService, FeedReader, FeedWriter};
use serde_json::json;

/// The fully wired service stack over in-memory tiers.
pub struct TestContext {
    pub documents: Arc<InMemoryDocumentStore>,
    pub cache: Arc<MokaCache>,
    pub catalog: CatalogService,
    pub carts: CartService,
    pub feed_reader: FeedReader,
    pub feed_writer: FeedWriter,
}

impl TestContext {
    /// Wire up every service with default configuration.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();

        let config = StoreConfig::default();
        let documents = Arc::new(InMemoryDocumentStore::new());
        let cache = Arc::new(MokaCache::new(&config));

        let doc_gateway: Arc<dyn DocumentStore> = documents.clone();

        Self {
            catalog: CatalogService::new(doc_gateway.clone()),
            carts: CartService::new(doc_gateway.clone(), cache.clone()),
            feed_reader: FeedReader::new(doc_gateway.clone(), config),
            feed_writer: FeedWriter::new(doc_gateway),
            documents,
            cache,
        }
    }

    /// Seed a catalog product the way the catalog collaborator would.
    pub async fn seed_product(&self, id: &str, title: &str, price: &str) {
        self.documents
            .create(
                "Items",
                id,
                json!({
                    "id": id,
                    "title": title,
                    "price": price,
                    "image": format!("https://img.example/{id}.jpg"),
                }),
            )
            .await
            .expect("seeding product");
    }

    /// Seed a community post created at the given instant.
    pub async fn seed_post(&self, id: &str, created_at: DateTime<Utc>, content_type: Option<&str>) {
        self.documents
            .create(
                "Community",
                id,
                json!({
                    "id": id,
                    "title": format!("Post {id}"),
                    "content": "seeded body",
                    "content_type": content_type,
                    "author": "seed-user",
                    "created_at": created_at,
                }),
            )
            .await
            .expect("seeding post");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a compact tracing subscriber once per test binary.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
