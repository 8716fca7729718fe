//! Cart consolidation over the document store and cache.
//!
//! The `"Cart"` collection in the document store is authoritative; the
//! cache sits in front of it as an explicit read-through/write-through
//! layer. Every mutation writes the store first and then refreshes the
//! cache, so the cache never holds state the store does not.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use driftwood_core::{CartId, ProductId};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{Result, StoreError};
use crate::gateway::{CacheStore, DocumentStore, from_doc, to_doc};
use crate::models::{Cart, Product};

use super::catalog::ITEMS_COLLECTION;

/// Collection holding the authoritative cart documents.
pub(crate) const CART_COLLECTION: &str = "Cart";

/// Cart operations: consolidating merges plus the plain CRUD surface.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    documents: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheStore>,
    /// One async mutex per cart id, so concurrent `add_product` calls for
    /// the same cart observe each other's writes. Idle entries are pruned
    /// whenever a lock is handed out.
    merge_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CartService {
    /// Create a cart service over the two storage tiers.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            inner: Arc::new(CartServiceInner {
                documents,
                cache,
                merge_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    // =========================================================================
    // Consolidation
    // =========================================================================

    /// Merge one unit of a product into a cart.
    ///
    /// With no `cart_id` a fresh cart is minted around a single
    /// quantity-1 line. With one, the existing cart (or a new empty cart
    /// under that id) absorbs the product: an existing line's quantity is
    /// incremented, otherwise a new line is appended. The whole cart is
    /// persisted as a full overwrite and returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if the product does not
    /// exist; no cart line is ever built from a missing product. Gateway
    /// failures propagate.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(
        &self,
        cart_id: Option<&CartId>,
        product_id: &ProductId,
    ) -> Result<Cart> {
        let product = self.resolve_product(product_id).await?;

        let Some(cart_id) = cart_id else {
            // First add for a session-less caller: mint an id, one line.
            let mut cart = Cart::new(CartId::mint());
            cart.add_product(&product);
            self.persist_new(&cart).await?;
            return Ok(cart);
        };

        // Serialize read-merge-write cycles per cart id so two concurrent
        // adds both land instead of the last writer silently winning.
        let lock = self.merge_lock(cart_id).await;
        let _guard = lock.lock().await;

        let (mut cart, existing) = match self.load_cart(cart_id).await? {
            Some(mut cart) => {
                cart.updated_at = Some(Utc::now());
                (cart, true)
            }
            None => (Cart::new(cart_id.clone()), false),
        };

        cart.add_product(&product);

        if existing {
            self.persist_update(&cart).await?;
        } else {
            self.persist_new(&cart).await?;
        }

        Ok(cart)
    }

    // =========================================================================
    // CRUD pass-throughs (no merge logic)
    // =========================================================================

    /// Fetch a cart: cache first, store fallback with cache repopulation.
    ///
    /// # Errors
    ///
    /// Gateway failures propagate.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Option<Cart>> {
        if let Some(doc) = self.inner.cache.get(cart_id.as_str()).await? {
            debug!("Cache hit for cart");
            return Ok(Some(from_doc(doc)?));
        }

        let Some(doc) = self
            .inner
            .documents
            .get(CART_COLLECTION, cart_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        // Read-through: repopulate the cache on the way out.
        self.inner.cache.set(cart_id.as_str(), doc.clone()).await?;
        Ok(Some(from_doc(doc)?))
    }

    /// Store a cart that does not exist yet.
    ///
    /// # Errors
    ///
    /// Gateway failures propagate.
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    pub async fn add_cart(&self, cart: &Cart) -> Result<()> {
        self.persist_new(cart).await
    }

    /// Replace an existing cart (full overwrite).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CartNotFound`] if the authoritative row is
    /// absent. Gateway failures propagate.
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    pub async fn update_cart(&self, cart: &Cart) -> Result<()> {
        self.require_cart(&cart.id).await?;
        self.persist_update(cart).await
    }

    /// Delete a cart from both tiers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CartNotFound`] if the authoritative row is
    /// absent. Gateway failures propagate.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn remove_cart(&self, cart_id: &CartId) -> Result<()> {
        self.require_cart(cart_id).await?;
        self.inner
            .documents
            .delete(CART_COLLECTION, cart_id.as_str())
            .await?;
        self.inner.cache.remove(cart_id.as_str()).await?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn resolve_product(&self, product_id: &ProductId) -> Result<Product> {
        let doc = self
            .inner
            .documents
            .get(ITEMS_COLLECTION, product_id.as_str())
            .await?;
        match doc {
            Some(doc) => Ok(from_doc(doc)?),
            None => Err(StoreError::ProductNotFound(product_id.clone())),
        }
    }

    /// Load a cart for mutation: cache first, then the store. No cache
    /// repopulation here; the caller is about to overwrite the entry.
    async fn load_cart(&self, cart_id: &CartId) -> Result<Option<Cart>> {
        if let Some(doc) = self.inner.cache.get(cart_id.as_str()).await? {
            return Ok(Some(from_doc(doc)?));
        }
        let doc = self
            .inner
            .documents
            .get(CART_COLLECTION, cart_id.as_str())
            .await?;
        doc.map(|d| from_doc(d).map_err(Into::into)).transpose()
    }

    async fn require_cart(&self, cart_id: &CartId) -> Result<()> {
        let doc = self
            .inner
            .documents
            .get(CART_COLLECTION, cart_id.as_str())
            .await?;
        if doc.is_none() {
            return Err(StoreError::CartNotFound(cart_id.clone()));
        }
        Ok(())
    }

    async fn persist_new(&self, cart: &Cart) -> Result<()> {
        let doc = to_doc(cart)?;
        self.inner
            .documents
            .create(CART_COLLECTION, cart.id.as_str(), doc.clone())
            .await?;
        self.inner.cache.set(cart.id.as_str(), doc).await?;
        Ok(())
    }

    async fn persist_update(&self, cart: &Cart) -> Result<()> {
        let doc = to_doc(cart)?;
        self.inner
            .documents
            .update(CART_COLLECTION, cart.id.as_str(), doc.clone())
            .await?;
        self.inner.cache.set(cart.id.as_str(), doc).await?;
        Ok(())
    }

    async fn merge_lock(&self, cart_id: &CartId) -> Arc<Mutex<()>> {
        let mut locks = self.inner.merge_locks.lock().await;
        // A strong count of 1 means no task holds or awaits the lock; the
        // map itself owns the last reference, so the entry can go.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(cart_id.as_str().to_string())
            .or_default()
            .clone()
    }

    #[cfg(test)]
    async fn merge_lock_entries(&self) -> usize {
        self.inner.merge_locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::StoreConfig;
    use crate::gateway::{InMemoryDocumentStore, MokaCache};

    use super::*;

    struct Fixture {
        documents: Arc<InMemoryDocumentStore>,
        cache: Arc<MokaCache>,
        carts: CartService,
    }

    async fn fixture() -> Fixture {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let cache = Arc::new(MokaCache::new(&StoreConfig::default()));
        documents
            .create(
                ITEMS_COLLECTION,
                "p1",
                json!({"id": "p1", "title": "Paddle", "price": "19.99", "image": "p1.jpg"}),
            )
            .await
            .unwrap();
        documents
            .create(
                ITEMS_COLLECTION,
                "p2",
                json!({"id": "p2", "title": "Oar", "price": "34.50"}),
            )
            .await
            .unwrap();

        let carts = CartService::new(documents.clone(), cache.clone());
        Fixture {
            documents,
            cache,
            carts,
        }
    }

    #[tokio::test]
    async fn first_add_without_cart_id_mints_a_cart() {
        let fx = fixture().await;

        let cart = fx
            .carts
            .add_product(None, &ProductId::from("p1"))
            .await
            .unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.lines[0].title, "Paddle");
        assert!(cart.updated_at.is_none());

        // Written through to both tiers.
        assert!(fx
            .documents
            .get(CART_COLLECTION, cart.id.as_str())
            .await
            .unwrap()
            .is_some());
        assert!(fx.cache.get(cart.id.as_str()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sequential_adds_increment_without_duplicating_lines() {
        let fx = fixture().await;
        let p1 = ProductId::from("p1");
        let p2 = ProductId::from("p2");

        let cart = fx.carts.add_product(None, &p1).await.unwrap();
        fx.carts.add_product(Some(&cart.id), &p2).await.unwrap();
        let cart = fx.carts.add_product(Some(&cart.id), &p1).await.unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.line(&p1).unwrap().quantity, 2);
        assert_eq!(cart.line(&p2).unwrap().quantity, 1);
        assert!(cart.updated_at.is_some());
    }

    #[tokio::test]
    async fn concurrent_adds_to_one_cart_both_land() {
        let fx = fixture().await;
        let p1 = ProductId::from("p1");
        let cart = fx.carts.add_product(None, &p1).await.unwrap();

        let (a, b) = tokio::join!(
            fx.carts.add_product(Some(&cart.id), &p1),
            fx.carts.add_product(Some(&cart.id), &p1),
        );
        a.unwrap();
        b.unwrap();

        let cart = fx.carts.get_cart(&cart.id).await.unwrap().unwrap();
        assert_eq!(cart.line(&p1).unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn idle_merge_locks_are_pruned() {
        let fx = fixture().await;
        let p1 = ProductId::from("p1");

        for id in ["cart-a", "cart-b", "cart-c"] {
            fx.carts
                .add_product(Some(&CartId::from(id)), &p1)
                .await
                .unwrap();
        }

        // Each hand-out prunes the idle entries left by earlier merges,
        // so only the most recent cart's lock remains.
        assert_eq!(fx.carts.merge_lock_entries().await, 1);
    }

    #[tokio::test]
    async fn missing_product_is_fatal_and_writes_nothing() {
        let fx = fixture().await;

        let err = fx
            .carts
            .add_product(None, &ProductId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(_)));

        assert!(fx.documents.list(CART_COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_cart_id_starts_a_fresh_cart_under_it() {
        let fx = fixture().await;
        let id = CartId::from("handed-out-earlier");

        let cart = fx
            .carts
            .add_product(Some(&id), &ProductId::from("p2"))
            .await
            .unwrap();

        assert_eq!(cart.id, id);
        assert_eq!(cart.lines.len(), 1);
        assert!(cart.updated_at.is_none());
    }

    #[tokio::test]
    async fn get_cart_falls_back_to_store_and_repopulates_cache() {
        let fx = fixture().await;
        let cart = fx
            .carts
            .add_product(None, &ProductId::from("p1"))
            .await
            .unwrap();

        // Simulate cache eviction; the store copy is authoritative.
        fx.cache.remove(cart.id.as_str()).await.unwrap();

        let fetched = fx.carts.get_cart(&cart.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_quantity(), 1);
        assert!(fx.cache.get(cart.id.as_str()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn merge_survives_cache_eviction() {
        let fx = fixture().await;
        let p1 = ProductId::from("p1");
        let cart = fx.carts.add_product(None, &p1).await.unwrap();

        fx.cache.remove(cart.id.as_str()).await.unwrap();

        let cart = fx.carts.add_product(Some(&cart.id), &p1).await.unwrap();
        assert_eq!(cart.line(&p1).unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn update_and_remove_require_the_authoritative_row() {
        let fx = fixture().await;
        let ghost = Cart::new(CartId::from("ghost"));

        let err = fx.carts.update_cart(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::CartNotFound(_)));

        let err = fx.carts.remove_cart(&ghost.id).await.unwrap_err();
        assert!(matches!(err, StoreError::CartNotFound(_)));
    }

    #[tokio::test]
    async fn remove_cart_evicts_both_tiers() {
        let fx = fixture().await;
        let cart = fx
            .carts
            .add_product(None, &ProductId::from("p1"))
            .await
            .unwrap();

        fx.carts.remove_cart(&cart.id).await.unwrap();

        assert!(fx
            .documents
            .get(CART_COLLECTION, cart.id.as_str())
            .await
            .unwrap()
            .is_none());
        assert!(fx.cache.get(cart.id.as_str()).await.unwrap().is_none());
        assert!(fx.carts.get_cart(&cart.id).await.unwrap().is_none());
    }
}
