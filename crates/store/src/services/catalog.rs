//! Catalog read pass-through.
//!
//! Products are owned by the catalog collaborator; this service only reads
//! the `"Items"` collection and applies no business logic.

use std::sync::Arc;

use driftwood_core::ProductId;
use tracing::instrument;

use crate::error::Result;
use crate::gateway::{DocumentStore, from_doc};
use crate::models::Product;

/// Collection holding catalog products.
pub(crate) const ITEMS_COLLECTION: &str = "Items";

/// Read-only access to the product catalog.
#[derive(Clone)]
pub struct CatalogService {
    documents: Arc<dyn DocumentStore>,
}

impl CatalogService {
    /// Create a catalog service over a document store.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or a stored document
    /// does not deserialize as a product.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let docs = self.documents.list(ITEMS_COLLECTION).await?;
        let products = docs
            .into_iter()
            .map(from_doc)
            .collect::<std::result::Result<Vec<Product>, _>>()?;
        Ok(products)
    }

    /// Fetch a single product, or `None` if the catalog does not carry it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the document does
    /// not deserialize as a product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<Option<Product>> {
        let doc = self
            .documents
            .get(ITEMS_COLLECTION, product_id.as_str())
            .await?;
        doc.map(|d| from_doc(d).map_err(Into::into)).transpose()
    }
}
