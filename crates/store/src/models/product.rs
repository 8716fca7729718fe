//! Catalog product entity.
//!
//! Products are read-only from this core's perspective; the catalog
//! collaborator owns them and writes the `"Items"` collection.

use chrono::{DateTime, Utc};
use driftwood_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Decimal,
    /// Primary image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Canonical product page URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the product was created in the catalog.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the product was last updated in the catalog.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Presentation components (specs, galleries, ...), in display order.
    #[serde(default)]
    pub components: Vec<ProductComponent>,
}

/// One presentation block of a product page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductComponent {
    /// Component identifier.
    pub id: String,
    /// Kind of component (free string, e.g. "gallery").
    pub component_type: String,
    /// Component heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Component body.
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Attached media, in display order.
    #[serde(default)]
    pub medias: Vec<ProductMedia>,
}

/// Media attached to a product component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMedia {
    /// Media identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Media kind (free string, e.g. "image", "video").
    #[serde(default)]
    pub media_type: Option<String>,
    /// Media URL.
    pub url: String,
    /// Pixel width, when known.
    #[serde(default)]
    pub width: Option<i64>,
    /// Pixel height, when known.
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
