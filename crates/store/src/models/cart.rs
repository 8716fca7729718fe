//! Shopping cart aggregate.

use chrono::{DateTime, Utc};
use driftwood_core::{CartId, ProductId};
use serde::{Deserialize, Serialize};

use super::Product;

/// A shopping cart.
///
/// Invariants: at most one line per distinct product, every quantity >= 1.
/// Both are maintained by [`Cart::add_product`], the only mutation this
/// core performs on lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Opaque cart identifier.
    pub id: CartId,
    /// When the cart was first created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last merged into; `None` until the first
    /// consolidation against an existing cart.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Cart lines, one per distinct product, in insertion order.
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

/// One row in a cart: a distinct product and its quantity.
///
/// Title and image are denormalized from the product at add time and are
/// not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product title captured at add time.
    pub title: String,
    /// Product image captured at add time.
    pub image: Option<String>,
    /// Number of units; always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// Build a quantity-1 line from a resolved product.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            quantity: 1,
        }
    }
}

impl Cart {
    /// Create an empty cart under the given id, stamped now.
    #[must_use]
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            updated_at: None,
            lines: Vec::new(),
        }
    }

    /// The line for a product, if the cart already carries one.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Merge a product into the cart: increment the existing line's
    /// quantity, or append a new quantity-1 line denormalized from the
    /// product.
    pub fn add_product(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::for_product(product)),
        }
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}
