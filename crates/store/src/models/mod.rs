//! Persisted entities.
//!
//! These are exactly the shapes stored by the external collaborators:
//! carts in the `"Cart"` collection (mirrored in the cache), products in
//! `"Items"`, posts in `"Community"`. No separate wire format exists.

pub mod cart;
pub mod post;
pub mod product;

pub use cart::{Cart, CartLine};
pub use post::{Post, PostInput, PostThread};
pub use product::{Product, ProductComponent, ProductMedia};
