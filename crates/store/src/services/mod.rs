//! Service layer: catalog pass-through, cart consolidation, and the
//! community feed reader/writer.
//!
//! Every service is request-scoped in usage: each public method is an
//! independent async operation that suspends only at gateway calls and
//! holds nothing across requests (the cart merge lock being the one
//! documented exception).

pub mod cart;
pub mod catalog;
pub mod feed;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use feed::{FeedReader, FeedWriter};
