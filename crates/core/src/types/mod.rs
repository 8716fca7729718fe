//! Core types for Driftwood.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod page;

pub use id::{CartId, PostId, ProductId, UserId};
pub use page::Page;
