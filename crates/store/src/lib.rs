//! Driftwood Store - cart, catalog, and community feed services.
//!
//! This crate is the service core that reconciles two external data tiers:
//! a durable JSON document store and a volatile key-value cache. It owns no
//! transport or presentation concerns; a request layer wires the services
//! to whatever surface it wants.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration ([`StoreConfig`])
//! - [`error`] - The [`StoreError`] taxonomy and `Result` alias
//! - [`gateway`] - External collaborator traits plus in-memory implementations
//! - [`models`] - Persisted entities (cart, product, post)
//! - [`paging`] - Pure filter/slice pagination engine
//! - [`services`] - The catalog, cart, and feed services
//!
//! # Storage model
//!
//! The document store is authoritative for every entity. The cache is an
//! explicit read-through/write-through layer in front of the `Cart`
//! collection; it never holds state the store does not.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod paging;
pub mod services;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
