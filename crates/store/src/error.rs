//! Unified error handling for the store services.
//!
//! Provides a single `StoreError` type covering the service layer. All
//! service entry points return `Result<T, StoreError>`.

use driftwood_core::{CartId, PostId, ProductId};
use thiserror::Error;

use crate::gateway::GatewayError;

/// Service-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Product lookup failed during an operation that requires it.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Post lookup failed during an operation that requires it.
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Cart lookup failed during an operation that requires it.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    /// Malformed input rejected before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A gateway call failed; propagated, never retried here.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::ProductNotFound(ProductId::from("prod-123"));
        assert_eq!(err.to_string(), "Product not found: prod-123");

        let err = StoreError::Validation("title must not be empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: title must not be empty");
    }

    #[test]
    fn gateway_errors_convert() {
        let err: StoreError = GatewayError::Unavailable("cache offline".to_string()).into();
        assert!(matches!(err, StoreError::Gateway(_)));
    }
}
