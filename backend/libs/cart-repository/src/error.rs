//! Error types for the cart repository

use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for cart repository operations
pub type CartResult<T> = Result<T, CartError>;

/// Input rejected before any query is issued
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("owner_id is empty")]
    EmptyOwnerId,

    #[error("product_id is nil")]
    NilProductId,
}

/// Errors that can occur while reading or writing carts
#[derive(Error, Debug)]
pub enum CartError {
    /// Caller input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row carries a currency code that is not ISO 4217
    #[error("currency[{code}] is not valid for product {product_id}")]
    InvalidCurrency { code: String, product_id: Uuid },

    /// A caller-supplied currency code is not ISO 4217
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The query boundary failed (connectivity, constraint violation, ...)
    #[error("{operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The operation did not finish before its deadline
    #[error("{operation}: timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Rolling back failed after `source` had already failed the unit of work
    #[error("{source}; tx.rollback: {rollback}")]
    Rollback {
        #[source]
        source: Box<CartError>,
        rollback: sqlx::Error,
    },

    /// The executor handed to the repository cannot run queries
    #[error("invalid executor: {0}")]
    InvalidExecutor(&'static str),

    /// The shared transaction was already committed or rolled back
    #[error("transaction is already closed")]
    TransactionClosed,
}

impl CartError {
    /// Adapter for `map_err` that tags a sqlx error with the operation name
    pub fn storage(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| CartError::Storage { operation, source }
    }

    /// Check if the caller supplied invalid input
    pub fn is_validation(&self) -> bool {
        matches!(self, CartError::Validation(_))
    }

    /// Check if error is transient (caller may retry)
    pub fn is_transient(&self) -> bool {
        match self {
            CartError::Timeout { .. } => true,
            CartError::Storage { source, .. } => matches!(
                source,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            CartError::Rollback { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Name of the failing operation, when the error came from the query boundary
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            CartError::Storage { operation, .. } | CartError::Timeout { operation, .. } => {
                Some(*operation)
            }
            CartError::Rollback { source, .. } => source.operation(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_field() {
        let owner: CartError = ValidationError::EmptyOwnerId.into();
        let product: CartError = ValidationError::NilProductId.into();

        assert_eq!(owner.to_string(), "owner_id is empty");
        assert_eq!(product.to_string(), "product_id is nil");
        assert!(owner.is_validation());
        assert!(!owner.is_transient());
    }

    #[test]
    fn test_storage_error_carries_operation() {
        let err = CartError::storage("q.get_cart")(sqlx::Error::PoolTimedOut);

        assert!(err.to_string().starts_with("q.get_cart: "));
        assert_eq!(err.operation(), Some("q.get_cart"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_rollback_keeps_original_error() {
        let original = CartError::storage("q.add_item")(sqlx::Error::RowNotFound);
        let err = CartError::Rollback {
            source: Box::new(original),
            rollback: sqlx::Error::PoolClosed,
        };

        let msg = err.to_string();
        assert!(msg.contains("q.add_item"), "original cause lost: {}", msg);
        assert!(msg.contains("tx.rollback"), "rollback cause lost: {}", msg);
        assert_eq!(err.operation(), Some("q.add_item"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        let err = CartError::Timeout {
            operation: "q.delete_item",
            after: Duration::from_millis(10),
        };

        assert!(err.is_transient());
        assert!(err.to_string().contains("timed out"));
    }
}
