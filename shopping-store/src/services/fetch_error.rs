//! Collaborator error type

use shared::error::AppError;
use shared::models::{ListingId, ListingKey};
use thiserror::Error;

/// Failure reported by a category or product fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The id does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// Network or backend failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Failure status for a category load
    pub fn for_category(self, unique_id: &str) -> AppError {
        match self {
            Self::NotFound(_) => AppError::category_not_found(unique_id),
            Self::Transport(msg) => {
                AppError::transport(msg).with_detail("unique_id", unique_id.to_string())
            }
        }
    }

    /// Failure status for a product load
    pub fn for_product(self, sku: &str) -> AppError {
        match self {
            Self::NotFound(_) => AppError::product_not_found(sku),
            Self::Transport(msg) => AppError::transport(msg).with_detail("sku", sku.to_string()),
        }
    }

    /// Failure status for a listing fetch
    ///
    /// A listing the backend does not know is not a redirect case, so both
    /// variants end up as listing failures.
    pub fn for_listing(self, key: &ListingKey) -> AppError {
        let err = match self {
            Self::NotFound(msg) => AppError::listing_unavailable(msg),
            Self::Transport(msg) => AppError::transport(msg),
        };
        err.with_detail("listing", key.to_string())
    }

    /// Failure status for a filter-navigation fetch
    pub fn for_filter(self, id: &ListingId) -> AppError {
        let err = match self {
            Self::NotFound(msg) => AppError::not_found(msg),
            Self::Transport(msg) => AppError::transport(msg),
        };
        err.with_detail("listing", format!("{}:{}", id.kind().name(), id.value()))
    }
}
