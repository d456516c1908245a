//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the value recorded in a failed load status. It is `Clone` so the
/// same failure can be observed by every reader of the store:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (the id that failed, the listing key, ...)
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Whether the failure means the id does not exist upstream
    pub fn is_not_found(&self) -> bool {
        self.code.is_not_found()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a category not found error
    pub fn category_not_found(unique_id: impl Into<String>) -> Self {
        let id = unique_id.into();
        Self::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {} not found", id),
        )
        .with_detail("unique_id", id)
    }

    /// Create a product not found error
    pub fn product_not_found(sku: impl Into<String>) -> Self {
        let sku = sku.into();
        Self::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", sku))
            .with_detail("sku", sku)
    }

    /// Create an invalid listing key error
    pub fn invalid_listing_key(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidListingKey, msg)
    }

    /// Create a listing unavailable error
    pub fn listing_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ListingUnavailable, msg)
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TransportError, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::ListingUnavailable);
        assert_eq!(err.message, "Product listing is unavailable");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_category_not_found_details() {
        let err = AppError::category_not_found("A.123.XXX");
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
        assert!(err.is_not_found());
        let details = err.details.unwrap();
        assert_eq!(details["unique_id"], "A.123.XXX");
    }

    #[test]
    fn test_transport_is_not_not_found() {
        let err = AppError::transport("connection reset");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_serde_skips_empty_details() {
        let json = serde_json::to_value(AppError::internal("boom")).unwrap();
        assert_eq!(json["code"], 9001);
        assert!(json.get("details").is_none());
    }
}
