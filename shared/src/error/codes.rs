//! Unified error codes for the shopping store
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (categories, products, listings)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so a failed load status can
/// be serialized for observers without carrying Rust-specific error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 6xxx: Catalog ====================
    /// Category does not exist upstream
    CategoryNotFound = 6001,
    /// Product does not exist upstream
    ProductNotFound = 6002,
    /// Malformed listing identity, sorting or filter combination
    InvalidListingKey = 6101,
    /// Listing could not be fetched
    ListingUnavailable = 6102,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Configuration is invalid
    ConfigError = 9003,
    /// Network or backend failure
    TransportError = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the code means "the id does not exist upstream"
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound | ErrorCode::CategoryNotFound | ErrorCode::ProductNotFound
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::InvalidListingKey => "Invalid product listing parameters",
            ErrorCode::ListingUnavailable => "Product listing is unavailable",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ConfigError => "Invalid configuration",
            ErrorCode::TransportError => "Backend request failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Catalog
            6001 => Ok(ErrorCode::CategoryNotFound),
            6002 => Ok(ErrorCode::ProductNotFound),
            6101 => Ok(ErrorCode::InvalidListingKey),
            6102 => Ok(ErrorCode::ListingUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::TransportError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
