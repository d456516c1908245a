//! Unified error system for the shopping store
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::product_not_found("P3");
//! assert_eq!(err.code, ErrorCode::ProductNotFound);
//! assert!(err.is_not_found());
//!
//! let err = AppError::invalid_listing_key("empty search term")
//!     .with_detail("type", "search");
//! assert!(!err.is_not_found());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
