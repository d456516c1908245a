//! Shared types for the shopping store
//!
//! Catalog models, listing keys, route resolutions and the unified error
//! types used by the store engine and by anything observing it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
