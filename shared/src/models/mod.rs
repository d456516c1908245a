//! Data models
//!
//! Shared between the store engine and its observers.

pub mod category;
pub mod filter;
pub mod listing;
pub mod product;
pub mod route;

// Re-exports
pub use category::*;
pub use filter::*;
pub use listing::*;
pub use product::*;
pub use route::*;
