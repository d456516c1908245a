pub mod config;
pub mod error;

pub use config::{FailedLoadPolicy, RecentlyViewedOrder, StoreConfig};
pub use error::{Result, StoreError};
