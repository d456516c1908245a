//! Synchronization controller
//!
//! An explicit event-driven state machine:
//!
//! ```text
//! route / API / fetch completion
//!        │
//!        ▼
//!   ShoppingAction ──► reduce(state, action) ──► FetchRequest ──► spawned fetch
//!        ▲                    │                                       │
//!        │                    ▼                                       │
//!        └──── effects(action, state) ◄── broadcast action log        │
//!                                                                     │
//!        completion action ◄──────────────────────────────────────────┘
//! ```
//!
//! - **actions**: the action vocabulary
//! - **reducer**: pure state transition, returns fetches to issue
//! - **effects**: pure follow-up action derivation, one effect per pipeline
//! - **fetch**: collaborator calls turned into completion actions
//! - **runtime**: [`ShoppingStore`] handle and the single dispatcher task

pub mod actions;
pub mod effects;
pub mod fetch;
pub mod reducer;
pub mod runtime;

pub use actions::{ActionType, ShoppingAction};
pub use fetch::FetchRequest;
pub use reducer::{Outcome, reduce};
pub use runtime::ShoppingStore;

use crate::core::StoreConfig;
use crate::store::LoadPolicy;

/// Read-only inputs shared by the reducer and the effects
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub config: &'a StoreConfig,
    /// Processing time in epoch milliseconds
    pub now: i64,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a StoreConfig, now: i64) -> Self {
        Self { config, now }
    }

    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            failed: self.config.failed_load_policy,
            ttl_millis: self.config.entity_ttl_millis(),
        }
    }
}
