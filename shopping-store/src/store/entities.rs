//! Entity Store
//!
//! Normalized id → entry maps for categories and products. Every entry carries
//! an explicit load status so observers can tell "pending" apart from "loaded"
//! and "failed". Concurrent loads of one id are coalesced through the pending
//! status: only the first request flips an entry to pending and gets to fetch.

use crate::core::config::FailedLoadPolicy;
use serde::Serialize;
use shared::error::AppError;
use shared::models::{Category, Product};
use shared::util::is_expired;
use std::collections::BTreeMap;

/// Entities addressable by a string key
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Category {
    fn key(&self) -> &str {
        &self.unique_id
    }
}

impl Keyed for Product {
    fn key(&self) -> &str {
        &self.sku
    }
}

/// Load status of one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(AppError),
}

impl LoadStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Loaded or failed
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Options deciding whether a load request results in a fetch
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadPolicy {
    pub failed: FailedLoadPolicy,
    pub ttl_millis: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    pub status: LoadStatus,
    /// Last successfully loaded entity; a failed reload does not remove it
    pub entity: Option<T>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T> {
    entries: BTreeMap<String, Entry<T>>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Keyed + Clone> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, id: &str) -> Option<&Entry<T>> {
        self.entries.get(id)
    }

    pub fn status(&self, id: &str) -> Option<&LoadStatus> {
        self.entries.get(id).map(|e| &e.status)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id).and_then(|e| e.entity.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.status(id).is_some_and(LoadStatus::is_pending)
    }

    pub fn is_failed(&self, id: &str) -> bool {
        matches!(self.status(id), Some(LoadStatus::Failed(_)))
    }

    /// Ids of all resident entities, sorted
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, e)| e.entity.is_some())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = &T> {
        self.entries.values().filter_map(|e| e.entity.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entities().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a plain (non-forced) load request for `id` has to fetch
    pub fn needs_load(&self, id: &str, now: i64, policy: LoadPolicy) -> bool {
        match self.entries.get(id) {
            None => true,
            Some(entry) => match &entry.status {
                LoadStatus::Pending => false,
                LoadStatus::Loaded => is_expired(entry.updated_at, policy.ttl_millis, now),
                LoadStatus::Failed(_) => policy.failed == FailedLoadPolicy::Retry,
            },
        }
    }

    /// Mark `id` pending if a fetch is due
    ///
    /// Returns `true` when the caller must issue the fetch. An entry that is
    /// already pending never yields a second fetch, forced or not.
    pub fn begin_load(&mut self, id: &str, now: i64, policy: LoadPolicy, force: bool) -> bool {
        if self.is_pending(id) {
            return false;
        }
        if !force && !self.needs_load(id, now, policy) {
            return false;
        }
        let entry = self.entries.entry(id.to_string()).or_insert(Entry {
            status: LoadStatus::Pending,
            entity: None,
            updated_at: now,
        });
        entry.status = LoadStatus::Pending;
        true
    }

    /// Insert or replace an entity wholesale
    pub fn upsert(&mut self, entity: T, now: i64) {
        self.entries.insert(
            entity.key().to_string(),
            Entry {
                status: LoadStatus::Loaded,
                entity: Some(entity),
                updated_at: now,
            },
        );
    }

    /// Insert a batch of entities delivered by one fetch
    pub fn upsert_all(&mut self, entities: impl IntoIterator<Item = T>, now: i64) {
        for entity in entities {
            self.upsert(entity, now);
        }
    }

    /// Record a failed load without inserting an entity
    pub fn fail(&mut self, id: &str, error: AppError, now: i64) {
        let entry = self.entries.entry(id.to_string()).or_insert(Entry {
            status: LoadStatus::Pending,
            entity: None,
            updated_at: now,
        });
        entry.status = LoadStatus::Failed(error);
        entry.updated_at = now;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
