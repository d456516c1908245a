//! Filter navigation of the listing being shown
//!
//! Holds the facets of one listing identity (listing id plus filter
//! selection) at a time. Requests for the identity already held are
//! dropped; responses for any other identity are stale.

use super::entities::LoadStatus;
use shared::error::AppError;
use shared::models::{FilterNavigation, ListingId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    requested: Option<(ListingId, Option<String>)>,
    pub status: Option<LoadStatus>,
    pub navigation: Option<FilterNavigation>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing id and filter selection the navigation belongs to
    pub fn requested(&self) -> Option<(&ListingId, Option<&str>)> {
        self.requested
            .as_ref()
            .map(|(id, filters)| (id, filters.as_deref()))
    }

    pub fn is_current(&self, id: &ListingId, filters: Option<&str>) -> bool {
        self.requested() == Some((id, filters))
    }

    /// Switch to a new listing identity
    ///
    /// Returns `false` when the identity is the one already held, in which
    /// case nothing has to be fetched.
    pub fn begin_load(&mut self, id: &ListingId, filters: Option<&str>) -> bool {
        if self.is_current(id, filters) {
            return false;
        }
        self.requested = Some((id.clone(), filters.map(str::to_string)));
        self.status = Some(LoadStatus::Pending);
        self.navigation = None;
        true
    }

    /// Store a fetched navigation; returns `false` for a stale response
    pub fn set(
        &mut self,
        id: &ListingId,
        filters: Option<&str>,
        navigation: FilterNavigation,
    ) -> bool {
        if !self.is_current(id, filters) {
            return false;
        }
        self.status = Some(LoadStatus::Loaded);
        self.navigation = Some(navigation);
        true
    }

    /// Record a failed fetch; returns `false` for a stale response
    pub fn fail(&mut self, id: &ListingId, filters: Option<&str>, error: AppError) -> bool {
        if !self.is_current(id, filters) {
            return false;
        }
        self.status = Some(LoadStatus::Failed(error));
        self.navigation = None;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
