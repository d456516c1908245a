//! Listing Engine
//!
//! Paginated views over sku sequences keyed by [`ListingKey`]. Only skus are
//! kept here; product data stays in the entity store. Pages are materialized
//! lazily as they are requested, always as `1..=n`, so known pages never have
//! gaps.

use super::entities::{EntityStore, LoadStatus};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::{
    ListingId, ListingKey, Product, ProductListing, ViewType, page_count, page_slice,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingEntry {
    /// Status of the sku sequence fetch, `None` until first requested
    pub status: Option<LoadStatus>,
    /// Last successfully fetched sequence
    pub listing: Option<ProductListing>,
    /// Materialized pages
    pub pages: BTreeMap<u32, Vec<String>>,
    /// Pages that could not be shown, with the failure that settled them
    pub unavailable_pages: BTreeMap<u32, AppError>,
}

impl ListingEntry {
    pub fn skus(&self) -> &[String] {
        self.listing
            .as_ref()
            .map(|l| l.skus.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.listing.as_ref().map_or(0, ProductListing::total)
    }

    fn is_pending(&self) -> bool {
        self.status.as_ref().is_some_and(LoadStatus::is_pending)
    }
}

/// A listing key together with the page being shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub key: ListingKey,
    pub page: u32,
}

impl PageRef {
    pub fn new(key: ListingKey, page: u32) -> Self {
        Self {
            key,
            page: page.max(1),
        }
    }
}

/// Listing whose parameters follow the route query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamsWatch {
    pub id: ListingId,
    /// Page asked for by the requester; the `page` query parameter wins over it
    pub page: u32,
}

/// What it takes to show a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewResolution {
    /// Every sku of the page is resident (or the page lies past the end)
    Available,
    /// Skus are known; these products are not resident yet
    MissingProducts(Vec<String>),
    /// The sku sequence is being fetched
    Pending,
    /// The sku sequence must be fetched
    FetchRequired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "camelCase")]
pub enum ViewStatus {
    /// Nothing requested for this page yet
    NotLoaded,
    Loading,
    Available,
    Unavailable(AppError),
}

/// Read-only page view handed to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub key: ListingKey,
    pub page: u32,
    pub skus: Vec<String>,
    pub total: usize,
    pub page_count: u32,
    pub status: ViewStatus,
}

impl ListingView {
    pub fn is_available(&self) -> bool {
        self.status == ViewStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    entries: BTreeMap<ListingKey, ListingEntry>,
    pub view_type: ViewType,
    /// Last view type taken from the `view` query parameter
    pub query_view: Option<ViewType>,
    pub watch: Option<ParamsWatch>,
    /// Page most recently requested for display
    pub active: Option<PageRef>,
    /// Requested page still waiting for its products
    pub pending_view: Option<PageRef>,
    /// Last listing request rejected before any fetch
    pub last_error: Option<AppError>,
}

impl ListingState {
    pub fn new(view_type: ViewType) -> Self {
        Self {
            entries: BTreeMap::new(),
            view_type,
            query_view: None,
            watch: None,
            active: None,
            pending_view: None,
            last_error: None,
        }
    }

    pub fn entry(&self, key: &ListingKey) -> Option<&ListingEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ListingKey> {
        self.entries.keys()
    }

    pub fn sort_keys(&self, key: &ListingKey) -> Vec<String> {
        self.entries
            .get(key)
            .and_then(|e| e.listing.as_ref())
            .map(|l| l.sort_keys.clone())
            .unwrap_or_default()
    }

    /// Loaded or currently loading
    pub fn is_requested(&self, key: &ListingKey) -> bool {
        self.entries
            .get(key)
            .and_then(|e| e.status.as_ref())
            .is_some_and(|s| !matches!(s, LoadStatus::Failed(_)))
    }

    /// Whether the page's skus are resident, and what is missing if not
    pub fn resolve_view(
        &self,
        key: &ListingKey,
        page: u32,
        page_size: usize,
        products: &EntityStore<Product>,
    ) -> ViewResolution {
        let Some(entry) = self.entries.get(key) else {
            return ViewResolution::FetchRequired;
        };
        match (&entry.status, &entry.listing) {
            (Some(LoadStatus::Loaded), Some(listing)) => {
                let missing: Vec<String> = page_slice(&listing.skus, page, page_size)
                    .iter()
                    .filter(|sku| !products.contains(sku))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    ViewResolution::Available
                } else {
                    ViewResolution::MissingProducts(missing)
                }
            }
            (Some(LoadStatus::Pending), _) => ViewResolution::Pending,
            _ => ViewResolution::FetchRequired,
        }
    }

    /// Page view as observers see it
    pub fn view(
        &self,
        key: &ListingKey,
        page: u32,
        page_size: usize,
        products: &EntityStore<Product>,
    ) -> ListingView {
        let page = page.max(1);
        let mut view = ListingView {
            key: key.clone(),
            page,
            skus: Vec::new(),
            total: 0,
            page_count: 0,
            status: ViewStatus::NotLoaded,
        };
        let Some(entry) = self.entries.get(key) else {
            return view;
        };

        view.total = entry.total();
        view.page_count = page_count(view.total, page_size);

        if let Some(error) = entry.unavailable_pages.get(&page) {
            view.skus = entry.pages.get(&page).cloned().unwrap_or_default();
            view.status = ViewStatus::Unavailable(error.clone());
            return view;
        }

        if let Some(skus) = entry.pages.get(&page) {
            view.skus = skus.clone();
            view.status = page_status(skus, products);
            return view;
        }

        let slice = page_slice(entry.skus(), page, page_size);
        view.status = if let Some(error) = failed_product(slice, products) {
            ViewStatus::Unavailable(error.clone())
        } else if entry.is_pending()
            || self.pending_view.as_ref().is_some_and(|p| &p.key == key && p.page == page)
        {
            ViewStatus::Loading
        } else if entry.listing.is_some() && slice.is_empty() {
            ViewStatus::Available
        } else {
            ViewStatus::NotLoaded
        };
        view
    }

    /// Mark the key's sku sequence pending
    ///
    /// Returns `false` when a fetch for the key is already in flight.
    pub fn begin_fetch(&mut self, key: &ListingKey) -> bool {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.is_pending() {
            return false;
        }
        entry.status = Some(LoadStatus::Pending);
        true
    }

    /// Replace the key's sku sequence; previously materialized pages are dropped
    pub fn set_skus(&mut self, key: &ListingKey, listing: ProductListing) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.status = Some(LoadStatus::Loaded);
        entry.listing = Some(listing);
        entry.pages.clear();
        entry.unavailable_pages.clear();
    }

    /// Record a failed fetch, leaving the previous sequence and pages intact
    pub fn fail(&mut self, key: &ListingKey, page: u32, error: AppError) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.unavailable_pages.insert(page.max(1), error.clone());
        entry.status = Some(LoadStatus::Failed(error));
        if self
            .pending_view
            .as_ref()
            .is_some_and(|p| &p.key == key && p.page == page.max(1))
        {
            self.pending_view = None;
        }
    }

    /// Settle the waiting page when one of its products failed to load
    ///
    /// The page is recorded unavailable with the product's error so it no
    /// longer reads as loading.
    pub fn fail_product(&mut self, sku: &str, page_size: usize, error: &AppError) {
        let Some(pending) = &self.pending_view else {
            return;
        };
        let Some(entry) = self.entries.get_mut(&pending.key) else {
            return;
        };
        if !page_slice(entry.skus(), pending.page, page_size)
            .iter()
            .any(|s| s == sku)
        {
            return;
        }
        entry.unavailable_pages.insert(pending.page, error.clone());
        self.pending_view = None;
    }

    /// Materialize pages `1..=page` from the stored sequence
    pub fn set_pages(&mut self, key: &ListingKey, page: u32, page_size: usize) {
        let page = page.max(1);
        if let Some(entry) = self.entries.get_mut(key) {
            let skus = entry.skus().to_vec();
            for n in 1..=page {
                if !entry.pages.contains_key(&n) {
                    let slice = page_slice(&skus, n, page_size);
                    if slice.is_empty() && n > 1 {
                        break;
                    }
                    entry.pages.insert(n, slice.to_vec());
                }
            }
            entry.unavailable_pages.remove(&page);
        }
        if self
            .pending_view
            .as_ref()
            .is_some_and(|p| &p.key == key && p.page == page)
        {
            self.pending_view = None;
        }
    }

    /// Drop every listing and view parameter
    pub fn reset(&mut self) {
        self.entries.clear();
        self.query_view = None;
        self.watch = None;
        self.active = None;
        self.pending_view = None;
        self.last_error = None;
    }
}

fn page_status(skus: &[String], products: &EntityStore<Product>) -> ViewStatus {
    if let Some(error) = failed_product(skus, products) {
        return ViewStatus::Unavailable(error.clone());
    }
    if skus.iter().all(|sku| products.contains(sku)) {
        ViewStatus::Available
    } else {
        ViewStatus::Loading
    }
}

/// First failure among the non-resident skus
fn failed_product<'a>(
    skus: &[String],
    products: &'a EntityStore<Product>,
) -> Option<&'a AppError> {
    skus.iter()
        .filter(|sku| !products.contains(sku))
        .find_map(|sku| products.status(sku).and_then(LoadStatus::error))
}

/// Re-derive a key with a new filter selection
///
/// Pages cached under the old key stay where they are.
pub fn apply_filter(key: &ListingKey, filters: Option<String>) -> AppResult<ListingKey> {
    key.with_filters(filters)
}

/// Search parameter sent to the filter endpoint for a filter selection
pub fn search_parameter(filters: &str) -> String {
    STANDARD.encode(filters.as_bytes())
}
