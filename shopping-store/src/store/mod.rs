//! Shopping state
//!
//! The composite state owned by the dispatcher. Every slice is mutated only
//! by the reducer; observers read it through the selectors below.
//!
//! - **entities**: categories and products by id, with load status
//! - **listing**: paginated sku views per listing key
//! - **filter**: filter navigation of the listing being shown
//! - **selection**: selected category / product
//! - **recently**: recently-viewed log
//! - **router**: last resolved route, redirect history

pub mod entities;
pub mod filter;
pub mod listing;
pub mod recently;
pub mod router;
pub mod selection;

pub use entities::{EntityStore, Entry, Keyed, LoadPolicy, LoadStatus};
pub use filter::FilterState;
pub use listing::{
    ListingEntry, ListingState, ListingView, PageRef, ParamsWatch, ViewResolution, ViewStatus,
};
pub use recently::RecentlyViewed;
pub use router::RouterState;
pub use selection::Selection;

use crate::core::StoreConfig;
use shared::models::{Category, FilterNavigation, ListingKey, Product, unique_id};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingState {
    pub locale: String,
    /// Top-level category fetch status per locale
    pub top_level: BTreeMap<String, LoadStatus>,
    pub categories: EntityStore<Category>,
    pub products: EntityStore<Product>,
    pub listing: ListingState,
    pub filter: FilterState,
    pub selection: Selection,
    pub recently: RecentlyViewed,
    pub router: RouterState,
}

impl ShoppingState {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            locale: config.default_locale.clone(),
            top_level: BTreeMap::new(),
            categories: EntityStore::new(),
            products: EntityStore::new(),
            listing: ListingState::new(config.default_view_type),
            filter: FilterState::new(),
            selection: Selection::default(),
            recently: RecentlyViewed::new(
                config.recently_viewed_max,
                config.recently_viewed_order,
            ),
            router: RouterState::default(),
        }
    }

    /// Drop all entities, listings, selections and the recently-viewed log
    ///
    /// The locale, view type and route history survive a reset.
    pub fn reset(&mut self) {
        self.top_level.clear();
        self.categories.clear();
        self.products.clear();
        self.listing.reset();
        self.filter.reset();
        self.selection.clear();
        self.recently.clear();
    }

    // ========== Selectors ==========

    pub fn category_by_id(&self, unique_id: &str) -> Option<&Category> {
        self.categories.get(unique_id)
    }

    pub fn categories_ids(&self) -> Vec<String> {
        self.categories.ids()
    }

    /// Root categories (those with no parent), in id order
    pub fn top_level_categories(&self) -> Vec<&Category> {
        self.categories.entities().filter(|c| c.is_root()).collect()
    }

    /// Loaded children of a category, in backend order
    pub fn sub_categories(&self, unique_id: &str) -> Vec<&Category> {
        self.categories
            .get(unique_id)
            .map(|c| {
                c.sub_categories
                    .iter()
                    .filter_map(|id| self.categories.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Loaded categories from the root down to `unique_id`
    pub fn category_path(&self, unique_id: &str) -> Vec<&Category> {
        unique_id::ancestors(unique_id)
            .iter()
            .filter_map(|id| self.categories.get(id))
            .collect()
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selection
            .category
            .as_deref()
            .and_then(|id| self.categories.get(id))
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selection
            .product
            .as_deref()
            .and_then(|sku| self.products.get(sku))
    }

    pub fn product_ids(&self) -> Vec<String> {
        self.products.ids()
    }

    /// Resident recently-viewed products in log order
    pub fn recently_viewed_products(&self) -> Vec<&Product> {
        self.recently
            .skus()
            .iter()
            .filter_map(|sku| self.products.get(sku))
            .collect()
    }

    pub fn listing_view(&self, key: &ListingKey, page: u32, page_size: usize) -> ListingView {
        self.listing.view(key, page, page_size, &self.products)
    }

    pub fn filter_navigation(&self) -> Option<&FilterNavigation> {
        self.filter.navigation.as_ref()
    }

    pub fn top_level_status(&self, locale: &str) -> Option<&LoadStatus> {
        self.top_level.get(locale)
    }
}
