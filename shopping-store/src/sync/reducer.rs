//! Reducer
//!
//! `reduce` is the only function that mutates [`ShoppingState`]. It never
//! performs I/O: whatever must be fetched is returned as [`FetchRequest`]s for
//! the runtime to execute, and follow-up actions are left to the effects.

use super::Context;
use super::actions::ShoppingAction;
use super::fetch::{FetchRequest, FilterSource};
use crate::store::{LoadStatus, PageRef, ParamsWatch, ShoppingState};
use tracing::debug;

/// Result of reducing one action
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    /// `false` when the action left the state untouched; effects are skipped
    pub changed: bool,
    pub fetches: Vec<FetchRequest>,
    /// Path to hand to the route sink
    pub redirect: Option<String>,
}

impl Outcome {
    fn changed() -> Self {
        Self {
            changed: true,
            ..Default::default()
        }
    }

    fn unchanged() -> Self {
        Self::default()
    }

    fn fetch(request: Option<FetchRequest>) -> Self {
        Self {
            changed: true,
            fetches: request.into_iter().collect(),
            redirect: None,
        }
    }
}

pub fn reduce(state: &mut ShoppingState, action: &ShoppingAction, ctx: &Context<'_>) -> Outcome {
    match action {
        // ========== Routing & selection ==========
        ShoppingAction::RouteNavigated(route) => {
            state.router.navigated(route.clone());
            Outcome::changed()
        }
        ShoppingAction::SelectCategory(unique_id) => Outcome {
            changed: state.selection.select_category(unique_id.clone()),
            ..Default::default()
        },
        ShoppingAction::SelectProduct(sku) => Outcome {
            changed: state.selection.select_product(sku.clone()),
            ..Default::default()
        },
        ShoppingAction::SelectLocale(locale) => {
            if &state.locale == locale {
                return Outcome::unchanged();
            }
            state.locale = locale.clone();
            Outcome::changed()
        }
        ShoppingAction::Navigate { path } => {
            state.router.redirected(path);
            Outcome {
                changed: true,
                fetches: Vec::new(),
                redirect: Some(path.clone()),
            }
        }

        // ========== Categories ==========
        ShoppingAction::LoadTopLevelCategories { depth, force } => {
            let locale = state.locale.clone();
            match state.top_level.get(&locale) {
                Some(LoadStatus::Pending) => {
                    debug!(locale = %locale, "Top-level categories already loading");
                    return Outcome::unchanged();
                }
                Some(_) if !force => return Outcome::unchanged(),
                _ => {}
            }
            state.top_level.insert(locale.clone(), LoadStatus::Pending);
            Outcome::fetch(Some(FetchRequest::TopLevelCategories {
                locale,
                depth: *depth,
            }))
        }
        ShoppingAction::LoadTopLevelCategoriesSuccess { locale, categories } => {
            state.categories.upsert_all(categories.iter().cloned(), ctx.now);
            state.top_level.insert(locale.clone(), LoadStatus::Loaded);
            Outcome::changed()
        }
        ShoppingAction::LoadTopLevelCategoriesFail { locale, error } => {
            state
                .top_level
                .insert(locale.clone(), LoadStatus::Failed(error.clone()));
            Outcome::changed()
        }
        ShoppingAction::LoadCategory { unique_id, force } => {
            let due = state
                .categories
                .begin_load(unique_id, ctx.now, ctx.load_policy(), *force);
            if !due {
                debug!(unique_id = %unique_id, "Category load skipped");
            }
            Outcome::fetch(due.then(|| FetchRequest::Category {
                unique_id: unique_id.clone(),
            }))
        }
        ShoppingAction::LoadCategorySuccess { category } => {
            state.categories.upsert(category.clone(), ctx.now);
            Outcome::changed()
        }
        ShoppingAction::LoadCategoryFail { unique_id, error } => {
            state.categories.fail(unique_id, error.clone(), ctx.now);
            Outcome::changed()
        }

        // ========== Products ==========
        ShoppingAction::LoadProduct { sku, force } => {
            let due = state
                .products
                .begin_load(sku, ctx.now, ctx.load_policy(), *force);
            if !due {
                debug!(sku = %sku, "Product load skipped");
            }
            Outcome::fetch(due.then(|| FetchRequest::Product { sku: sku.clone() }))
        }
        ShoppingAction::LoadProductSuccess { product } => {
            state.products.upsert(product.clone(), ctx.now);
            Outcome::changed()
        }
        ShoppingAction::LoadProductFail { sku, error } => {
            state.products.fail(sku, error.clone(), ctx.now);
            if let Some(kind) = state.listing.pending_view.as_ref().map(|p| p.key.id.kind()) {
                let page_size = ctx.config.page_size(kind);
                state.listing.fail_product(sku, page_size, error);
            }
            Outcome::changed()
        }

        // ========== Product listings ==========
        ShoppingAction::LoadMoreProducts { id, page } => {
            state.listing.watch = Some(ParamsWatch {
                id: id.clone(),
                page: *page,
            });
            state.listing.last_error = None;
            Outcome::changed()
        }
        ShoppingAction::LoadMoreProductsForParams { key, page } => {
            let view = PageRef::new(key.clone(), *page);
            state.listing.active = Some(view.clone());
            state.listing.pending_view = Some(view);
            Outcome::changed()
        }
        ShoppingAction::LoadMoreProductsFail { error, .. } => {
            state.listing.last_error = Some(error.clone());
            Outcome::changed()
        }
        ShoppingAction::LoadProductsForCategory { key, page } => {
            let due = state.listing.begin_fetch(key);
            Outcome::fetch(due.then(|| FetchRequest::CategoryProducts {
                key: key.clone(),
                page: *page,
            }))
        }
        ShoppingAction::SearchProducts { key, page } => {
            let due = state.listing.begin_fetch(key);
            Outcome::fetch(due.then(|| FetchRequest::Search {
                key: key.clone(),
                page: *page,
            }))
        }
        ShoppingAction::LoadProductsForFilter {
            key,
            page,
            search_parameter,
        } => {
            let due = state.listing.begin_fetch(key);
            Outcome::fetch(due.then(|| FetchRequest::Filter {
                key: key.clone(),
                page: *page,
                search_parameter: search_parameter.clone(),
            }))
        }
        ShoppingAction::SetProductSkusForCategory { key, listing, .. }
        | ShoppingAction::SetProductListingSkus { key, listing, .. } => {
            state.listing.set_skus(key, listing.clone());
            Outcome::changed()
        }
        ShoppingAction::LoadProductListingFail { key, page, error } => {
            state.listing.fail(key, *page, error.clone());
            Outcome::changed()
        }
        ShoppingAction::SetProductListingPages { key, page } => {
            let page_size = ctx.config.page_size(key.id.kind());
            state.listing.set_pages(key, *page, page_size);
            Outcome::changed()
        }
        ShoppingAction::ApplyFilter { .. } => {
            // explicit filters take over from the route query
            state.listing.watch = None;
            Outcome::changed()
        }
        ShoppingAction::SetViewType {
            view_type,
            from_query,
        } => {
            if *from_query {
                state.listing.query_view = Some(*view_type);
            }
            let changed = state.listing.view_type != *view_type;
            state.listing.view_type = *view_type;
            Outcome {
                changed,
                ..Default::default()
            }
        }

        // ========== Filter navigation ==========
        ShoppingAction::LoadFilterNavigation { id, filters } => {
            let Some(source) = FilterSource::for_listing(id, filters.as_deref()) else {
                return Outcome::unchanged();
            };
            if !state.filter.begin_load(id, filters.as_deref()) {
                debug!(source = %source, "Filter navigation already requested");
                return Outcome::unchanged();
            }
            Outcome::fetch(Some(FetchRequest::FilterNavigation {
                id: id.clone(),
                filters: filters.clone(),
                source,
            }))
        }
        ShoppingAction::LoadFilterNavigationSuccess {
            id,
            filters,
            navigation,
        } => Outcome {
            changed: state.filter.set(id, filters.as_deref(), navigation.clone()),
            ..Default::default()
        },
        ShoppingAction::LoadFilterNavigationFail { id, filters, error } => Outcome {
            changed: state.filter.fail(id, filters.as_deref(), error.clone()),
            ..Default::default()
        },

        // ========== Recently viewed ==========
        ShoppingAction::AddToRecently { sku } => {
            state.recently.record(sku);
            if state.selection.product.as_deref() == Some(sku.as_str()) {
                state.selection.product_recorded = true;
            }
            Outcome::changed()
        }

        ShoppingAction::ResetStore => {
            state.reset();
            Outcome::changed()
        }
    }
}
