//! Listing parameter resolution
//!
//! `LoadMoreProducts` names a listing and a page; sorting, filters and the
//! page actually shown come from the route query (`page` in the query wins).
//! While the listing stays tied to the current route, every navigation
//! re-derives the parameters and re-emits only when they changed.

use super::Effect;
use crate::store::{PageRef, ShoppingState};
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::error::AppResult;
use shared::models::{ListingId, ListingKey, RouteResolution};
use tracing::debug;

pub struct ListingParamsEffect;

impl Effect for ListingParamsEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        match action {
            ShoppingAction::LoadMoreProducts { id, page } => {
                match derive_params(id, *page, state.router.current.as_ref()) {
                    Ok(view) => vec![for_params(view)],
                    Err(error) => vec![ShoppingAction::LoadMoreProductsFail {
                        id: id.clone(),
                        error,
                    }],
                }
            }
            ShoppingAction::ApplyFilter { key } => vec![for_params(PageRef::new(key.clone(), 1))],
            ShoppingAction::RouteNavigated(route) => {
                let Some(watch) = &state.listing.watch else {
                    return Vec::new();
                };
                if !is_tied(&watch.id, route) {
                    return Vec::new();
                }
                match derive_params(&watch.id, watch.page, Some(route)) {
                    Ok(view) if state.listing.active.as_ref() != Some(&view) => {
                        debug!(key = %view.key, page = view.page, "Listing parameters changed");
                        vec![for_params(view)]
                    }
                    Ok(_) => Vec::new(),
                    Err(error) if state.listing.last_error.as_ref() != Some(&error) => {
                        vec![ShoppingAction::LoadMoreProductsFail {
                            id: watch.id.clone(),
                            error,
                        }]
                    }
                    Err(_) => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}

fn for_params(view: PageRef) -> ShoppingAction {
    ShoppingAction::LoadMoreProductsForParams {
        key: view.key,
        page: view.page,
    }
}

/// Listing key and page for `id` under the given route query
pub fn derive_params(
    id: &ListingId,
    page: u32,
    route: Option<&RouteResolution>,
) -> AppResult<PageRef> {
    let sorting = route.and_then(|r| r.sorting()).map(str::to_string);
    let filters = route.and_then(|r| r.filters()).map(str::to_string);
    let page = route.and_then(RouteResolution::page).unwrap_or(page);
    let key = ListingKey::new(id.clone(), sorting, filters)?;
    Ok(PageRef::new(key, page))
}

/// Whether the route still shows the listing
fn is_tied(id: &ListingId, route: &RouteResolution) -> bool {
    match id {
        ListingId::Category(unique_id) => {
            route.category_unique_id() == Some(unique_id.as_str()) && route.sku().is_none()
        }
        ListingId::Search(term) => route.search_term() == Some(term.as_str()),
        ListingId::Master(sku) => route.sku() == Some(sku.as_str()),
    }
}
