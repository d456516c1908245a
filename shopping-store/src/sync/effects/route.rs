//! RouteNavigated effect
//!
//! Translates a route resolution into selection changes, the query-driven
//! view type, the once-per-locale top-level category load, and search
//! listings.

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::{ListingId, ViewType};
use tracing::debug;

/// RouteNavigated effect
pub struct RouteEffect;

impl Effect for RouteEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::RouteNavigated(route) = action else {
            return Vec::new();
        };
        let mut out = Vec::new();

        let category = route.category_unique_id().map(str::to_string);
        if category != state.selection.category {
            out.push(ShoppingAction::SelectCategory(category));
        }
        let sku = route.sku().map(str::to_string);
        if sku != state.selection.product {
            out.push(ShoppingAction::SelectProduct(sku));
        }

        if let Some(raw) = route.view() {
            match raw.parse::<ViewType>() {
                Ok(view_type) if state.listing.query_view != Some(view_type) => {
                    out.push(ShoppingAction::SetViewType {
                        view_type,
                        from_query: true,
                    });
                }
                Ok(_) => {}
                Err(e) => debug!(view = %raw, "Ignoring view parameter: {}", e.message),
            }
        }

        if !state.top_level.contains_key(&state.locale) {
            out.push(ShoppingAction::LoadTopLevelCategories {
                depth: ctx.config.main_navigation_max_sub_categories_depth,
                force: false,
            });
        }

        if let Some(term) = route.search_term() {
            let id = ListingId::search(term);
            if state.listing.watch.as_ref().is_none_or(|w| w.id != id) {
                out.push(ShoppingAction::LoadMoreProducts { id, page: 1 });
            }
        }

        out
    }
}
