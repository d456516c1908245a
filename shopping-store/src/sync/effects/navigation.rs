//! Not-found redirect
//!
//! Only a not-found failure that still concerns the current selection
//! redirects: the failed category must be the selected one or one of its
//! ancestors, the failed product must be the selected one. The redirect
//! clears the selection, so later failures of the same chain are no longer
//! relevant and the redirect happens once.
//!
//! Selecting an id that already failed terminally redirects right away,
//! since no fetch will be issued and no failure action will follow.

use super::Effect;
use crate::store::{LoadStatus, ShoppingState};
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::unique_id;
use tracing::{info, warn};

/// LoadCategoryFail / LoadProductFail / selection effect
pub struct RedirectEffect;

impl Effect for RedirectEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let relevant = match action {
            ShoppingAction::LoadCategoryFail {
                unique_id: failed,
                error,
            } if error.is_not_found() => state
                .selection
                .category
                .as_deref()
                .is_some_and(|selected| unique_id::is_self_or_ancestor(failed, selected)),
            ShoppingAction::LoadProductFail { sku, error } if error.is_not_found() => {
                state.selection.product.as_deref() == Some(sku.as_str())
            }
            ShoppingAction::SelectCategory(Some(selected)) => unique_id::ancestors(selected)
                .iter()
                .any(|id| {
                    settled_not_found(state.categories.status(id))
                        && !state.categories.needs_load(id, ctx.now, ctx.load_policy())
                }),
            ShoppingAction::SelectProduct(Some(sku)) => {
                settled_not_found(state.products.status(sku))
                    && !state.products.needs_load(sku, ctx.now, ctx.load_policy())
            }
            _ => false,
        };
        if !relevant {
            return Vec::new();
        }
        warn!(
            action = %action.action_type(),
            route = %ctx.config.error_route,
            "Selected entity not found, redirecting"
        );
        vec![ShoppingAction::Navigate {
            path: ctx.config.error_route.clone(),
        }]
    }
}

fn settled_not_found(status: Option<&LoadStatus>) -> bool {
    status
        .and_then(LoadStatus::error)
        .is_some_and(|error| error.is_not_found())
}

/// Navigate effect resetting the selection
pub struct NavigateEffect;

impl Effect for NavigateEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::Navigate { path } = action else {
            return Vec::new();
        };
        info!(path = %path, "Navigating away, clearing selection");
        let mut out = Vec::new();
        if state.selection.category.is_some() {
            out.push(ShoppingAction::SelectCategory(None));
        }
        if state.selection.product.is_some() {
            out.push(ShoppingAction::SelectProduct(None));
        }
        out
    }
}
