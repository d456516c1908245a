//! Listing page completion
//!
//! When skus arrive, the products of the waiting page (or of the page the
//! fetch was issued for) are requested. Once every product of the waiting
//! page is resident the page is materialized.

use super::Effect;
use crate::store::{ShoppingState, ViewResolution};
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::page_slice;

pub struct ListingPagesEffect;

impl Effect for ListingPagesEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let mut out = Vec::new();

        if let ShoppingAction::SetProductSkusForCategory { key, page, listing }
        | ShoppingAction::SetProductListingSkus { key, page, listing } = action
        {
            let page = match &state.listing.pending_view {
                Some(pending) if &pending.key == key => pending.page,
                _ => *page,
            };
            let page_size = ctx.config.page_size(key.id.kind());
            let policy = ctx.load_policy();
            out.extend(
                page_slice(&listing.skus, page, page_size)
                    .iter()
                    .filter(|sku| state.products.needs_load(sku, ctx.now, policy))
                    .cloned()
                    .map(ShoppingAction::load_product),
            );
        }

        if let Some(pending) = &state.listing.pending_view {
            let page_size = ctx.config.page_size(pending.key.id.kind());
            let resolution =
                state
                    .listing
                    .resolve_view(&pending.key, pending.page, page_size, &state.products);
            if resolution == ViewResolution::Available {
                out.push(ShoppingAction::SetProductListingPages {
                    key: pending.key.clone(),
                    page: pending.page,
                });
            }
        }
        out
    }
}
