//! LoadMoreProductsForParams effect
//!
//! Shows the page right away when it is resident. Otherwise loads what is
//! missing: the page's products when the sku sequence is known, else the
//! sequence itself through the endpoint matching the listing.

use super::Effect;
use crate::store::listing::search_parameter;
use crate::store::{ShoppingState, ViewResolution};
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::ListingKind;

pub struct ListingViewEffect;

impl Effect for ListingViewEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::LoadMoreProductsForParams { key, page } = action else {
            return Vec::new();
        };
        let (key, page) = (key.clone(), *page);
        let page_size = ctx.config.page_size(key.id.kind());

        match state
            .listing
            .resolve_view(&key, page, page_size, &state.products)
        {
            ViewResolution::Available => {
                vec![ShoppingAction::SetProductListingPages { key, page }]
            }
            ViewResolution::MissingProducts(skus) => {
                let policy = ctx.load_policy();
                skus.into_iter()
                    .filter(|sku| state.products.needs_load(sku, ctx.now, policy))
                    .map(ShoppingAction::load_product)
                    .collect()
            }
            ViewResolution::Pending => Vec::new(),
            ViewResolution::FetchRequired => {
                if let Some(filters) = &key.filters {
                    let search_parameter = search_parameter(filters);
                    return vec![ShoppingAction::LoadProductsForFilter {
                        key,
                        page,
                        search_parameter,
                    }];
                }
                match key.id.kind() {
                    ListingKind::Category => {
                        vec![ShoppingAction::LoadProductsForCategory { key, page }]
                    }
                    ListingKind::Search => vec![ShoppingAction::SearchProducts { key, page }],
                    // variations arrive through SetProductListingSkus
                    ListingKind::Master => Vec::new(),
                }
            }
        }
    }
}
