//! Effect implementations
//!
//! Each effect implements the `Effect` trait and derives the follow-up
//! actions of one pipeline. Effects are PURE functions of the processed
//! action and the state the reducer left behind; they never mutate state.

use enum_dispatch::enum_dispatch;

use super::Context;
use super::actions::{ActionType, ShoppingAction};
use crate::store::ShoppingState;

mod category_selection;
mod filter_navigation;
mod listing_pages;
mod listing_params;
mod listing_trigger;
mod listing_view;
mod locale;
mod navigation;
mod product_selection;
mod route;

pub use category_selection::CategorySelectionEffect;
pub use filter_navigation::FilterNavigationEffect;
pub use listing_pages::ListingPagesEffect;
pub use listing_params::ListingParamsEffect;
pub use listing_trigger::ListingTriggerEffect;
pub use listing_view::ListingViewEffect;
pub use locale::LocaleEffect;
pub use navigation::{NavigateEffect, RedirectEffect};
pub use product_selection::{ProductSelectionEffect, RecentlyViewedEffect};
pub use route::RouteEffect;

/// Follow-up action derivation for one pipeline
#[enum_dispatch]
pub trait Effect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction>;
}

/// EffectAction enum - dispatches to concrete effect implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(Effect)]
pub enum EffectAction {
    Route(RouteEffect),
    CategorySelection(CategorySelectionEffect),
    ProductSelection(ProductSelectionEffect),
    RecentlyViewed(RecentlyViewedEffect),
    ListingTrigger(ListingTriggerEffect),
    ListingParams(ListingParamsEffect),
    ListingView(ListingViewEffect),
    ListingPages(ListingPagesEffect),
    FilterNavigation(FilterNavigationEffect),
    Redirect(RedirectEffect),
    Navigate(NavigateEffect),
    Locale(LocaleEffect),
}

/// Effects interested in an action, in the order their output is queued
///
/// This is the ONLY place with a match on the action type.
pub fn effects_for(action: &ShoppingAction) -> Vec<EffectAction> {
    use ActionType as T;
    match action.action_type() {
        T::RouteNavigated => vec![RouteEffect.into(), ListingParamsEffect.into()],
        T::SelectCategory => vec![
            CategorySelectionEffect.into(),
            ListingTriggerEffect.into(),
            RedirectEffect.into(),
        ],
        T::SelectProduct => vec![
            ProductSelectionEffect.into(),
            ListingTriggerEffect.into(),
            RedirectEffect.into(),
        ],
        T::SelectLocale => vec![LocaleEffect.into()],
        T::Navigate => vec![NavigateEffect.into()],
        T::LoadTopLevelCategoriesSuccess | T::LoadCategorySuccess => {
            vec![ListingTriggerEffect.into()]
        }
        T::LoadCategoryFail | T::LoadProductFail => vec![RedirectEffect.into()],
        T::LoadProductSuccess => vec![RecentlyViewedEffect.into(), ListingPagesEffect.into()],
        T::LoadMoreProducts | T::ApplyFilter => vec![ListingParamsEffect.into()],
        T::LoadMoreProductsForParams => {
            vec![ListingViewEffect.into(), FilterNavigationEffect.into()]
        }
        T::SetProductSkusForCategory | T::SetProductListingSkus => {
            vec![ListingPagesEffect.into()]
        }
        _ => Vec::new(),
    }
}

/// Run every interested effect and collect the follow-ups
pub fn run_effects(
    action: &ShoppingAction,
    state: &ShoppingState,
    ctx: &Context<'_>,
) -> Vec<ShoppingAction> {
    effects_for(action)
        .iter()
        .flat_map(|effect| effect.run(action, state, ctx))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::StoreConfig;
    use crate::store::ShoppingState;
    use shared::models::{Category, CategoryData, Product, flatten_tree};

    /// A → 123 → 456 (with products), plus B
    pub fn catalog_state(config: &StoreConfig) -> ShoppingState {
        let mut state = ShoppingState::new(config);
        let tree = vec![
            CategoryData {
                id: "A".into(),
                has_online_sub_categories: true,
                sub_categories: vec![CategoryData {
                    id: "123".into(),
                    has_online_sub_categories: true,
                    sub_categories: vec![CategoryData {
                        id: "456".into(),
                        has_online_products: true,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            },
            CategoryData {
                id: "B".into(),
                ..Default::default()
            },
        ];
        state.categories.upsert_all(flatten_tree(tree), 0);
        state
    }

    pub fn empty_state(config: &StoreConfig) -> ShoppingState {
        ShoppingState::new(config)
    }

    pub fn with_products(mut state: ShoppingState, skus: &[&str]) -> ShoppingState {
        for sku in skus {
            state.products.upsert(Product::new(*sku), 0);
        }
        state
    }

    pub fn leaf() -> Category {
        Category {
            has_online_products: true,
            ..Category::new("A.123.456")
        }
    }
}
