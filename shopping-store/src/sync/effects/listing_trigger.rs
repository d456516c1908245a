//! Category listing trigger
//!
//! A category page shows products once the selected category is resident,
//! reports online products, and no product is selected. Fires on selection
//! changes and whenever categories arrive; does nothing while the category
//! listing is already the one being shown.

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::ListingId;

pub struct ListingTriggerEffect;

impl Effect for ListingTriggerEffect {
    fn run(
        &self,
        _action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let Some(category) = state.selected_category() else {
            return Vec::new();
        };
        if !category.has_online_products || state.selection.product.is_some() {
            return Vec::new();
        }

        let id = ListingId::category(category.unique_id.clone());
        let listing = &state.listing;
        let showing = listing.watch.as_ref().is_some_and(|w| w.id == id)
            && listing
                .active
                .as_ref()
                .is_some_and(|a| a.key.id == id && listing.is_requested(&a.key));
        if showing {
            return Vec::new();
        }
        vec![ShoppingAction::LoadMoreProducts { id, page: 1 }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreConfig;
    use crate::store::{PageRef, ParamsWatch};
    use crate::sync::effects::test_support::{catalog_state, leaf};
    use shared::models::ListingKey;

    #[test]
    fn test_leaf_with_products_triggers_listing() {
        let config = StoreConfig::default();
        let mut state = catalog_state(&config);
        state.selection.select_category(Some("A.123.456".into()));
        let action = ShoppingAction::LoadCategorySuccess { category: leaf() };
        let out = ListingTriggerEffect.run(&action, &state, &Context::new(&config, 0));
        assert_eq!(
            out,
            vec![ShoppingAction::LoadMoreProducts {
                id: ListingId::category("A.123.456"),
                page: 1
            }]
        );
    }

    #[test]
    fn test_no_listing_when_product_selected_or_no_products() {
        let config = StoreConfig::default();
        let ctx = Context::new(&config, 0);
        let mut state = catalog_state(&config);
        state.selection.select_category(Some("A.123".into()));
        let action = ShoppingAction::SelectCategory(Some("A.123".into()));
        assert!(ListingTriggerEffect.run(&action, &state, &ctx).is_empty());

        state.selection.select_category(Some("A.123.456".into()));
        state.selection.select_product(Some("P1".into()));
        assert!(ListingTriggerEffect.run(&action, &state, &ctx).is_empty());
    }

    #[test]
    fn test_listing_already_shown_is_not_requested_again() {
        let config = StoreConfig::default();
        let mut state = catalog_state(&config);
        state.selection.select_category(Some("A.123.456".into()));
        let id = ListingId::category("A.123.456");
        let key = ListingKey::plain(id.clone()).unwrap();
        state.listing.watch = Some(ParamsWatch {
            id: id.clone(),
            page: 1,
        });
        state.listing.active = Some(PageRef::new(key.clone(), 1));
        state.listing.begin_fetch(&key);

        let action = ShoppingAction::SelectProduct(None);
        assert!(
            ListingTriggerEffect
                .run(&action, &state, &Context::new(&config, 0))
                .is_empty()
        );
    }
}
