//! Filter navigation loader
//!
//! Every listing shown asks for the filters of its identity. The reducer
//! drops requests for the identity it already holds, so sorting and paging
//! through the same listing fetch its filters once.

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::ListingKind;

pub struct FilterNavigationEffect;

impl Effect for FilterNavigationEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::LoadMoreProductsForParams { key, .. } = action else {
            return Vec::new();
        };
        if key.id.kind() == ListingKind::Master
            || state.filter.is_current(&key.id, key.filters.as_deref())
        {
            return Vec::new();
        }
        vec![ShoppingAction::LoadFilterNavigation {
            id: key.id.clone(),
            filters: key.filters.clone(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreConfig;
    use crate::sync::effects::test_support::empty_state;
    use shared::models::{ListingId, ListingKey};

    fn run(state: &ShoppingState, key: ListingKey, page: u32) -> Vec<ShoppingAction> {
        let config = StoreConfig::default();
        FilterNavigationEffect.run(
            &ShoppingAction::LoadMoreProductsForParams { key, page },
            state,
            &Context::new(&config, 0),
        )
    }

    #[test]
    fn test_other_pages_and_sortings_reuse_navigation() {
        let config = StoreConfig::default();
        let mut state = empty_state(&config);
        let id = ListingId::category("A.1");
        let key = ListingKey::plain(id.clone()).unwrap();

        assert_eq!(
            run(&state, key.clone(), 1),
            vec![ShoppingAction::LoadFilterNavigation {
                id: id.clone(),
                filters: None,
            }]
        );

        state.filter.begin_load(&id, None);
        assert!(run(&state, key, 2).is_empty());
        let sorted = ListingKey::new(id.clone(), Some("name-desc".into()), None).unwrap();
        assert!(run(&state, sorted, 1).is_empty());

        let filtered = ListingKey::new(id, None, Some("color=red".into())).unwrap();
        assert_eq!(run(&state, filtered, 1).len(), 1);
    }

    #[test]
    fn test_master_listing_has_no_filters() {
        let config = StoreConfig::default();
        let state = empty_state(&config);
        let key = ListingKey::plain(ListingId::master("M1")).unwrap();
        assert!(run(&state, key, 1).is_empty());
    }
}
