//! Product selection and recently-viewed effects
//!
//! A selected product is recorded once it is resident: right away when it
//! already is, otherwise when its load succeeds. The recorded flag on the
//! selection keeps forced reloads (locale change) from recording it twice.

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;

/// SelectProduct effect
pub struct ProductSelectionEffect;

impl Effect for ProductSelectionEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::SelectProduct(Some(sku)) = action else {
            return Vec::new();
        };
        if !state.products.contains(sku) {
            return vec![ShoppingAction::load_product(sku.clone())];
        }
        if state.selection.product_recorded {
            return Vec::new();
        }
        vec![ShoppingAction::AddToRecently { sku: sku.clone() }]
    }
}

/// LoadProductSuccess effect recording the selected product
pub struct RecentlyViewedEffect;

impl Effect for RecentlyViewedEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        _ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::LoadProductSuccess { product } = action else {
            return Vec::new();
        };
        let selected = state.selection.product.as_deref() == Some(product.sku.as_str());
        if !selected || state.selection.product_recorded {
            return Vec::new();
        }
        vec![ShoppingAction::AddToRecently {
            sku: product.sku.clone(),
        }]
    }
}
