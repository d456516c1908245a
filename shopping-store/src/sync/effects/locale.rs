//! SelectLocale effect

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;

/// Reloads locale-dependent data after a locale change
///
/// Top-level categories and the selected product are fetched again. The
/// product reload is forced, but the selection keeps its recorded flag, so
/// the product is not appended to the recently-viewed log a second time.
pub struct LocaleEffect;

impl Effect for LocaleEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        if !matches!(action, ShoppingAction::SelectLocale(_)) {
            return Vec::new();
        }
        let mut out = vec![ShoppingAction::LoadTopLevelCategories {
            depth: ctx.config.main_navigation_max_sub_categories_depth,
            force: true,
        }];
        if let Some(sku) = &state.selection.product {
            out.push(ShoppingAction::LoadProduct {
                sku: sku.clone(),
                force: true,
            });
        }
        out
    }
}
