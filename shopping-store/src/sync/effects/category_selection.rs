//! SelectCategory effect
//!
//! Requests the ancestor chain of the selected category, root to leaf,
//! skipping entries that are resident, in flight, or terminally failed.

use super::Effect;
use crate::store::ShoppingState;
use crate::sync::Context;
use crate::sync::actions::ShoppingAction;
use shared::models::unique_id;

/// SelectCategory effect
pub struct CategorySelectionEffect;

impl Effect for CategorySelectionEffect {
    fn run(
        &self,
        action: &ShoppingAction,
        state: &ShoppingState,
        ctx: &Context<'_>,
    ) -> Vec<ShoppingAction> {
        let ShoppingAction::SelectCategory(Some(selected)) = action else {
            return Vec::new();
        };
        let policy = ctx.load_policy();
        unique_id::ancestors(selected)
            .into_iter()
            .filter(|id| state.categories.needs_load(id, ctx.now, policy))
            .map(ShoppingAction::load_category)
            .collect()
    }
}
