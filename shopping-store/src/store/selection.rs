//! Selection Tracker

use serde::Serialize;

/// Currently selected category and product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub category: Option<String>,
    pub product: Option<String>,
    /// Whether the selected product has been written to the recently-viewed log
    pub product_recorded: bool,
}

impl Selection {
    /// Returns `true` if the selection changed
    pub fn select_category(&mut self, unique_id: Option<String>) -> bool {
        if self.category == unique_id {
            return false;
        }
        self.category = unique_id;
        true
    }

    /// Returns `true` if the selection changed
    ///
    /// A change resets the recorded flag so the next visit is recorded again.
    pub fn select_product(&mut self, sku: Option<String>) -> bool {
        if self.product == sku {
            return false;
        }
        self.product = sku;
        self.product_recorded = false;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.product.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reselecting_same_product_keeps_recorded_flag() {
        let mut selection = Selection::default();
        assert!(selection.select_product(Some("P1".into())));
        selection.product_recorded = true;

        assert!(!selection.select_product(Some("P1".into())));
        assert!(selection.product_recorded);

        assert!(selection.select_product(None));
        assert!(!selection.product_recorded);
    }
}
