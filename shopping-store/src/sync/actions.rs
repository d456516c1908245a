//! Shopping actions
//!
//! Every state change goes through one of these. Processed actions are
//! broadcast in processing order, so the action log doubles as a trace of
//! what the store did.

use serde::Serialize;
use shared::error::AppError;
use shared::models::{
    Category, FilterNavigation, ListingId, ListingKey, Product, ProductListing, RouteResolution,
    ViewType,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ShoppingAction {
    // ========== Routing & selection ==========
    RouteNavigated(RouteResolution),
    SelectCategory(Option<String>),
    SelectProduct(Option<String>),
    SelectLocale(String),
    /// Redirect request for the route sink
    Navigate { path: String },

    // ========== Categories ==========
    LoadTopLevelCategories { depth: u32, force: bool },
    LoadTopLevelCategoriesSuccess { locale: String, categories: Vec<Category> },
    LoadTopLevelCategoriesFail { locale: String, error: AppError },
    LoadCategory { unique_id: String, force: bool },
    LoadCategorySuccess { category: Category },
    LoadCategoryFail { unique_id: String, error: AppError },

    // ========== Products ==========
    LoadProduct { sku: String, force: bool },
    LoadProductSuccess { product: Product },
    LoadProductFail { sku: String, error: AppError },

    // ========== Product listings ==========
    LoadMoreProducts { id: ListingId, page: u32 },
    LoadMoreProductsForParams { key: ListingKey, page: u32 },
    LoadMoreProductsFail { id: ListingId, error: AppError },
    LoadProductsForCategory { key: ListingKey, page: u32 },
    SearchProducts { key: ListingKey, page: u32 },
    LoadProductsForFilter { key: ListingKey, page: u32, search_parameter: String },
    SetProductSkusForCategory { key: ListingKey, page: u32, listing: ProductListing },
    SetProductListingSkus { key: ListingKey, page: u32, listing: ProductListing },
    LoadProductListingFail { key: ListingKey, page: u32, error: AppError },
    SetProductListingPages { key: ListingKey, page: u32 },
    ApplyFilter { key: ListingKey },
    SetViewType { view_type: ViewType, from_query: bool },

    // ========== Filter navigation ==========
    LoadFilterNavigation { id: ListingId, filters: Option<String> },
    LoadFilterNavigationSuccess {
        id: ListingId,
        filters: Option<String>,
        navigation: FilterNavigation,
    },
    LoadFilterNavigationFail { id: ListingId, filters: Option<String>, error: AppError },

    // ========== Recently viewed ==========
    AddToRecently { sku: String },

    ResetStore,
}

/// Payload-free action discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionType {
    RouteNavigated,
    SelectCategory,
    SelectProduct,
    SelectLocale,
    Navigate,
    LoadTopLevelCategories,
    LoadTopLevelCategoriesSuccess,
    LoadTopLevelCategoriesFail,
    LoadCategory,
    LoadCategorySuccess,
    LoadCategoryFail,
    LoadProduct,
    LoadProductSuccess,
    LoadProductFail,
    LoadMoreProducts,
    LoadMoreProductsForParams,
    LoadMoreProductsFail,
    LoadProductsForCategory,
    SearchProducts,
    LoadProductsForFilter,
    SetProductSkusForCategory,
    SetProductListingSkus,
    LoadProductListingFail,
    SetProductListingPages,
    ApplyFilter,
    SetViewType,
    LoadFilterNavigation,
    LoadFilterNavigationSuccess,
    LoadFilterNavigationFail,
    AddToRecently,
    ResetStore,
}

impl ShoppingAction {
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::RouteNavigated(_) => ActionType::RouteNavigated,
            Self::SelectCategory(_) => ActionType::SelectCategory,
            Self::SelectProduct(_) => ActionType::SelectProduct,
            Self::SelectLocale(_) => ActionType::SelectLocale,
            Self::Navigate { .. } => ActionType::Navigate,
            Self::LoadTopLevelCategories { .. } => ActionType::LoadTopLevelCategories,
            Self::LoadTopLevelCategoriesSuccess { .. } => ActionType::LoadTopLevelCategoriesSuccess,
            Self::LoadTopLevelCategoriesFail { .. } => ActionType::LoadTopLevelCategoriesFail,
            Self::LoadCategory { .. } => ActionType::LoadCategory,
            Self::LoadCategorySuccess { .. } => ActionType::LoadCategorySuccess,
            Self::LoadCategoryFail { .. } => ActionType::LoadCategoryFail,
            Self::LoadProduct { .. } => ActionType::LoadProduct,
            Self::LoadProductSuccess { .. } => ActionType::LoadProductSuccess,
            Self::LoadProductFail { .. } => ActionType::LoadProductFail,
            Self::LoadMoreProducts { .. } => ActionType::LoadMoreProducts,
            Self::LoadMoreProductsForParams { .. } => ActionType::LoadMoreProductsForParams,
            Self::LoadMoreProductsFail { .. } => ActionType::LoadMoreProductsFail,
            Self::LoadProductsForCategory { .. } => ActionType::LoadProductsForCategory,
            Self::SearchProducts { .. } => ActionType::SearchProducts,
            Self::LoadProductsForFilter { .. } => ActionType::LoadProductsForFilter,
            Self::SetProductSkusForCategory { .. } => ActionType::SetProductSkusForCategory,
            Self::SetProductListingSkus { .. } => ActionType::SetProductListingSkus,
            Self::LoadProductListingFail { .. } => ActionType::LoadProductListingFail,
            Self::SetProductListingPages { .. } => ActionType::SetProductListingPages,
            Self::ApplyFilter { .. } => ActionType::ApplyFilter,
            Self::SetViewType { .. } => ActionType::SetViewType,
            Self::LoadFilterNavigation { .. } => ActionType::LoadFilterNavigation,
            Self::LoadFilterNavigationSuccess { .. } => ActionType::LoadFilterNavigationSuccess,
            Self::LoadFilterNavigationFail { .. } => ActionType::LoadFilterNavigationFail,
            Self::AddToRecently { .. } => ActionType::AddToRecently,
            Self::ResetStore => ActionType::ResetStore,
        }
    }

    /// Shorthand for a plain category load
    pub fn load_category(unique_id: impl Into<String>) -> Self {
        Self::LoadCategory {
            unique_id: unique_id.into(),
            force: false,
        }
    }

    /// Shorthand for a plain product load
    pub fn load_product(sku: impl Into<String>) -> Self {
        Self::LoadProduct {
            sku: sku.into(),
            force: false,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type() {
        assert_eq!(
            ShoppingAction::load_category("A").action_type(),
            ActionType::LoadCategory
        );
        assert_eq!(ActionType::LoadProductFail.to_string(), "LoadProductFail");
    }

    #[test]
    fn test_action_serializes_with_type_tag() {
        let json = serde_json::to_value(ShoppingAction::load_product("P1")).unwrap();
        assert_eq!(json["type"], "LoadProduct");
        assert_eq!(json["payload"]["sku"], "P1");
    }
}
