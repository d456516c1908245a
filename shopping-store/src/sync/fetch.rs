//! Fetch requests
//!
//! The reducer decides *that* something must be fetched and returns a
//! [`FetchRequest`]; the runtime spawns [`FetchRequest::execute`] and feeds the
//! resulting completion action back into the dispatcher.

use super::actions::ShoppingAction;
use crate::services::{FetchError, Services};
use crate::store::listing::search_parameter;
use shared::error::AppError;
use shared::models::{ListingId, ListingKey, ListingKind};
use std::fmt;
use tracing::{debug, warn};

/// Endpoint a filter navigation is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    Category(String),
    Search(String),
    /// Encoded filter selection
    Params(String),
}

impl FilterSource {
    /// Source for a listing identity; master listings have no filters
    pub fn for_listing(id: &ListingId, filters: Option<&str>) -> Option<Self> {
        if let Some(filters) = filters {
            return Some(Self::Params(search_parameter(filters)));
        }
        match id.kind() {
            ListingKind::Category => Some(Self::Category(id.value().to_string())),
            ListingKind::Search => Some(Self::Search(id.value().to_string())),
            ListingKind::Master => None,
        }
    }
}

impl fmt::Display for FilterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(unique_id) => write!(f, "category:{}", unique_id),
            Self::Search(term) => write!(f, "search:{}", term),
            Self::Params(param) => write!(f, "params:{}", param),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    TopLevelCategories { locale: String, depth: u32 },
    Category { unique_id: String },
    Product { sku: String },
    CategoryProducts { key: ListingKey, page: u32 },
    Search { key: ListingKey, page: u32 },
    Filter { key: ListingKey, page: u32, search_parameter: String },
    FilterNavigation {
        id: ListingId,
        filters: Option<String>,
        source: FilterSource,
    },
}

impl FetchRequest {
    /// Short description for logs
    pub fn target(&self) -> String {
        match self {
            Self::TopLevelCategories { locale, depth } => {
                format!("top-level[{}; depth {}]", locale, depth)
            }
            Self::Category { unique_id } => format!("category:{}", unique_id),
            Self::Product { sku } => format!("product:{}", sku),
            Self::CategoryProducts { key, page }
            | Self::Search { key, page }
            | Self::Filter { key, page, .. } => format!("listing:{}#{}", key, page),
            Self::FilterNavigation { source, .. } => format!("filter-navigation:{}", source),
        }
    }

    /// Run the fetch and turn its result into a completion action
    ///
    /// Failures never escape as errors; they become `*Fail` actions.
    pub async fn execute(self, services: &Services) -> ShoppingAction {
        let target = self.target();
        debug!(fetch = %target, "Fetching");

        let action = match self {
            Self::TopLevelCategories { locale, depth } => {
                match services.categories.get_top_level_categories(depth).await {
                    Ok(categories) => {
                        ShoppingAction::LoadTopLevelCategoriesSuccess { locale, categories }
                    }
                    Err(e) => ShoppingAction::LoadTopLevelCategoriesFail {
                        locale,
                        error: match e {
                            FetchError::NotFound(msg) => AppError::not_found(msg),
                            FetchError::Transport(msg) => AppError::transport(msg),
                        },
                    },
                }
            }
            Self::Category { unique_id } => {
                match services.categories.get_category(&unique_id).await {
                    Ok(category) => ShoppingAction::LoadCategorySuccess { category },
                    Err(e) => ShoppingAction::LoadCategoryFail {
                        error: e.for_category(&unique_id),
                        unique_id,
                    },
                }
            }
            Self::Product { sku } => match services.products.get_product(&sku).await {
                Ok(product) => ShoppingAction::LoadProductSuccess { product },
                Err(e) => ShoppingAction::LoadProductFail {
                    error: e.for_product(&sku),
                    sku,
                },
            },
            Self::CategoryProducts { key, page } => {
                let result = services
                    .products
                    .get_category_products(key.id.value(), key.sorting.as_deref())
                    .await;
                match result {
                    Ok(listing) => ShoppingAction::SetProductSkusForCategory { key, page, listing },
                    Err(e) => listing_fail(key, page, e),
                }
            }
            Self::Search { key, page } => {
                let result = services
                    .products
                    .search_products(key.id.value(), key.sorting.as_deref())
                    .await;
                match result {
                    Ok(listing) => ShoppingAction::SetProductListingSkus { key, page, listing },
                    Err(e) => listing_fail(key, page, e),
                }
            }
            Self::Filter {
                key,
                page,
                search_parameter,
            } => {
                let result = services
                    .products
                    .get_filtered_products(&search_parameter, key.sorting.as_deref())
                    .await;
                match result {
                    Ok(listing) => ShoppingAction::SetProductListingSkus { key, page, listing },
                    Err(e) => listing_fail(key, page, e),
                }
            }
            Self::FilterNavigation {
                id,
                filters,
                source,
            } => {
                let filter = &services.filters;
                let result = match &source {
                    FilterSource::Category(unique_id) => {
                        filter.get_filter_for_category(unique_id).await
                    }
                    FilterSource::Search(term) => filter.get_filter_for_search(term).await,
                    FilterSource::Params(param) => filter.get_filter_for_params(param).await,
                };
                match result {
                    Ok(navigation) => ShoppingAction::LoadFilterNavigationSuccess {
                        id,
                        filters,
                        navigation,
                    },
                    Err(e) => ShoppingAction::LoadFilterNavigationFail {
                        error: e.for_filter(&id),
                        id,
                        filters,
                    },
                }
            }
        };

        if let ShoppingAction::LoadCategoryFail { error, .. }
        | ShoppingAction::LoadProductFail { error, .. }
        | ShoppingAction::LoadTopLevelCategoriesFail { error, .. }
        | ShoppingAction::LoadProductListingFail { error, .. }
        | ShoppingAction::LoadFilterNavigationFail { error, .. } = &action
        {
            warn!(fetch = %target, code = %error.code, "Fetch failed: {}", error.message);
        }
        action
    }
}

fn listing_fail(key: ListingKey, page: u32, e: FetchError) -> ShoppingAction {
    ShoppingAction::LoadProductListingFail {
        error: e.for_listing(&key),
        key,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryCatalog;
    use shared::ErrorCode;
    use shared::models::{ListingId, Product};
    use std::sync::Arc;

    fn services() -> Services {
        let catalog = InMemoryCatalog::new()
            .with_product(Product::new("P1"))
            .with_search("camera", &["P1"]);
        Services::in_memory(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_product_not_found_becomes_fail_action() {
        let action = FetchRequest::Product { sku: "P3".into() }
            .execute(&services())
            .await;
        match action {
            ShoppingAction::LoadProductFail { sku, error } => {
                assert_eq!(sku, "P3");
                assert_eq!(error.code, ErrorCode::ProductNotFound);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_fills_listing() {
        let key = ListingKey::plain(ListingId::search("camera")).unwrap();
        let action = FetchRequest::Search { key: key.clone(), page: 1 }
            .execute(&services())
            .await;
        assert_eq!(
            action,
            ShoppingAction::SetProductListingSkus {
                key,
                page: 1,
                listing: shared::models::ProductListing::new(vec!["P1".into()], Vec::new()),
            }
        );
    }

    #[test]
    fn test_filter_source_per_listing() {
        assert_eq!(
            FilterSource::for_listing(&ListingId::category("A.1"), None),
            Some(FilterSource::Category("A.1".into()))
        );
        assert_eq!(
            FilterSource::for_listing(&ListingId::search("camera"), Some("a=b")),
            Some(FilterSource::Params("YT1i".into()))
        );
        assert_eq!(
            FilterSource::for_listing(&ListingId::master("M1"), None),
            None
        );
    }

    #[tokio::test]
    async fn test_filter_navigation_for_unknown_category_fails() {
        let action = FetchRequest::FilterNavigation {
            id: ListingId::category("A.XXX"),
            filters: None,
            source: FilterSource::Category("A.XXX".into()),
        }
        .execute(&services())
        .await;
        assert!(matches!(
            action,
            ShoppingAction::LoadFilterNavigationFail { ref error, .. }
                if error.code == ErrorCode::NotFound
        ));
    }

    #[test]
    fn test_target() {
        let key = ListingKey::plain(ListingId::category("A.1")).unwrap();
        assert_eq!(
            FetchRequest::CategoryProducts { key, page: 2 }.target(),
            "listing:category:A.1#2"
        );
    }
}
