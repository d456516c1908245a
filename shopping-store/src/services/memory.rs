//! In-memory catalog
//!
//! Deterministic implementation of every fetch capability. Every call is
//! counted per target so coalescing can be observed, and an optional latency
//! keeps fetches in flight long enough for concurrent requests to overlap.

use super::{CategoriesService, FetchError, FilterService, ProductsService};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use shared::models::{
    Category, CategoryData, FilterNavigation, Product, ProductListing, flatten_tree,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Catalog file format
///
/// ```json
/// {
///   "categories": [{ "id": "A", "subCategories": [{ "id": "123" }] }],
///   "products": [{ "sku": "P1", "name": "Camera" }],
///   "categoryProducts": { "A.123": { "skus": ["P1"] } }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    #[serde(default)]
    pub categories: Vec<CategoryData>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub category_products: HashMap<String, ProductListing>,
    #[serde(default)]
    pub searches: HashMap<String, ProductListing>,
    /// Listings keyed by encoded filter search parameter
    #[serde(default)]
    pub filters: HashMap<String, ProductListing>,
    /// Filter navigation keyed by source
    /// (`category:A.1`, `search:term`, `params:<search parameter>`)
    #[serde(default)]
    pub filter_navigation: HashMap<String, FilterNavigation>,
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    roots: Vec<CategoryData>,
    categories: HashMap<String, Category>,
    products: HashMap<String, Product>,
    category_products: HashMap<String, ProductListing>,
    searches: HashMap<String, ProductListing>,
    filters: HashMap<String, ProductListing>,
    filter_navigation: HashMap<String, FilterNavigation>,
    /// Targets that fail with a transport error
    unavailable: HashSet<String>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: CatalogData) -> Self {
        let mut catalog = Self::new().with_category_tree(data.categories);
        for product in data.products {
            catalog = catalog.with_product(product);
        }
        catalog.category_products = data.category_products;
        catalog.searches = data.searches;
        catalog.filters = data.filters;
        catalog.filter_navigation = data.filter_navigation;
        catalog
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_data(serde_json::from_str(json)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::core::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    /// Add root category trees
    pub fn with_category_tree(mut self, roots: Vec<CategoryData>) -> Self {
        for category in flatten_tree(roots.clone()) {
            self.categories.insert(category.unique_id.clone(), category);
        }
        self.roots.extend(roots);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.sku.clone(), product);
        self
    }

    /// Register skus of a category; unknown skus are created as bare products
    pub fn with_category_products(mut self, unique_id: &str, skus: &[&str]) -> Self {
        let skus = self.ensure_products(skus);
        self.category_products
            .insert(unique_id.to_string(), ProductListing::new(skus, Vec::new()));
        self
    }

    /// Like [`with_category_products`](Self::with_category_products) but the
    /// listing references skus the catalog cannot deliver
    pub fn with_dangling_category_products(mut self, unique_id: &str, skus: &[&str]) -> Self {
        let skus = skus.iter().map(|s| s.to_string()).collect();
        self.category_products
            .insert(unique_id.to_string(), ProductListing::new(skus, Vec::new()));
        self
    }

    pub fn with_search(mut self, term: &str, skus: &[&str]) -> Self {
        let skus = self.ensure_products(skus);
        self.searches
            .insert(term.to_string(), ProductListing::new(skus, Vec::new()));
        self
    }

    pub fn with_filter(mut self, search_parameter: &str, skus: &[&str]) -> Self {
        let skus = self.ensure_products(skus);
        self.filters.insert(
            search_parameter.to_string(),
            ProductListing::new(skus, Vec::new()),
        );
        self
    }

    /// Register the filter navigation served for `source`
    ///
    /// `source` is `category:<unique id>`, `search:<term>` or
    /// `params:<search parameter>`.
    pub fn with_filter_navigation(mut self, source: &str, navigation: FilterNavigation) -> Self {
        self.filter_navigation.insert(source.to_string(), navigation);
        self
    }

    pub fn with_sort_keys(mut self, unique_id: &str, sort_keys: &[&str]) -> Self {
        if let Some(listing) = self.category_products.get_mut(unique_id) {
            listing.sort_keys = sort_keys.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    /// Make a fetch target fail with a transport error
    ///
    /// Targets are named like the call counters: `category:A`, `product:P1`,
    /// `top-level`, `category-products:A`, `search:term`, `filter:param`,
    /// `filter-navigation:<source>`.
    pub fn with_unavailable(mut self, target: &str) -> Self {
        self.unavailable.insert(target.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches issued for a target
    pub fn call_count(&self, target: &str) -> usize {
        self.calls.lock().get(target).copied().unwrap_or(0)
    }

    /// Total number of fetches issued
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    fn ensure_products(&mut self, skus: &[&str]) -> Vec<String> {
        skus.iter()
            .map(|sku| {
                self.products
                    .entry(sku.to_string())
                    .or_insert_with(|| Product::new(*sku));
                sku.to_string()
            })
            .collect()
    }

    async fn begin(&self, target: String) -> Result<(), FetchError> {
        *self.calls.lock().entry(target.clone()).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.contains(&target) {
            return Err(FetchError::Transport(format!("{} unavailable", target)));
        }
        Ok(())
    }

    /// Navigation registered for a source, empty when there is none
    async fn filter_navigation(&self, source: String) -> Result<FilterNavigation, FetchError> {
        self.begin(format!("filter-navigation:{}", source)).await?;
        Ok(self
            .filter_navigation
            .get(&source)
            .cloned()
            .unwrap_or_default())
    }

    fn sorted(listing: &ProductListing, sorting: Option<&str>) -> ProductListing {
        let mut listing = listing.clone();
        if sorting.is_some_and(|s| s.ends_with("-desc")) {
            listing.skus.reverse();
        }
        listing
    }
}

fn truncate(data: &CategoryData, depth: u32) -> CategoryData {
    let sub_categories = if depth == 0 {
        Vec::new()
    } else {
        data.sub_categories
            .iter()
            .map(|sub| truncate(sub, depth - 1))
            .collect()
    };
    CategoryData {
        sub_categories,
        ..data.clone()
    }
}

#[async_trait]
impl CategoriesService for InMemoryCatalog {
    async fn get_top_level_categories(&self, depth: u32) -> Result<Vec<Category>, FetchError> {
        self.begin("top-level".to_string()).await?;
        let roots = self.roots.iter().map(|root| truncate(root, depth)).collect();
        Ok(flatten_tree(roots))
    }

    async fn get_category(&self, unique_id: &str) -> Result<Category, FetchError> {
        self.begin(format!("category:{}", unique_id)).await?;
        self.categories
            .get(unique_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(unique_id.to_string()))
    }
}

#[async_trait]
impl ProductsService for InMemoryCatalog {
    async fn get_product(&self, sku: &str) -> Result<Product, FetchError> {
        self.begin(format!("product:{}", sku)).await?;
        self.products
            .get(sku)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(sku.to_string()))
    }

    async fn get_category_products(
        &self,
        category_unique_id: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError> {
        self.begin(format!("category-products:{}", category_unique_id))
            .await?;
        if !self.categories.contains_key(category_unique_id) {
            return Err(FetchError::NotFound(category_unique_id.to_string()));
        }
        Ok(self
            .category_products
            .get(category_unique_id)
            .map(|listing| Self::sorted(listing, sorting))
            .unwrap_or_default())
    }

    async fn search_products(
        &self,
        term: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError> {
        self.begin(format!("search:{}", term)).await?;
        Ok(self
            .searches
            .get(term)
            .map(|listing| Self::sorted(listing, sorting))
            .unwrap_or_default())
    }

    async fn get_filtered_products(
        &self,
        search_parameter: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError> {
        self.begin(format!("filter:{}", search_parameter)).await?;
        self.filters
            .get(search_parameter)
            .map(|listing| Self::sorted(listing, sorting))
            .ok_or_else(|| FetchError::NotFound(search_parameter.to_string()))
    }
}

#[async_trait]
impl FilterService for InMemoryCatalog {
    async fn get_filter_for_category(
        &self,
        category_unique_id: &str,
    ) -> Result<FilterNavigation, FetchError> {
        let source = format!("category:{}", category_unique_id);
        if !self.categories.contains_key(category_unique_id) {
            self.begin(format!("filter-navigation:{}", source)).await?;
            return Err(FetchError::NotFound(category_unique_id.to_string()));
        }
        self.filter_navigation(source).await
    }

    async fn get_filter_for_search(&self, term: &str) -> Result<FilterNavigation, FetchError> {
        self.filter_navigation(format!("search:{}", term)).await
    }

    async fn get_filter_for_params(
        &self,
        search_parameter: &str,
    ) -> Result<FilterNavigation, FetchError> {
        self.filter_navigation(format!("params:{}", search_parameter))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Filter;

    fn data(id: &str, subs: Vec<CategoryData>) -> CategoryData {
        CategoryData {
            id: id.to_string(),
            has_online_sub_categories: !subs.is_empty(),
            sub_categories: subs,
            ..Default::default()
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_category_tree(vec![
                data("A", vec![data("123", vec![data("456", vec![])])]),
                data("B", vec![]),
            ])
            .with_category_products("A.123.456", &["P1", "P2"])
    }

    #[tokio::test]
    async fn test_top_level_respects_depth() {
        let catalog = catalog();
        let ids: Vec<_> = catalog
            .get_top_level_categories(1)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.unique_id)
            .collect();
        assert_eq!(ids, vec!["A.123", "A", "B"]);

        let roots = catalog.get_top_level_categories(0).await.unwrap();
        assert_eq!(roots.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let catalog = catalog();
        assert_eq!(
            catalog.get_category("A.123.XXX").await,
            Err(FetchError::NotFound("A.123.XXX".into()))
        );
        assert!(catalog.get_product("P3").await.unwrap_err().is_not_found());
        assert_eq!(catalog.call_count("product:P3"), 1);
    }

    #[tokio::test]
    async fn test_unavailable_target_is_transport_error() {
        let catalog = catalog().with_unavailable("product:P1");
        let err = catalog.get_product("P1").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_descending_sorting_reverses() {
        let catalog = catalog();
        let listing = catalog
            .get_category_products("A.123.456", Some("name-desc"))
            .await
            .unwrap();
        assert_eq!(listing.skus, vec!["P2", "P1"]);
    }

    #[tokio::test]
    async fn test_filter_navigation_by_source() {
        let navigation = FilterNavigation {
            filter: vec![Filter {
                id: "color".into(),
                ..Default::default()
            }],
        };
        let catalog = catalog().with_filter_navigation("category:A.123", navigation.clone());

        assert_eq!(
            catalog.get_filter_for_category("A.123").await,
            Ok(navigation)
        );
        assert!(catalog.get_filter_for_search("camera").await.unwrap().is_empty());
        assert!(
            catalog
                .get_filter_for_category("A.XXX")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert_eq!(catalog.call_count("filter-navigation:category:A.123"), 1);
        assert_eq!(catalog.call_count("filter-navigation:search:camera"), 1);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "categories": [{ "id": "A", "subCategories": [{ "id": "1", "hasOnlineProducts": true }] }],
            "products": [{ "sku": "P1", "name": "Camera" }],
            "categoryProducts": { "A.1": { "skus": ["P1"], "sortKeys": ["name-asc"] } }
        }"#;
        let catalog = InMemoryCatalog::from_json(json).unwrap();
        assert!(catalog.categories.contains_key("A.1"));
        assert_eq!(catalog.category_products["A.1"].sort_keys, vec!["name-asc"]);
    }
}
