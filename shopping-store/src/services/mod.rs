//! 服务层 - 外部协作者接口
//!
//! # 服务列表
//!
//! - [`CategoriesService`] - 分类获取
//! - [`ProductsService`] - 商品与商品列表获取
//! - [`FilterService`] - 筛选导航获取
//! - [`RouteSink`] - 重定向请求接收方
//! - [`InMemoryCatalog`] - 内存实现（测试与模拟器使用）

pub mod fetch_error;
pub mod memory;

pub use fetch_error::FetchError;
pub use memory::InMemoryCatalog;

use async_trait::async_trait;
use shared::models::{Category, FilterNavigation, Product, ProductListing};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Category-fetch capability
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Root categories with their descendants down to `depth` levels, flattened
    async fn get_top_level_categories(&self, depth: u32) -> Result<Vec<Category>, FetchError>;

    async fn get_category(&self, unique_id: &str) -> Result<Category, FetchError>;
}

/// Product-fetch capability
#[async_trait]
pub trait ProductsService: Send + Sync {
    async fn get_product(&self, sku: &str) -> Result<Product, FetchError>;

    /// Full ordered sku sequence of a category for the given sorting
    async fn get_category_products(
        &self,
        category_unique_id: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError>;

    async fn search_products(
        &self,
        term: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError>;

    /// Products for an encoded filter selection
    async fn get_filtered_products(
        &self,
        search_parameter: &str,
        sorting: Option<&str>,
    ) -> Result<ProductListing, FetchError>;
}

/// Filter-navigation capability
#[async_trait]
pub trait FilterService: Send + Sync {
    async fn get_filter_for_category(
        &self,
        category_unique_id: &str,
    ) -> Result<FilterNavigation, FetchError>;

    async fn get_filter_for_search(&self, term: &str) -> Result<FilterNavigation, FetchError>;

    /// Navigation for an encoded filter selection
    async fn get_filter_for_params(
        &self,
        search_parameter: &str,
    ) -> Result<FilterNavigation, FetchError>;
}

/// Receives redirect requests issued by the store
pub trait RouteSink: Send + Sync {
    fn redirect(&self, path: &str);
}

impl RouteSink for mpsc::UnboundedSender<String> {
    fn redirect(&self, path: &str) {
        if self.send(path.to_string()).is_err() {
            tracing::debug!(path = %path, "Route sink closed, redirect dropped");
        }
    }
}

/// Collaborators the store fetches through
#[derive(Clone)]
pub struct Services {
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub filters: Arc<dyn FilterService>,
}

impl Services {
    pub fn new(
        categories: Arc<dyn CategoriesService>,
        products: Arc<dyn ProductsService>,
        filters: Arc<dyn FilterService>,
    ) -> Self {
        Self {
            categories,
            products,
            filters,
        }
    }

    /// Every capability served by one in-memory catalog
    pub fn in_memory(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            categories: catalog.clone(),
            products: catalog.clone(),
            filters: catalog,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("categories", &"<dyn CategoriesService>")
            .field("products", &"<dyn ProductsService>")
            .field("filters", &"<dyn FilterService>")
            .finish()
    }
}
