//! End-to-end navigation flows against the in-memory catalog

use shared::models::{CategoryData, Product, RouteTable};
use shopping_store::{
    ActionType, InMemoryCatalog, Services, ShoppingAction, ShoppingStore, StoreConfig,
    ViewStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

fn tree() -> Vec<CategoryData> {
    vec![
        CategoryData {
            id: "A".into(),
            has_online_sub_categories: true,
            sub_categories: vec![CategoryData {
                id: "123".into(),
                has_online_sub_categories: true,
                sub_categories: vec![CategoryData {
                    id: "456".into(),
                    has_online_products: true,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        },
        CategoryData {
            id: "B".into(),
            ..Default::default()
        },
    ]
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_category_tree(tree())
        .with_category_products("A.123.456", &["P1", "P2"])
}

struct Harness {
    store: ShoppingStore,
    catalog: Arc<InMemoryCatalog>,
    log: broadcast::Receiver<ShoppingAction>,
    redirects: mpsc::UnboundedReceiver<String>,
    routes: RouteTable,
}

impl Harness {
    fn new(catalog: InMemoryCatalog) -> Self {
        Self::with_config(catalog, StoreConfig::default())
    }

    fn with_config(catalog: InMemoryCatalog, config: StoreConfig) -> Self {
        let catalog = Arc::new(catalog);
        let (tx, redirects) = mpsc::unbounded_channel();
        let store = ShoppingStore::start_with_sink(
            config,
            Services::in_memory(catalog.clone()),
            Some(Arc::new(tx)),
        )
        .unwrap();
        let log = store.subscribe();
        Self {
            store,
            catalog,
            log,
            redirects,
            routes: RouteTable::storefront(),
        }
    }

    async fn go(&mut self, url: &str) {
        self.store.navigate(self.routes.resolve(url)).unwrap();
        self.store.settle().await.unwrap();
    }

    /// Action types processed since the last call
    fn drain(&mut self) -> Vec<ActionType> {
        let mut types = Vec::new();
        while let Ok(action) = self.log.try_recv() {
            types.push(action.action_type());
        }
        types
    }

    fn drain_redirects(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(path) = self.redirects.try_recv() {
            out.push(path);
        }
        out
    }
}

#[tokio::test]
async fn test_home_page_loads_top_level_once() {
    let mut h = Harness::new(catalog());
    h.go("/").await;

    assert_eq!(
        h.drain(),
        vec![
            ActionType::RouteNavigated,
            ActionType::LoadTopLevelCategories,
            ActionType::LoadTopLevelCategoriesSuccess,
        ]
    );
    assert_eq!(h.store.get_categories_ids(), vec!["A", "A.123", "B"]);
    assert_eq!(h.store.get_selected_category(), None);

    h.go("/").await;
    assert_eq!(h.drain(), vec![ActionType::RouteNavigated]);
    assert_eq!(h.catalog.call_count("top-level"), 1);
}

#[tokio::test]
async fn test_category_page_loads_ancestors_before_top_level() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123").await;

    let types = h.drain();
    assert_eq!(
        &types[..5],
        &[
            ActionType::RouteNavigated,
            ActionType::SelectCategory,
            ActionType::LoadCategory,
            ActionType::LoadCategory,
            ActionType::LoadTopLevelCategories,
        ]
    );
    assert_eq!(h.catalog.call_count("category:A"), 1);
    assert_eq!(h.catalog.call_count("category:A.123"), 1);
    assert_eq!(
        h.store.get_selected_category().map(|c| c.unique_id),
        Some("A.123".to_string())
    );
    let path: Vec<_> = h
        .store
        .get_category_path("A.123")
        .into_iter()
        .map(|c| c.unique_id)
        .collect();
    assert_eq!(path, vec!["A", "A.123"]);
    // no products online, no listing
    assert_eq!(h.catalog.call_count("category-products:A.123"), 0);
}

#[tokio::test]
async fn test_family_page_shows_first_page() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456").await;

    assert_eq!(
        h.store.get_categories_ids(),
        vec!["A", "A.123", "A.123.456", "B"]
    );
    assert_eq!(h.store.get_product_ids(), vec!["P1", "P2"]);
    assert!(h.store.get_recently_viewed_skus().is_empty());

    let view = h.store.get_active_listing_view().unwrap();
    assert_eq!(view.page, 1);
    assert_eq!(view.skus, vec!["P1", "P2"]);
    assert!(view.is_available());
    assert_eq!(h.catalog.call_count("category-products:A.123.456"), 1);

    let types = h.drain();
    assert!(types.contains(&ActionType::SetProductSkusForCategory));
    assert_eq!(
        types
            .iter()
            .filter(|t| **t == ActionType::SetProductListingPages)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_product_click_records_recently_viewed() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456").await;
    h.drain();

    h.go("/category/A.123.456/product/P1").await;
    let types = h.drain();
    assert_eq!(
        types,
        vec![
            ActionType::RouteNavigated,
            ActionType::SelectProduct,
            ActionType::AddToRecently,
        ]
    );
    assert_eq!(
        h.store.get_selected_product().map(|p| p.sku),
        Some("P1".to_string())
    );
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P1"]);
    // P1 came with the listing
    assert_eq!(h.catalog.call_count("product:P1"), 1);
}

#[tokio::test]
async fn test_locale_change_reloads_without_recording_again() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456/product/P1").await;
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P1"]);
    h.drain();

    h.store.select_locale("de_DE").unwrap();
    h.store.settle().await.unwrap();

    let types = h.drain();
    assert_eq!(
        &types[..3],
        &[
            ActionType::SelectLocale,
            ActionType::LoadTopLevelCategories,
            ActionType::LoadProduct,
        ]
    );
    assert!(!types.contains(&ActionType::AddToRecently));
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P1"]);
    assert_eq!(h.catalog.call_count("top-level"), 2);
    assert_eq!(h.store.locale(), "de_DE");

    // same locale again is a no-op
    h.store.select_locale("de_DE").unwrap();
    h.store.settle().await.unwrap();
    assert_eq!(h.drain(), vec![ActionType::SelectLocale]);
}

#[tokio::test]
async fn test_unrelated_page_clears_selection() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456/product/P1").await;
    h.go("/compare").await;

    assert_eq!(h.store.get_selected_category(), None);
    assert_eq!(h.store.get_selected_product(), None);
    // entities stay cached
    assert!(h.store.get_product("P1").is_some());
    assert!(h.drain_redirects().is_empty());
}

#[tokio::test]
async fn test_product_page_without_category() {
    let mut h = Harness::new(catalog());
    h.go("/product/P2").await;

    assert_eq!(h.store.get_selected_category(), None);
    assert_eq!(
        h.store.get_selected_product().map(|p| p.sku),
        Some("P2".to_string())
    );
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P2"]);
    assert_eq!(h.store.get_categories_ids(), vec!["A", "A.123", "B"]);
}

#[tokio::test]
async fn test_missing_product_redirects_once() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456/product/P3").await;

    assert_eq!(h.drain_redirects(), vec!["/error"]);
    assert_eq!(h.store.redirects(), vec!["/error"]);
    assert_eq!(h.store.get_selected_category(), None);
    assert_eq!(h.store.get_selected_product(), None);
    assert!(!h.store.get_product_ids().contains(&"P3".to_string()));
    assert!(
        h.store
            .product_status("P3")
            .and_then(|s| s.error().cloned())
            .is_some_and(|e| e.is_not_found())
    );

    let types = h.drain();
    assert_eq!(
        types.iter().filter(|t| **t == ActionType::Navigate).count(),
        1
    );
}

#[tokio::test]
async fn test_missing_category_redirects_once() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.XXX").await;

    assert_eq!(h.drain_redirects(), vec!["/error"]);
    assert_eq!(h.store.get_selected_category(), None);
    // the existing ancestors were still loaded
    assert!(h.store.get_category_by_id("A").is_some());
    assert!(h.store.get_category_by_id("A.123").is_some());
    assert!(h.store.get_category_by_id("A.123.XXX").is_none());

    assert_eq!(h.catalog.call_count("category:A.123.XXX"), 1);
}

#[tokio::test]
async fn test_retry_policy_fetches_failed_category_again() {
    let config = StoreConfig {
        failed_load_policy: shopping_store::FailedLoadPolicy::Retry,
        ..Default::default()
    };
    let mut h = Harness::with_config(catalog(), config);
    h.go("/category/A.123.XXX").await;
    h.go("/").await;
    h.go("/category/A.123.XXX").await;

    assert_eq!(h.catalog.call_count("category:A.123.XXX"), 2);
    assert_eq!(h.drain_redirects(), vec!["/error", "/error"]);
}

#[tokio::test]
async fn test_revisiting_missing_category_redirects_without_fetching() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.XXX").await;
    h.go("/").await;
    h.go("/category/A.123.XXX").await;

    assert_eq!(h.catalog.call_count("category:A.123.XXX"), 1);
    assert_eq!(h.drain_redirects(), vec!["/error", "/error"]);
    assert_eq!(h.store.get_selected_category(), None);
}

#[tokio::test]
async fn test_revisiting_missing_product_redirects_without_fetching() {
    let mut h = Harness::new(catalog());
    h.go("/product/P3").await;
    h.go("/").await;
    h.go("/product/P3").await;

    assert_eq!(h.catalog.call_count("product:P3"), 1);
    assert_eq!(h.drain_redirects(), vec!["/error", "/error"]);
    assert_eq!(h.store.get_selected_product(), None);
    assert!(h.store.get_recently_viewed_skus().is_empty());
}

#[tokio::test]
async fn test_child_of_missing_category_redirects() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.XXX").await;
    h.go("/category/A.123.XXX.789").await;

    assert_eq!(h.drain_redirects(), vec!["/error", "/error"]);
    assert_eq!(h.store.get_selected_category(), None);
}

#[tokio::test]
async fn test_listing_page_with_missing_product_is_unavailable() {
    let catalog = InMemoryCatalog::new()
        .with_category_tree(tree())
        .with_product(Product::new("P1"))
        .with_dangling_category_products("A.123.456", &["P1", "P9"]);
    let mut h = Harness::new(catalog);
    h.go("/category/A.123.456").await;

    let missing = h.store.product_status("P9").and_then(|s| s.error().cloned());
    assert!(missing.as_ref().is_some_and(|e| e.is_not_found()));
    let view = h.store.get_active_listing_view().unwrap();
    assert_eq!(view.status, ViewStatus::Unavailable(missing.clone().unwrap()));
    // the listing itself is not a selection, so nothing redirects
    assert!(h.drain_redirects().is_empty());

    h.go("/").await;
    h.go("/category/A.123.456").await;
    let view = h.store.get_active_listing_view().unwrap();
    assert!(matches!(view.status, ViewStatus::Unavailable(_)));
    assert_eq!(h.catalog.call_count("product:P9"), 1);
}

#[tokio::test]
async fn test_stale_failure_after_navigating_away() {
    let mut h = Harness::new(catalog().with_latency(Duration::from_millis(30)));
    h.store
        .navigate(h.routes.resolve("/product/P3"))
        .unwrap();
    h.store.navigate(h.routes.resolve("/category/B")).unwrap();
    h.store.settle().await.unwrap();

    assert!(h.drain_redirects().is_empty());
    assert!(h.store.redirects().is_empty());
    assert_eq!(
        h.store.get_selected_category().map(|c| c.unique_id),
        Some("B".to_string())
    );
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let h = Harness::new(catalog().with_latency(Duration::from_millis(20)));
    let loads = (0..5).map(|_| h.store.load_category("A"));
    let statuses = futures::future::join_all(loads).await;

    for status in statuses {
        assert_eq!(status.unwrap(), shopping_store::LoadStatus::Loaded);
    }
    assert_eq!(h.catalog.call_count("category:A"), 1);

    // forced reload fetches again
    h.store.reload_category("A").await.unwrap();
    assert_eq!(h.catalog.call_count("category:A"), 2);
}

#[tokio::test]
async fn test_recently_viewed_cap_and_dedupe() {
    let skus = ["P1", "P2", "P3", "P4", "P5"];
    let catalog = InMemoryCatalog::new()
        .with_category_tree(tree())
        .with_category_products("A.123.456", &skus);
    let config = StoreConfig {
        recently_viewed_max: 3,
        ..Default::default()
    };
    let mut h = Harness::with_config(catalog, config);

    for sku in skus {
        h.go(&format!("/product/{}", sku)).await;
    }
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P5", "P4", "P3"]);

    h.go("/product/P4").await;
    assert_eq!(h.store.get_recently_viewed_skus(), vec!["P4", "P5", "P3"]);
    assert_eq!(h.store.get_recently_viewed_products().len(), 3);
}

#[tokio::test]
async fn test_repeated_view_query_sets_view_type_once() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456?view=list").await;
    h.go("/category/A.123.456/product/P1?view=list").await;
    h.go("/category/A.123.456?view=list").await;

    let types = h.drain();
    assert_eq!(
        types
            .iter()
            .filter(|t| **t == ActionType::SetViewType)
            .count(),
        1
    );
    assert_eq!(h.store.view_type(), shared::models::ViewType::List);

    // unknown values are ignored
    h.go("/category/A.123.456?view=carousel").await;
    assert!(!h.drain().contains(&ActionType::SetViewType));
    assert_eq!(h.store.view_type(), shared::models::ViewType::List);
}

#[tokio::test]
async fn test_reset_clears_everything_but_locale() {
    let mut h = Harness::new(catalog());
    h.go("/category/A.123.456/product/P1").await;
    h.store.reset().unwrap();
    h.store.settle().await.unwrap();

    assert!(h.store.get_categories_ids().is_empty());
    assert!(h.store.get_product_ids().is_empty());
    assert!(h.store.get_recently_viewed_skus().is_empty());
    assert_eq!(h.store.get_selected_product(), None);
    assert_eq!(h.store.locale(), "en_US");
}
