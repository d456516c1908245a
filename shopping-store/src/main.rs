use anyhow::Context;
use shared::models::RouteTable;
use shopping_store::{
    InMemoryCatalog, Services, ShoppingStore, StoreConfig, cleanup_old_logs, init_logger_with_file,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// shop-sim - replay storefront urls against a catalog file
///
/// ```text
/// shop-sim <catalog.json> <url>...
/// shop-sim catalog.json / /category/A.123 /category/A.123/product/P1 "/search/cam?page=2"
/// ```
///
/// Redirects issued by the store are followed like a browser would.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量与日志
    dotenv::dotenv().ok();
    let config = StoreConfig::from_env();
    config.validate().context("invalid store configuration")?;
    init_logger_with_file(&config.log_level, false, config.log_dir.as_deref())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        match cleanup_old_logs(Path::new(log_dir), config.log_retention_days) {
            Ok(0) => {}
            Ok(deleted) => tracing::info!(deleted, "Old log files removed"),
            Err(e) => tracing::warn!(error = %e, "Failed to cleanup old logs"),
        }
    }

    // 2. 命令行参数
    let mut args = std::env::args().skip(1);
    let catalog_path = args
        .next()
        .context("usage: shop-sim <catalog.json> <url>...")?;
    let urls: Vec<String> = args.collect();

    // 3. 加载目录并启动 store
    let catalog = Arc::new(
        InMemoryCatalog::from_file(&catalog_path)
            .with_context(|| format!("failed to load catalog {}", catalog_path))?,
    );
    let (route_tx, mut route_rx) = mpsc::unbounded_channel::<String>();
    let store = ShoppingStore::start_with_sink(
        config,
        Services::in_memory(catalog.clone()),
        Some(Arc::new(route_tx)),
    )?;

    tracing::info!(catalog = %catalog_path, urls = urls.len(), "shop-sim starting");

    // 4. 依次导航，跟随重定向
    let routes = RouteTable::storefront();
    for url in &urls {
        store.navigate(routes.resolve(url))?;
        store.settle().await?;
        while let Ok(redirect) = route_rx.try_recv() {
            tracing::info!(from = %url, to = %redirect, "Following redirect");
            store.navigate(routes.resolve(&redirect))?;
            store.settle().await?;
        }
    }

    // 5. 输出最终状态
    let report = store.read(|state| {
        serde_json::json!({
            "locale": state.locale,
            "categories": state.categories_ids(),
            "products": state.product_ids(),
            "selectedCategory": state.selection.category,
            "selectedProduct": state.selection.product,
            "recentlyViewed": state.recently.skus(),
            "viewType": state.listing.view_type,
            "filterNavigation": state.filter_navigation(),
            "redirects": state.router.redirects,
        })
    });
    let active = store.get_active_listing_view();
    let report = serde_json::json!({
        "state": report,
        "listing": active,
        "backendCalls": catalog.total_calls(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
