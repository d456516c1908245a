//! Store runtime - 单一调度任务
//!
//! 所有动作（外部调用、路由事件、请求完成）都进入同一个收件箱，由一个
//! 调度任务逐个处理。状态只在这里被修改，读者通过 RwLock 并发读取。
//!
//! ```text
//! ShoppingStore::dispatch ──┐
//!                           ├── mpsc inbox ──► Dispatcher
//! fetch completion ─────────┘                    ├── reduce → FetchRequest → tokio::spawn
//!                                                ├── effects → follow-ups (depth-first)
//!                                                ├── RouteSink (redirect)
//!                                                └── broadcast action log
//! ```
//!
//! Follow-up actions are processed before the next inbound message and before
//! their siblings' follow-ups resume, so a selection change is always handled
//! ahead of the loads it causes. Fetch completions may interleave freely.

use super::Context;
use super::actions::ShoppingAction;
use super::effects::run_effects;
use super::fetch::FetchRequest;
use super::reducer::reduce;
use crate::core::{Result, StoreConfig, StoreError};
use crate::services::{RouteSink, Services};
use crate::store::{ListingView, LoadStatus, ShoppingState, listing};
use parking_lot::RwLock;
use shared::error::AppError;
use shared::models::{
    Category, FilterNavigation, ListingId, ListingKey, Product, ProductListing, RouteResolution,
    ViewType,
};
use shared::util::now_millis;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, mpsc, watch};

/// Action log channel capacity
const ACTION_CHANNEL_CAPACITY: usize = 4096;

/// Upper bound of actions derived from one inbound message
const MAX_CASCADE: usize = 10_000;

struct Inbound {
    action: ShoppingAction,
    /// Sequence number of externally dispatched actions
    seq: Option<u64>,
}

/// Processing progress published after every inbound message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Progress {
    /// Last processed external sequence number
    seq: u64,
    /// Number of inbound messages processed
    version: u64,
}

struct Shared {
    config: StoreConfig,
    state: Arc<RwLock<ShoppingState>>,
    inbox: mpsc::UnboundedSender<Inbound>,
    action_tx: broadcast::Sender<ShoppingAction>,
    outstanding: Arc<watch::Sender<usize>>,
    progress: Arc<watch::Sender<Progress>>,
    next_seq: AtomicU64,
}

/// Handle to a running shopping store
///
/// Cheap to clone. The dispatcher task stops once every handle is dropped and
/// no fetch is in flight.
#[derive(Clone)]
pub struct ShoppingStore {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ShoppingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShoppingStore")
            .field("locale", &self.shared.state.read().locale)
            .field("outstanding", &*self.shared.outstanding.borrow())
            .finish()
    }
}

impl ShoppingStore {
    /// Validate the config and spawn the dispatcher
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: StoreConfig, services: Services) -> Result<Self> {
        Self::start_with_sink(config, services, None)
    }

    pub fn start_with_sink(
        config: StoreConfig,
        services: Services,
        sink: Option<Arc<dyn RouteSink>>,
    ) -> Result<Self> {
        config.validate().map_err(StoreError::Config)?;

        let state = Arc::new(RwLock::new(ShoppingState::new(&config)));
        let (inbox, inbox_rx) = mpsc::unbounded_channel();
        let (action_tx, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);
        let (outstanding, _) = watch::channel(0usize);
        let (progress, _) = watch::channel(Progress::default());
        let outstanding = Arc::new(outstanding);
        let progress = Arc::new(progress);

        let dispatcher = Dispatcher {
            config: config.clone(),
            services,
            state: state.clone(),
            sink,
            inbox_rx,
            inbox: inbox.downgrade(),
            action_tx: action_tx.clone(),
            outstanding: outstanding.clone(),
            progress: progress.clone(),
        };
        tokio::spawn(dispatcher.run());

        tracing::info!(
            locale = %config.default_locale,
            failed_load_policy = ?config.failed_load_policy,
            "Shopping store started"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                state,
                inbox,
                action_tx,
                outstanding,
                progress,
                next_seq: AtomicU64::new(1),
            }),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    // ========== Dispatch ==========

    /// Queue an action; returns its sequence number
    pub fn dispatch(&self, action: ShoppingAction) -> Result<u64> {
        let seq = self.shared.next_seq.fetch_add(1, Ordering::Relaxed);
        self.shared.outstanding.send_modify(|n| *n += 1);
        if self
            .shared
            .inbox
            .send(Inbound {
                action,
                seq: Some(seq),
            })
            .is_err()
        {
            self.shared
                .outstanding
                .send_modify(|n| *n = n.saturating_sub(1));
            return Err(StoreError::Closed);
        }
        Ok(seq)
    }

    /// Feed a route resolution from the route source
    pub fn navigate(&self, route: RouteResolution) -> Result<()> {
        self.dispatch(ShoppingAction::RouteNavigated(route))
            .map(|_| ())
    }

    pub fn select_locale(&self, locale: impl Into<String>) -> Result<()> {
        self.dispatch(ShoppingAction::SelectLocale(locale.into()))
            .map(|_| ())
    }

    pub fn set_view_type(&self, view_type: ViewType) -> Result<()> {
        self.dispatch(ShoppingAction::SetViewType {
            view_type,
            from_query: false,
        })
        .map(|_| ())
    }

    /// Clear entities, listings, selection and the recently-viewed log
    pub fn reset(&self) -> Result<()> {
        self.dispatch(ShoppingAction::ResetStore).map(|_| ())
    }

    /// Resolves once no dispatched action or fetch is outstanding
    pub async fn settle(&self) -> Result<()> {
        let mut rx = self.shared.outstanding.subscribe();
        rx.wait_for(|n| *n == 0)
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(())
    }

    /// Processed actions, in processing order
    pub fn subscribe(&self) -> broadcast::Receiver<ShoppingAction> {
        self.shared.action_tx.subscribe()
    }

    // ========== Loads ==========

    /// Fetch root categories down to the configured depth (once per locale)
    pub fn load_top_level_categories(&self) -> Result<()> {
        self.dispatch(ShoppingAction::LoadTopLevelCategories {
            depth: self.shared.config.main_navigation_max_sub_categories_depth,
            force: false,
        })
        .map(|_| ())
    }

    /// Load a category and wait for its terminal status
    ///
    /// Concurrent calls for the same id share one fetch.
    pub async fn load_category(&self, unique_id: &str) -> Result<LoadStatus> {
        self.load_category_with(unique_id, false).await
    }

    /// Like [`load_category`](Self::load_category) but fetches even when
    /// the entry is loaded or failed
    pub async fn reload_category(&self, unique_id: &str) -> Result<LoadStatus> {
        self.load_category_with(unique_id, true).await
    }

    async fn load_category_with(&self, unique_id: &str, force: bool) -> Result<LoadStatus> {
        let seq = self.dispatch(ShoppingAction::LoadCategory {
            unique_id: unique_id.to_string(),
            force,
        })?;
        self.wait_terminal(seq, |state| state.categories.status(unique_id).cloned())
            .await
    }

    /// Load a product and wait for its terminal status
    pub async fn load_product(&self, sku: &str) -> Result<LoadStatus> {
        self.load_product_with(sku, false).await
    }

    pub async fn reload_product(&self, sku: &str) -> Result<LoadStatus> {
        self.load_product_with(sku, true).await
    }

    async fn load_product_with(&self, sku: &str, force: bool) -> Result<LoadStatus> {
        let seq = self.dispatch(ShoppingAction::LoadProduct {
            sku: sku.to_string(),
            force,
        })?;
        self.wait_terminal(seq, |state| state.products.status(sku).cloned())
            .await
    }

    /// Fetch the sku sequence of a category listing without loading products
    pub fn load_products_for_category(&self, key: ListingKey, page: u32) -> Result<()> {
        if !matches!(key.id, ListingId::Category(_)) {
            return Err(AppError::invalid_listing_key(format!(
                "{} is not a category listing",
                key.id
            ))
            .into());
        }
        self.dispatch(ShoppingAction::LoadProductsForCategory { key, page })
            .map(|_| ())
    }

    /// Show `page` of a listing; sorting and filters follow the route query
    pub fn load_more_products(&self, id: ListingId, page: u32) -> Result<()> {
        self.dispatch(ShoppingAction::LoadMoreProducts { id, page })
            .map(|_| ())
    }

    /// Switch a listing to another filter selection and show its first page
    ///
    /// The old key keeps its cached pages.
    pub fn apply_filter(&self, key: &ListingKey, filters: Option<String>) -> Result<ListingKey> {
        let filtered = listing::apply_filter(key, filters)?;
        self.dispatch(ShoppingAction::ApplyFilter {
            key: filtered.clone(),
        })?;
        Ok(filtered)
    }

    /// Provide the sku sequence of a listing directly (master variations)
    pub fn set_listing_skus(&self, key: ListingKey, listing: ProductListing) -> Result<()> {
        self.dispatch(ShoppingAction::SetProductListingSkus {
            key,
            page: 1,
            listing,
        })
        .map(|_| ())
    }

    async fn wait_terminal<F>(&self, seq: u64, status: F) -> Result<LoadStatus>
    where
        F: Fn(&ShoppingState) -> Option<LoadStatus>,
    {
        let mut rx = self.shared.progress.subscribe();
        loop {
            let processed = rx.borrow_and_update().seq >= seq;
            if processed {
                match self.read(&status) {
                    Some(s) if s.is_terminal() => return Ok(s),
                    Some(_) => {}
                    // dropped by a reset while in flight
                    None => {
                        return Ok(LoadStatus::Failed(AppError::internal(
                            "entry removed before its load completed",
                        )));
                    }
                }
            }
            rx.changed().await.map_err(|_| StoreError::Closed)?;
        }
    }

    // ========== Queries ==========

    /// Run a closure against the current state
    pub fn read<R>(&self, f: impl FnOnce(&ShoppingState) -> R) -> R {
        f(&self.shared.state.read())
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> ShoppingState {
        self.shared.state.read().clone()
    }

    pub fn get_category_by_id(&self, unique_id: &str) -> Option<Category> {
        self.read(|s| s.category_by_id(unique_id).cloned())
    }

    pub fn get_categories_ids(&self) -> Vec<String> {
        self.read(ShoppingState::categories_ids)
    }

    pub fn get_sub_categories(&self, unique_id: &str) -> Vec<Category> {
        self.read(|s| s.sub_categories(unique_id).into_iter().cloned().collect())
    }

    pub fn get_category_path(&self, unique_id: &str) -> Vec<Category> {
        self.read(|s| s.category_path(unique_id).into_iter().cloned().collect())
    }

    pub fn get_selected_category(&self) -> Option<Category> {
        self.read(|s| s.selected_category().cloned())
    }

    pub fn get_selected_category_id(&self) -> Option<String> {
        self.read(|s| s.selection.category.clone())
    }

    pub fn get_selected_product(&self) -> Option<Product> {
        self.read(|s| s.selected_product().cloned())
    }

    pub fn get_selected_product_sku(&self) -> Option<String> {
        self.read(|s| s.selection.product.clone())
    }

    pub fn get_product_ids(&self) -> Vec<String> {
        self.read(ShoppingState::product_ids)
    }

    pub fn get_product(&self, sku: &str) -> Option<Product> {
        self.read(|s| s.products.get(sku).cloned())
    }

    pub fn get_recently_viewed_products(&self) -> Vec<Product> {
        self.read(|s| s.recently_viewed_products().into_iter().cloned().collect())
    }

    pub fn get_recently_viewed_skus(&self) -> Vec<String> {
        self.read(|s| s.recently.skus())
    }

    pub fn get_listing_view(&self, key: &ListingKey, page: u32) -> ListingView {
        let page_size = self.shared.config.page_size(key.id.kind());
        self.read(|s| s.listing_view(key, page, page_size))
    }

    /// Page most recently requested for display
    pub fn get_active_listing_view(&self) -> Option<ListingView> {
        let active = self.read(|s| s.listing.active.clone())?;
        Some(self.get_listing_view(&active.key, active.page))
    }

    pub fn get_sort_keys(&self, key: &ListingKey) -> Vec<String> {
        self.read(|s| s.listing.sort_keys(key))
    }

    /// Filters of the listing last shown, once loaded
    pub fn get_filter_navigation(&self) -> Option<FilterNavigation> {
        self.read(|s| s.filter_navigation().cloned())
    }

    pub fn filter_status(&self) -> Option<LoadStatus> {
        self.read(|s| s.filter.status.clone())
    }

    pub fn view_type(&self) -> ViewType {
        self.read(|s| s.listing.view_type)
    }

    pub fn category_status(&self, unique_id: &str) -> Option<LoadStatus> {
        self.read(|s| s.categories.status(unique_id).cloned())
    }

    pub fn product_status(&self, sku: &str) -> Option<LoadStatus> {
        self.read(|s| s.products.status(sku).cloned())
    }

    pub fn locale(&self) -> String {
        self.read(|s| s.locale.clone())
    }

    /// Redirect targets issued so far
    pub fn redirects(&self) -> Vec<String> {
        self.read(|s| s.router.redirects.clone())
    }
}

/// The single task that owns state mutation
struct Dispatcher {
    config: StoreConfig,
    services: Services,
    state: Arc<RwLock<ShoppingState>>,
    sink: Option<Arc<dyn RouteSink>>,
    inbox_rx: mpsc::UnboundedReceiver<Inbound>,
    inbox: mpsc::WeakUnboundedSender<Inbound>,
    action_tx: broadcast::Sender<ShoppingAction>,
    outstanding: Arc<watch::Sender<usize>>,
    progress: Arc<watch::Sender<Progress>>,
}

impl Dispatcher {
    /// 运行调度循环（直到所有句柄与请求都结束）
    async fn run(mut self) {
        tracing::info!("Shopping store dispatcher started");

        while let Some(inbound) = self.inbox_rx.recv().await {
            self.process(inbound.action);
            self.progress.send_modify(|p| {
                p.version += 1;
                if let Some(seq) = inbound.seq {
                    p.seq = p.seq.max(seq);
                }
            });
            self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
        }

        tracing::info!("Inbox closed, shopping store dispatcher stopping");
    }

    /// Reduce an action and everything it cascades into
    fn process(&self, action: ShoppingAction) {
        let mut queue = VecDeque::from([action]);
        let mut steps = 0usize;

        while let Some(action) = queue.pop_front() {
            steps += 1;
            if steps > MAX_CASCADE {
                tracing::error!(
                    dropped = queue.len() + 1,
                    "Action cascade exceeded {} steps, dropping the rest",
                    MAX_CASCADE
                );
                break;
            }

            let ctx = Context::new(&self.config, now_millis());
            let (outcome, follow_ups) = {
                let mut state = self.state.write();
                let outcome = reduce(&mut state, &action, &ctx);
                let follow_ups = if outcome.changed {
                    run_effects(&action, &state, &ctx)
                } else {
                    Vec::new()
                };
                (outcome, follow_ups)
            };

            tracing::debug!(
                action = %action.action_type(),
                changed = outcome.changed,
                fetches = outcome.fetches.len(),
                follow_ups = follow_ups.len(),
                "Action processed"
            );

            for request in outcome.fetches {
                self.spawn_fetch(request);
            }
            if let Some(path) = &outcome.redirect {
                match &self.sink {
                    Some(sink) => sink.redirect(path),
                    None => tracing::warn!(path = %path, "No route sink, redirect not delivered"),
                }
            }

            // no subscribers is fine
            let _ = self.action_tx.send(action);

            for follow_up in follow_ups.into_iter().rev() {
                queue.push_front(follow_up);
            }
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let Some(inbox) = self.inbox.upgrade() else {
            tracing::debug!(fetch = %request.target(), "Store dropped, fetch skipped");
            return;
        };
        let services = self.services.clone();
        let outstanding = self.outstanding.clone();
        outstanding.send_modify(|n| *n += 1);

        tokio::spawn(async move {
            let action = request.execute(&services).await;
            if inbox.send(Inbound { action, seq: None }).is_err() {
                tracing::error!("Dispatcher gone, fetch result dropped");
                outstanding.send_modify(|n| *n = n.saturating_sub(1));
            }
        });
    }
}
