use shared::error::{AppError, AppResult};
use shared::models::{ListingKind, ViewType};
use std::str::FromStr;

/// What a plain load request does with an entry whose last fetch failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedLoadPolicy {
    /// Failures are terminal; only a forced reload fetches again
    #[default]
    Terminal,
    /// A failed entry is treated as absent and fetched again
    Retry,
}

impl FromStr for FailedLoadPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" => Ok(Self::Terminal),
            "retry" => Ok(Self::Retry),
            other => Err(AppError::config(format!("unknown failed load policy: {}", other))),
        }
    }
}

/// Position of the most recent entry in the recently-viewed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecentlyViewedOrder {
    #[default]
    MostRecentFirst,
    MostRecentLast,
}

impl FromStr for RecentlyViewedOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most-recent-first" | "first" => Ok(Self::MostRecentFirst),
            "most-recent-last" | "last" => Ok(Self::MostRecentLast),
            other => Err(AppError::config(format!(
                "unknown recently viewed order: {}",
                other
            ))),
        }
    }
}

/// 商店配置 - 状态引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | MAIN_NAVIGATION_MAX_SUB_CATEGORIES_DEPTH | 1 | 顶级分类加载深度 |
/// | PRODUCT_LISTING_ITEMS_PER_PAGE | 12 | 分类列表每页数量 |
/// | SEARCH_ITEMS_PER_PAGE | 12 | 搜索列表每页数量 |
/// | MASTER_VARIATIONS_ITEMS_PER_PAGE | 6 | 变体列表每页数量 |
/// | DEFAULT_PRODUCT_LISTING_VIEW_TYPE | grid | 默认视图 |
/// | RECENTLY_VIEWED_MAX | 12 | 最近浏览容量 |
/// | RECENTLY_VIEWED_ORDER | most-recent-first | 最近浏览顺序 |
/// | ERROR_ROUTE | /error | 未找到时的跳转路由 |
/// | FAILED_LOAD_POLICY | terminal | 失败后是否重试 |
/// | ENTITY_TTL_SECS | (unset) | 实体过期时间 |
/// | DEFAULT_LOCALE | en_US | 初始语言 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录 |
/// | LOG_RETENTION_DAYS | 14 | 日志保留天数 |
///
/// # 示例
///
/// ```ignore
/// PRODUCT_LISTING_ITEMS_PER_PAGE=24 FAILED_LOAD_POLICY=retry cargo run --bin shop-sim
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Depth of the eager top-level category tree fetch
    pub main_navigation_max_sub_categories_depth: u32,
    pub category_items_per_page: usize,
    pub search_items_per_page: usize,
    pub master_items_per_page: usize,
    pub default_view_type: ViewType,
    pub recently_viewed_max: usize,
    pub recently_viewed_order: RecentlyViewedOrder,
    /// Redirect target when a selected category or product does not exist
    pub error_route: String,
    pub failed_load_policy: FailedLoadPolicy,
    /// 实体过期时间 (秒)，None 表示永不过期
    pub entity_ttl_secs: Option<u64>,
    pub default_locale: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 日志保留天数，超过的轮转文件在启动时删除
    pub log_retention_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            main_navigation_max_sub_categories_depth: 1,
            category_items_per_page: 12,
            search_items_per_page: 12,
            master_items_per_page: 6,
            default_view_type: ViewType::Grid,
            recently_viewed_max: 12,
            recently_viewed_order: RecentlyViewedOrder::MostRecentFirst,
            error_route: "/error".into(),
            failed_load_policy: FailedLoadPolicy::Terminal,
            entity_ttl_secs: None,
            default_locale: "en_US".into(),
            log_level: "info".into(),
            log_dir: None,
            log_retention_days: 14,
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl StoreConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            main_navigation_max_sub_categories_depth: env_parse(
                "MAIN_NAVIGATION_MAX_SUB_CATEGORIES_DEPTH",
            )
            .unwrap_or(defaults.main_navigation_max_sub_categories_depth),
            category_items_per_page: env_parse("PRODUCT_LISTING_ITEMS_PER_PAGE")
                .unwrap_or(defaults.category_items_per_page),
            search_items_per_page: env_parse("SEARCH_ITEMS_PER_PAGE")
                .unwrap_or(defaults.search_items_per_page),
            master_items_per_page: env_parse("MASTER_VARIATIONS_ITEMS_PER_PAGE")
                .unwrap_or(defaults.master_items_per_page),
            default_view_type: env_parse("DEFAULT_PRODUCT_LISTING_VIEW_TYPE")
                .unwrap_or(defaults.default_view_type),
            recently_viewed_max: env_parse("RECENTLY_VIEWED_MAX")
                .unwrap_or(defaults.recently_viewed_max),
            recently_viewed_order: env_parse("RECENTLY_VIEWED_ORDER")
                .unwrap_or(defaults.recently_viewed_order),
            error_route: std::env::var("ERROR_ROUTE").unwrap_or(defaults.error_route),
            failed_load_policy: env_parse("FAILED_LOAD_POLICY")
                .unwrap_or(defaults.failed_load_policy),
            entity_ttl_secs: env_parse("ENTITY_TTL_SECS"),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok(),
            log_retention_days: env_parse("LOG_RETENTION_DAYS")
                .unwrap_or(defaults.log_retention_days),
        }
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> AppResult<()> {
        for (kind, size) in [
            (ListingKind::Category, self.category_items_per_page),
            (ListingKind::Search, self.search_items_per_page),
            (ListingKind::Master, self.master_items_per_page),
        ] {
            if size == 0 {
                return Err(AppError::config(format!(
                    "{} page size must be positive",
                    kind.name()
                )));
            }
        }
        if self.recently_viewed_max == 0 {
            return Err(AppError::config("recently viewed capacity must be positive"));
        }
        if self.error_route.trim_matches('/').is_empty() {
            return Err(AppError::config("error route must not be empty"));
        }
        if self.log_retention_days < 1 {
            return Err(AppError::config("log retention must be at least one day"));
        }
        Ok(())
    }

    /// Page size of a listing context
    pub fn page_size(&self, kind: ListingKind) -> usize {
        match kind {
            ListingKind::Category => self.category_items_per_page,
            ListingKind::Search => self.search_items_per_page,
            ListingKind::Master => self.master_items_per_page,
        }
    }

    /// Staleness horizon in milliseconds
    pub fn entity_ttl_millis(&self) -> Option<i64> {
        self.entity_ttl_secs
            .map(|secs| i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX))
    }
}
