//! Shopping Store - 店面目录状态引擎
//!
//! # 架构概述
//!
//! 维护分类、商品与分页商品列表的规范化缓存，并根据路由变化自动加载所需数据：
//!
//! - **状态** (`store`): 实体缓存、列表分页、选中项、最近浏览
//! - **同步** (`sync`): 动作、reducer、effects、单一调度任务
//! - **服务** (`services`): 分类/商品获取接口与内存实现
//! - **配置** (`core`): 环境变量配置、错误类型
//!
//! # 模块结构
//!
//! ```text
//! shopping-store/src/
//! ├── core/          # 配置、错误
//! ├── services/      # 协作者接口、内存目录
//! ├── store/         # 状态切片与选择器
//! ├── sync/          # 动作、reducer、effects、运行时
//! └── utils/         # 日志
//! ```
//!
//! # 使用
//!
//! ```ignore
//! let catalog = Arc::new(InMemoryCatalog::from_file("catalog.json")?);
//! let store = ShoppingStore::start(StoreConfig::from_env(), Services::in_memory(catalog))?;
//! store.navigate(RouteTable::storefront().resolve("/category/A.123"))?;
//! store.settle().await?;
//! ```

pub mod core;
pub mod services;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use core::{FailedLoadPolicy, RecentlyViewedOrder, StoreConfig, StoreError};
pub use services::{
    CategoriesService, FetchError, FilterService, InMemoryCatalog, ProductsService, RouteSink,
    Services,
};
pub use store::{ListingView, LoadStatus, ShoppingState, ViewStatus};
pub use sync::{ActionType, ShoppingAction, ShoppingStore};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
