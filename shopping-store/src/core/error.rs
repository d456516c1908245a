use shared::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("配置错误: {0}")]
    Config(AppError),

    /// A request rejected before anything was dispatched
    #[error("请求被拒绝: {0}")]
    Rejected(#[from] AppError),

    #[error("store runtime has stopped")]
    Closed,

    #[error("catalog file is malformed: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store 的 Result 类型别名
pub type Result<T> = std::result::Result<T, StoreError>;
