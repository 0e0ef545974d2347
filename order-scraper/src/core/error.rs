use shared::store::StoreError;
use thiserror::Error;

use super::config::ConfigError;
use crate::reconcile::ReconcileError;
use crate::source::SourceError;

/// Process-level error: anything that ends the scraper
///
/// None of these are recovered in-process; the supervisor restarts us and the
/// next full cycle rewrites every title it sees.
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("存储初始化失败: {0}")]
    Store(#[from] StoreError),

    #[error("订单源初始化失败: {0}")]
    Source(#[from] SourceError),

    #[error("同步循环终止: {0}")]
    Reconcile(#[from] ReconcileError),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ScraperError>;
