//! Order Scraper - 订单汇总同步进程
//!
//! # 架构概述
//!
//! 周期性地从电商平台拉取全部订单, 按商品标题汇总销量, 覆盖写入产品存储:
//!
//! - **订单源** (`source`): Shopify Admin REST 会话与分页拉取
//! - **汇总** (`aggregator`): 纯函数, 标题 → 总数量
//! - **同步循环** (`reconcile`): fetch → aggregate → upsert → sleep
//! - **存储**: `shared::store::ProductStore` (SurrealDB)
//!
//! # 模块结构
//!
//! ```text
//! order-scraper/src/
//! ├── core/          # 配置、错误
//! ├── source/        # 订单源 trait 与 Shopify 实现
//! ├── aggregator.rs  # 汇总
//! └── reconcile.rs   # 同步循环
//! ```

pub mod aggregator;
pub mod core;
pub mod reconcile;
pub mod source;

use std::convert::Infallible;

use shared::store::ProductStore;

// Re-export 公共类型
pub use aggregator::aggregate;
pub use crate::core::{Config, ConfigError, ScraperError};
pub use reconcile::{CycleReport, ReconcileError, Reconciler};
pub use source::{FetchOptions, OrderSource, ShopSession, ShopifyClient, SourceError};
pub use shared::init_logger;

/// Wire everything from `config` and run the loop until it fails
///
/// 1. optional startup delay (store container may still be booting)
/// 2. store connection, bounded retry
/// 3. shop authentication, no retry
/// 4. reconciliation loop
pub async fn run(config: Config) -> crate::core::error::Result<Infallible> {
    if !config.startup_delay.is_zero() {
        tracing::info!(delay_secs = config.startup_delay.as_secs(), "Waiting before first connection");
        tokio::time::sleep(config.startup_delay).await;
    }

    let store = ProductStore::connect_with(&config.store, &config.store_retry).await?;

    let session = ShopSession::new(&config.shop_url, &config.api_version, &config.access_token)?;
    let shop = ShopifyClient::connect(session, config.fetch.clone()).await?;

    let reconciler = Reconciler::new(shop, store).with_interval(config.poll_interval);
    Ok(reconciler.run().await?)
}

/// 打印启动横幅
pub fn print_banner() {
    tracing::info!(
        "{} v{} - order totals → product store",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}
