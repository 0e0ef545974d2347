//! Order source - remote e-commerce platform access
//!
//! # 结构
//!
//! - [`session`] - 显式会话句柄 (shop + API version + token)
//! - [`shopify`] - Shopify Admin REST client
//! - [`link`] - `Link` header cursor pagination
//!
//! The reconciliation loop only sees the [`OrderSource`] trait.

pub mod link;
pub mod session;
pub mod shopify;

pub use session::ShopSession;
pub use shopify::{DEFAULT_API_VERSION, FetchOptions, ShopifyClient};

use async_trait::async_trait;
use shared::models::Order;
use std::sync::Arc;
use thiserror::Error;

/// Order source errors
///
/// None of these are retried: authentication failures abort startup and
/// fetch failures end the reconciliation loop.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid session parameter: {0}")]
    InvalidSession(String),

    #[error("platform rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("platform returned HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("request to platform failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode platform response: {0}")]
    Decode(String),
}

/// Anything that can hand over the current set of orders
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Every order intended for aggregation in this cycle
    async fn fetch_orders(&self) -> Result<Vec<Order>, SourceError>;
}

#[async_trait]
impl<T: OrderSource + ?Sized> OrderSource for Arc<T> {
    async fn fetch_orders(&self) -> Result<Vec<Order>, SourceError> {
        (**self).fetch_orders().await
    }
}
