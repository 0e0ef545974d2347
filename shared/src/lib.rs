//! Shared types for the shop order pipeline
//!
//! Common types used by both the scraper (write path) and the reporter
//! (read path): domain models, the unified error system, the bounded retry
//! policy, logging setup and, behind the `db` feature, the product store client.

pub mod error;
pub mod logger;
pub mod models;
pub mod retry;

#[cfg(feature = "db")]
pub mod store;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use logger::init_logger;
pub use models::{LineItem, Order, ProductRecord, ProductTotals, RankedProduct};
pub use retry::{Backoff, RetryError, RetryPolicy};
