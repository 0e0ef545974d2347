//! Unified error system for the read endpoint
//!
//! - [`ErrorCode`]: numeric codes, grouped by range
//! - [`ErrorCategory`]: classification by range
//! - [`AppError`]: code + message + details, renders as [`ApiResponse`]
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::store_unavailable("connection refused");
//! assert_eq!(err.code, ErrorCode::StoreUnavailable);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 6001);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};
