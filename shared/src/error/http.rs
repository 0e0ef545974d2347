//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
            // transient, the caller may retry
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
