//! Unified error codes
//!
//! - 0xxx: General errors
//! - 6xxx: Product store errors

use std::fmt;

/// Error codes rendered in `ApiResponse::code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Request parameters could not be read
    ValidationFailed = 2,

    // ==================== 6xxx: Product store ====================
    /// Store could not answer the query
    StoreUnavailable = 6001,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::StoreUnavailable.code(), 6001);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::StoreUnavailable.to_string(), "E6001");
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "E0002");
    }
}
