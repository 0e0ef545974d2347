//! Error category classification

use super::codes::ErrorCode;

/// Category by code range, decides the log level at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller mistakes (0xxx)
    General,
    /// Product store failures (6xxx)
    Store,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            6000..7000 => Self::Store,
            _ => Self::General,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
