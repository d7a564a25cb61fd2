//! Tool-facing error kinds and their stable codes.
//!
//! | Prefix | Category | Description                       |
//! |--------|----------|-----------------------------------|
//! | E1xxx  | client   | Caller or configuration problems  |
//! | E3xxx  | server   | Upstream or network problems      |
//!
//! ```rust
//! use hcdp_mcp::error_code::ToolErrorKind;
//!
//! let kind = ToolErrorKind::from_http_status(401);
//! assert_eq!(kind, ToolErrorKind::AuthenticationError);
//! assert_eq!(kind.code(), "E1002");
//! assert_eq!(kind.category(), "client");
//! ```

use serde::Serialize;
use std::fmt;

/// Classification of a failed tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolErrorKind {
    /// E1000: Arguments failed local validation; nothing was sent.
    ValidationError,
    /// E1001: Upstream rejected the request (400 and unlisted 4xx).
    InvalidRequest,
    /// E1002: Missing, invalid or insufficient credentials (401/403).
    AuthenticationError,
    /// E1003: Local configuration is unusable (e.g. no API token).
    ConfigurationError,
    /// E1004: Resource does not exist (404).
    NotFound,
    /// E3001: Upstream failure (5xx), connection failure or unexpected status.
    UpstreamError,
    /// E3003: No response within the configured timeout.
    TimeoutError,
}

impl ToolErrorKind {
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError => "E1000",
            Self::InvalidRequest => "E1001",
            Self::AuthenticationError => "E1002",
            Self::ConfigurationError => "E1003",
            Self::NotFound => "E1004",
            Self::UpstreamError => "E3001",
            Self::TimeoutError => "E3003",
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::InvalidRequest => "InvalidRequest",
            Self::AuthenticationError => "AuthenticationError",
            Self::ConfigurationError => "ConfigurationError",
            Self::NotFound => "NotFound",
            Self::UpstreamError => "UpstreamError",
            Self::TimeoutError => "TimeoutError",
        }
    }

    /// Returns `"client"` or `"server"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UpstreamError | Self::TimeoutError => "server",
            _ => "client",
        }
    }

    /// Maps a non-2xx HTTP status to its kind.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError,
            404 => Self::NotFound,
            400..=499 => Self::InvalidRequest,
            _ => Self::UpstreamError,
        }
    }
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
