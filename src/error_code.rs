//! Standard error classes for chat-completion failures.
//!
//! Providers report failures through a mix of HTTP statuses and their own
//! `error.code` / `error.type` strings. This module folds both into one
//! small set of classes so that [`crate::Error::Remote`] carries a stable name.
//!
//! ```rust
//! use kg_extract::error_code::StandardErrorCode;
//!
//! let code = StandardErrorCode::from_provider_code("insufficient_quota").unwrap();
//! assert_eq!(code.name(), "quota_exhausted");
//! assert_eq!(code.category(), "rate");
//! ```

use std::fmt;

/// Standard error class of a failed model invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardErrorCode {
    /// Malformed request, invalid parameters, or missing required fields
    InvalidRequest,
    /// Invalid, expired, or missing API key
    Authentication,
    /// Valid credentials but insufficient permissions
    PermissionDenied,
    /// Requested model or endpoint does not exist
    NotFound,
    /// Input exceeds context window or payload size limit
    RequestTooLarge,
    /// Request rate limit exceeded
    RateLimited,
    /// Account usage quota or billing limit reached
    QuotaExhausted,
    /// Internal server error on provider side
    ServerError,
    /// Provider service temporarily overloaded
    Overloaded,
    /// Request timed out before response received
    Timeout,
    /// Error could not be classified
    Unknown,
}

impl StandardErrorCode {
    /// Returns the standard name (e.g., `"invalid_request"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RequestTooLarge => "request_too_large",
            Self::RateLimited => "rate_limited",
            Self::QuotaExhausted => "quota_exhausted",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the category: `"client"`, `"rate"`, `"server"`, or `"unknown"`.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest
            | Self::Authentication
            | Self::PermissionDenied
            | Self::NotFound
            | Self::RequestTooLarge => "client",
            Self::RateLimited | Self::QuotaExhausted => "rate",
            Self::ServerError | Self::Overloaded | Self::Timeout => "server",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a provider error code/type string to the corresponding class.
    ///
    /// Accepts the standard names plus OpenAI-style aliases such as
    /// `"invalid_api_key"`, `"insufficient_quota"` and `"context_length_exceeded"`.
    pub fn from_provider_code(provider_code: &str) -> Option<Self> {
        let code = match provider_code {
            "invalid_request" | "invalid_request_error" => Self::InvalidRequest,
            "authentication" | "invalid_api_key" | "authentication_error" => Self::Authentication,
            "permission_denied" | "permission_error" => Self::PermissionDenied,
            "not_found" | "model_not_found" => Self::NotFound,
            "request_too_large" | "context_length_exceeded" => Self::RequestTooLarge,
            "rate_limited" | "rate_limit_exceeded" => Self::RateLimited,
            "quota_exhausted" | "insufficient_quota" => Self::QuotaExhausted,
            "server_error" => Self::ServerError,
            "overloaded" | "overloaded_error" => Self::Overloaded,
            "timeout" => Self::Timeout,
            _ => return None,
        };
        Some(code)
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            413 => Self::RequestTooLarge,
            429 => Self::RateLimited, // quota errors share 429; the provider code disambiguates
            500 | 502 => Self::ServerError,
            503 | 529 => Self::Overloaded,
            _ => Self::Unknown,
        }
    }

    /// Classify a failed response, preferring the provider's own code over the status.
    pub fn classify(status: u16, provider_code: Option<&str>) -> Self {
        provider_code
            .and_then(Self::from_provider_code)
            .unwrap_or_else(|| Self::from_http_status(status))
    }
}

impl fmt::Display for StandardErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StandardErrorCode::from_http_status(401),
            StandardErrorCode::Authentication
        );
        assert_eq!(
            StandardErrorCode::from_http_status(429),
            StandardErrorCode::RateLimited
        );
        assert_eq!(
            StandardErrorCode::from_http_status(418),
            StandardErrorCode::Unknown
        );
    }

    #[test]
    fn test_provider_code_wins_over_status() {
        let code = StandardErrorCode::classify(429, Some("insufficient_quota"));
        assert_eq!(code, StandardErrorCode::QuotaExhausted);

        let code = StandardErrorCode::classify(429, Some("something_new"));
        assert_eq!(code, StandardErrorCode::RateLimited);
    }

    #[test]
    fn test_categories() {
        assert_eq!(StandardErrorCode::NotFound.category(), "client");
        assert_eq!(StandardErrorCode::Overloaded.category(), "server");
        assert_eq!(StandardErrorCode::Unknown.to_string(), "unknown");
    }
}
