//! Search error types.

use thiserror::Error;

/// Failure of a single search request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum SearchError {
    #[error("invalid search request: {reason}")]
    InvalidRequest { reason: String },

    #[error("network error during search: {message}")]
    Transport { message: String },

    #[error("search failed with HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("failed to decode search response: {message}")]
    Decode { message: String },
}

impl SearchError {
    /// Creates invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates status error.
    #[must_use]
    pub const fn http_status(code: u16) -> Self {
        Self::HttpStatus { code }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether retrying the same call may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidRequest { .. })
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_is_not_recoverable() {
        assert!(!SearchError::invalid_request("empty").is_recoverable());
        assert!(SearchError::transport("timed out").is_recoverable());
        assert!(SearchError::http_status(503).is_recoverable());
    }

    #[test]
    fn test_status_message_carries_code() {
        let err = SearchError::http_status(429);
        assert_eq!(err.to_string(), "search failed with HTTP status 429");
        assert!(err.is_network_error());
    }
}
