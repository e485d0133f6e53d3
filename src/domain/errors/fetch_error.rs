//! Image fetch error types.

use thiserror::Error;

/// Failure to obtain image bytes for a locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("network error while fetching image: {message}")]
    Transport { message: String },

    #[error("image request failed with HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("{message}")]
    Decode { message: String },
}

impl FetchError {
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
}
