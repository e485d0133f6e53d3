//! Transport port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::Locator;
use crate::domain::errors::FetchError;

/// Raw response of a GET request. The status is reported, not judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl FetchResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for statuses in `[200, 300)`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Port for the HTTP GET primitive.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET against the locator.
    async fn fetch(&self, locator: &Locator) -> Result<FetchResponse, FetchError>;
}
