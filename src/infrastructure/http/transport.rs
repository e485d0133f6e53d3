//! reqwest-backed GET primitive.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{trace, warn};

use super::{USER_AGENT, describe_request_error};
use crate::domain::entities::Locator;
use crate::domain::errors::FetchError;
use crate::domain::ports::{FetchResponse, Transport};

/// Performs plain GET requests with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, locator: &Locator) -> Result<FetchResponse, FetchError> {
        trace!(url = %locator, "GET");

        let response = self
            .client
            .get(locator.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %locator, error = %e, "Image request failed");
                FetchError::transport(describe_request_error(&e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))?;

        trace!(url = %locator, status, len = body.len(), "Response received");

        Ok(FetchResponse { status, body })
    }
}
