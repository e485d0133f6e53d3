//! Pexels search API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::dto::PexelsSearchResponse;
use crate::domain::entities::{ApiKey, Locator, Page, SearchQuery, SearchResultPage};
use crate::domain::errors::SearchError;
use crate::domain::ports::SearchProvider;
use crate::infrastructure::http::{USER_AGENT, describe_request_error};

/// Default Pexels API root.
pub const PEXELS_API_BASE: &str = "https://api.pexels.com/v1";
/// Default page size.
pub const DEFAULT_PER_PAGE: u32 = 20;
/// Largest page size Pexels accepts.
pub const MAX_PER_PAGE: u32 = 80;

/// Photo orientation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide.
    Portrait,
    /// Roughly square.
    Square,
}

impl Orientation {
    /// Returns the API parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tunables for the search client.
#[derive(Debug, Clone)]
pub struct PexelsOptions {
    /// API root, without trailing `/search`.
    pub base_url: String,
    /// Results per page, clamped to `1..=80`.
    pub per_page: u32,
    /// Optional orientation filter.
    pub orientation: Option<Orientation>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for PexelsOptions {
    fn default() -> Self {
        Self {
            base_url: PEXELS_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            orientation: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Searches photos through the Pexels REST API.
pub struct PexelsClient {
    client: Client,
    endpoint: Locator,
    api_key: ApiKey,
    per_page: u32,
    orientation: Option<Orientation>,
}

impl PexelsClient {
    /// Creates a client with default options.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api_key: ApiKey) -> Result<Self, SearchError> {
        Self::with_options(api_key, PexelsOptions::default())
    }

    /// Creates a client with custom options.
    ///
    /// # Errors
    /// Returns `InvalidRequest` if the base URL does not parse, or an error
    /// if HTTP client creation fails.
    pub fn with_options(api_key: ApiKey, options: PexelsOptions) -> Result<Self, SearchError> {
        let endpoint = format!("{}/search", options.base_url.trim_end_matches('/'));
        let endpoint = Locator::parse(&endpoint).map_err(|e| {
            SearchError::invalid_request(format!("invalid API base URL {}: {e}", options.base_url))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()
            .map_err(|e| SearchError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            per_page: options.per_page.clamp(1, MAX_PER_PAGE),
            orientation: options.orientation,
        })
    }

    /// Builds the request URL for a query and page.
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery, page: Page) -> Locator {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query", query.as_str())
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &self.per_page.to_string());
            if let Some(orientation) = self.orientation {
                pairs.append_pair("orientation", orientation.as_str());
            }
        }
        url
    }
}

impl std::fmt::Debug for PexelsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PexelsClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key)
            .field("per_page", &self.per_page)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchProvider for PexelsClient {
    async fn search(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<SearchResultPage, SearchError> {
        let url = self.search_url(query, page);

        debug!(query = %query, page = page.get(), "Searching Pexels");

        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach Pexels");
                SearchError::transport(describe_request_error(&e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(query = %query, status = status.as_u16(), "Pexels rejected search");
            return Err(SearchError::http_status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::transport(format!("failed to read body: {e}")))?;

        let decoded: PexelsSearchResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse search response");
            SearchError::decode(e.to_string())
        })?;

        debug!(
            query = %query,
            page = decoded.page,
            photos = decoded.photos.len(),
            total = decoded.total_results,
            "Search response received"
        );

        Ok(decoded.into_result_page())
    }
}
