//! Search provider port definition.

use async_trait::async_trait;

use crate::domain::entities::{Page, SearchQuery, SearchResultPage};
use crate::domain::errors::SearchError;

/// Port for the external photo search API.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetches one page of results for the query.
    async fn search(&self, query: &SearchQuery, page: Page)
    -> Result<SearchResultPage, SearchError>;
}
