//! Search request and result value objects.

use std::fmt;
use std::num::NonZeroU32;

use crate::domain::entities::ImageItem;
use crate::domain::errors::SearchError;

/// Non-empty free-text search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Creates a query, rejecting blank input.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidRequest` if the text is empty or whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, SearchError> {
        let text = text.into().trim().to_string();

        if text.is_empty() {
            return Err(SearchError::invalid_request("query cannot be empty"));
        }

        Ok(Self { text })
    }

    /// Returns the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Page(NonZeroU32);

impl Page {
    /// The first page of any result set.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a page cursor. Returns `None` for zero.
    #[must_use]
    pub const fn new(number: u32) -> Option<Self> {
        match NonZeroU32::new(number) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the following page, or `None` on overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of provider results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultPage {
    /// Items in provider order.
    pub items: Vec<ImageItem>,
    /// Cursor for the following page; `None` when exhausted.
    pub next_page: Option<Page>,
    /// Total hits reported by the provider.
    pub total_results: u64,
}

impl SearchResultPage {
    /// Creates a result page.
    #[must_use]
    pub fn new(items: Vec<ImageItem>, next_page: Option<Page>) -> Self {
        Self {
            items,
            next_page,
            total_results: 0,
        }
    }

    /// Sets the total hit count.
    #[must_use]
    pub const fn with_total_results(mut self, total: u64) -> Self {
        self.total_results = total;
        self
    }
}
