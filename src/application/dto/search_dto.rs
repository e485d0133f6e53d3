//! Search state DTOs.

use crate::domain::entities::{ImageItem, Page, SearchQuery};
use crate::domain::errors::SearchError;

/// What a load call did with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied to the session.
    Applied,
    /// A newer load started first; the response was discarded.
    Superseded,
    /// Trigger conditions were not met; no request was issued.
    Skipped,
}

/// Read-only copy of the paginator's session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Active query, if any refresh has started.
    pub query: Option<SearchQuery>,
    /// Accumulated items in page order.
    pub items: Vec<ImageItem>,
    /// Last page successfully applied.
    pub current_page: Page,
    /// Cursor for the next page; `None` when exhausted.
    pub next_page: Option<Page>,
    /// True while a request is in flight.
    pub is_loading: bool,
    /// Failure of the most recent load.
    pub last_error: Option<SearchError>,
}

impl SearchSnapshot {
    /// Returns the last accumulated item.
    #[must_use]
    pub fn last_item(&self) -> Option<&ImageItem> {
        self.items.last()
    }

    /// Returns a human-readable error line for display.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }
}
