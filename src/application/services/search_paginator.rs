//! Page-aware search session driver.
//!
//! A session starts on `refresh` and is replaced wholesale by the next one.
//! Every load takes a generation number and a cancellation token; starting a
//! refresh cancels whatever load is in flight, and a load only applies its
//! response if it is still the newest one when the response arrives.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::application::dto::{LoadOutcome, SearchSnapshot};
use crate::domain::entities::{ImageItem, Page, SearchQuery, SearchResultPage};
use crate::domain::errors::SearchError;
use crate::domain::ports::SearchProvider;

#[derive(Debug, Default)]
struct Session {
    query: Option<SearchQuery>,
    current_page: Page,
    next_page: Option<Page>,
    items: Vec<ImageItem>,
    is_loading: bool,
    last_error: Option<SearchError>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

struct LoadTicket {
    generation: u64,
    token: CancellationToken,
}

impl Session {
    fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation = self.generation.wrapping_add(1);
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.is_loading = true;
        self.last_error = None;

        LoadTicket {
            generation: self.generation,
            token,
        }
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.generation == ticket.generation && !ticket.token.is_cancelled()
    }

    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            items: self.items.clone(),
            current_page: self.current_page,
            next_page: self.next_page,
            is_loading: self.is_loading,
            last_error: self.last_error.clone(),
        }
    }
}

/// Clears the loading flag when its load ends, on every exit path.
/// A superseded load leaves the flag to the load that replaced it.
struct LoadingGuard {
    session: Arc<Mutex<Session>>,
    generation: u64,
}

impl LoadingGuard {
    fn new(session: &Arc<Mutex<Session>>, ticket: &LoadTicket) -> Self {
        Self {
            session: Arc::clone(session),
            generation: ticket.generation,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut session = self.session.lock();
        if session.generation == self.generation {
            session.is_loading = false;
            session.in_flight = None;
        }
    }
}

/// Turns a user query into an accumulating, page-aware result list.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SearchPaginator {
    provider: Arc<dyn SearchProvider>,
    session: Arc<Mutex<Session>>,
}

impl SearchPaginator {
    /// Creates a paginator with no active session.
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            session: Arc::new(Mutex::new(Session::default())),
        }
    }

    /// Starts a new session for `text` and loads its first page.
    ///
    /// Cancels any load still in flight. On failure the session is left with
    /// no items and the error recorded as `last_error`.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidRequest` for a blank query (the current
    /// items are left untouched), or the provider's error for page one.
    pub async fn refresh(&self, text: &str) -> Result<LoadOutcome, SearchError> {
        let query = match SearchQuery::new(text) {
            Ok(query) => query,
            Err(e) => {
                warn!(error = %e, "Rejected search request");
                self.session.lock().last_error = Some(e.clone());
                return Err(e);
            }
        };

        let ticket = {
            let mut session = self.session.lock();
            let ticket = session.begin_load();
            session.query = Some(query.clone());
            session.current_page = Page::FIRST;
            session.next_page = Some(Page::FIRST);
            session.items.clear();
            ticket
        };
        let _loading = LoadingGuard::new(&self.session, &ticket);

        debug!(query = %query, generation = ticket.generation, "Refreshing search");

        let Some(result) = self.request(&ticket, &query, Page::FIRST).await else {
            return Ok(LoadOutcome::Superseded);
        };

        let mut session = self.session.lock();
        if !session.is_current(&ticket) {
            debug!(query = %query, "Discarding superseded first page");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                info!(
                    query = %query,
                    count = page.items.len(),
                    next_page = ?page.next_page.map(Page::get),
                    "Search refreshed"
                );
                session.items = page.items;
                session.next_page = page.next_page;
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search refresh failed");
                session.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Loads and appends the next page when `after` is the last item shown.
    ///
    /// No request is issued if there is no next page, if `after` is not the
    /// last accumulated item, or if a load is already in flight. Items from
    /// earlier pages are kept on failure. Appended items are not checked for
    /// ids already present.
    ///
    /// # Errors
    /// Returns the provider's error for the requested page.
    pub async fn load_next_page_if_at_end(
        &self,
        after: &ImageItem,
    ) -> Result<LoadOutcome, SearchError> {
        let (ticket, query, page) = {
            let mut session = self.session.lock();

            let Some(page) = session.next_page else {
                trace!("No further pages");
                return Ok(LoadOutcome::Skipped);
            };
            if session.items.last().is_none_or(|last| last.id != after.id) {
                trace!(id = %after.id, "Item is not the last one, not paging");
                return Ok(LoadOutcome::Skipped);
            }
            if session.is_loading {
                trace!("Load already in flight");
                return Ok(LoadOutcome::Skipped);
            }
            let Some(query) = session.query.clone() else {
                return Ok(LoadOutcome::Skipped);
            };

            (session.begin_load(), query, page)
        };
        let _loading = LoadingGuard::new(&self.session, &ticket);

        debug!(query = %query, page = page.get(), "Loading next page");

        let Some(result) = self.request(&ticket, &query, page).await else {
            return Ok(LoadOutcome::Superseded);
        };

        let mut session = self.session.lock();
        if !session.is_current(&ticket) {
            debug!(query = %query, page = page.get(), "Discarding superseded page");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(result_page) => {
                info!(
                    query = %query,
                    page = page.get(),
                    count = result_page.items.len(),
                    next_page = ?result_page.next_page.map(Page::get),
                    "Appended page"
                );
                session.current_page = page;
                session.items.extend(result_page.items);
                session.next_page = result_page.next_page;
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                warn!(query = %query, page = page.get(), error = %e, "Next page failed");
                session.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Abandons the load in flight, if any. Its response will be discarded.
    pub fn cancel(&self) {
        let mut session = self.session.lock();
        if let Some(token) = session.in_flight.take() {
            token.cancel();
            session.generation = session.generation.wrapping_add(1);
            session.is_loading = false;
            debug!("Cancelled in-flight search");
        }
    }

    async fn request(
        &self,
        ticket: &LoadTicket,
        query: &SearchQuery,
        page: Page,
    ) -> Option<Result<SearchResultPage, SearchError>> {
        tokio::select! {
            biased;
            () = ticket.token.cancelled() => {
                debug!(query = %query, page = page.get(), "Search request cancelled");
                None
            }
            result = self.provider.search(query, page) => Some(result),
        }
    }

    /// Returns a copy of the whole session state.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.session.lock().snapshot()
    }

    /// Returns the accumulated items.
    #[must_use]
    pub fn items(&self) -> Vec<ImageItem> {
        self.session.lock().items.clone()
    }

    /// Returns true while a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.session.lock().is_loading
    }

    /// Returns the failure of the most recent load.
    #[must_use]
    pub fn last_error(&self) -> Option<SearchError> {
        self.session.lock().last_error.clone()
    }

    /// Returns the cursor of the next page to load.
    #[must_use]
    pub fn next_page(&self) -> Option<Page> {
        self.session.lock().next_page
    }
}

impl std::fmt::Debug for SearchPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.session.lock();
        f.debug_struct("SearchPaginator")
            .field("query", &session.query)
            .field("items", &session.items.len())
            .field("next_page", &session.next_page)
            .field("is_loading", &session.is_loading)
            .finish_non_exhaustive()
    }
}
