//! Line-oriented front-end driving the search services.

use std::io::Write;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use futures_util::{StreamExt, stream};
use tracing::{info, warn};

use crate::application::dto::{LoadOutcome, SearchSnapshot};
use crate::application::services::{FullImageLoader, ImageByteCache, SearchPaginator};
use crate::domain::entities::{ImageBytes, ImageItem};
use crate::domain::errors::FetchError;

/// What a single console run should do.
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Search text.
    pub query: String,
    /// Pages to load, at least one.
    pub pages: u32,
    /// Download every thumbnail through the cache.
    pub thumbnails: bool,
    /// Id of a result to open at full size.
    pub open: Option<String>,
    /// Maximum thumbnail downloads in flight.
    pub max_concurrent_downloads: usize,
}

/// Renders search results as text, scrolling through pages on request.
pub struct Console {
    paginator: SearchPaginator,
    cache: ImageByteCache,
    viewer: FullImageLoader,
}

impl Console {
    /// Creates a console over explicitly constructed services.
    #[must_use]
    pub const fn new(
        paginator: SearchPaginator,
        cache: ImageByteCache,
        viewer: FullImageLoader,
    ) -> Self {
        Self {
            paginator,
            cache,
            viewer,
        }
    }

    /// Runs one search session and writes the results to `out`.
    ///
    /// # Errors
    /// Returns error if the first page cannot be loaded, the requested image
    /// cannot be opened, or `out` cannot be written.
    pub async fn run(&self, options: &ConsoleOptions, out: &mut impl Write) -> Result<()> {
        self.paginator
            .refresh(&options.query)
            .await
            .wrap_err_with(|| format!("search for {:?} failed", options.query))?;

        for _ in 1..options.pages.max(1) {
            let Some(last) = self.paginator.snapshot().last_item().cloned() else {
                break;
            };
            match self.paginator.load_next_page_if_at_end(&last).await {
                Ok(LoadOutcome::Applied) => {}
                Ok(LoadOutcome::Skipped | LoadOutcome::Superseded) => break,
                Err(e) => {
                    warn!(error = %e, "Stopping pagination");
                    break;
                }
            }
        }

        let snapshot = self.paginator.snapshot();
        render_results(out, &snapshot)?;

        if options.thumbnails {
            let results = self
                .fetch_thumbnails(&snapshot.items, options.max_concurrent_downloads)
                .await;
            render_thumbnails(out, &results)?;
            writeln!(out, "{}", self.cache.stats())?;
        }

        if let Some(id) = &options.open {
            let item = snapshot
                .items
                .iter()
                .find(|item| item.id.as_str() == id)
                .ok_or_else(|| eyre!("no result with id {id}"))?;
            match self.viewer.load(item).await? {
                Some(image) => writeln!(
                    out,
                    "opened {}: {}x{} ({} bytes)",
                    item.id,
                    image.width(),
                    image.height(),
                    image.len()
                )?,
                None => writeln!(out, "load of {} was cancelled", item.id)?,
            }
        }

        Ok(())
    }

    async fn fetch_thumbnails(
        &self,
        items: &[ImageItem],
        concurrency: usize,
    ) -> Vec<(ImageItem, Result<Arc<ImageBytes>, FetchError>)> {
        info!(count = items.len(), "Fetching thumbnails");

        let mut results: Vec<_> = stream::iter(items.iter().cloned())
            .map(|item| async move {
                let result = self.cache.get(&item.thumbnail).await;
                (item, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let order = |item: &ImageItem| items.iter().position(|i| i.id == item.id);
        results.sort_by_key(|(item, _)| order(item));
        results
    }
}

/// Writes one line per accumulated item followed by a status line.
///
/// # Errors
/// Returns error if `out` cannot be written.
pub fn render_results(out: &mut impl Write, snapshot: &SearchSnapshot) -> std::io::Result<()> {
    for item in &snapshot.items {
        writeln!(
            out,
            "{:>10}  {:>11}  {}",
            item.id,
            item.dimensions.to_string(),
            item.thumbnail
        )?;
    }

    let more = match snapshot.next_page {
        Some(page) => format!("next page {page}"),
        None => "no more pages".to_string(),
    };
    writeln!(out, "{} results, {more}", snapshot.items.len())?;

    if let Some(message) = snapshot.error_message() {
        writeln!(out, "error: {message}")?;
    }

    Ok(())
}

fn render_thumbnails(
    out: &mut impl Write,
    results: &[(ImageItem, Result<Arc<ImageBytes>, FetchError>)],
) -> std::io::Result<()> {
    for (item, result) in results {
        match result {
            Ok(image) => writeln!(
                out,
                "{:>10}  thumbnail {}x{}",
                item.id,
                image.width(),
                image.height()
            )?,
            Err(e) => writeln!(out, "{:>10}  thumbnail failed: {e}", item.id)?,
        }
    }
    Ok(())
}
