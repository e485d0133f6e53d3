//! Pexels API response structures.

use serde::Deserialize;
use tracing::trace;

use crate::domain::entities::{Dimensions, ImageItem, Locator, Page, SearchResultPage};

/// Pexels `/search` response.
#[derive(Debug, Deserialize)]
pub struct PexelsSearchResponse {
    /// Page that was returned.
    pub page: u32,
    /// Page size that was applied.
    pub per_page: u32,
    /// Photos on this page.
    #[serde(default)]
    pub photos: Vec<PexelsPhoto>,
    /// Total hits for the query.
    #[serde(default)]
    pub total_results: u64,
    /// URL of the following page; absent on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
}

/// A photo entry.
#[derive(Debug, Deserialize)]
pub struct PexelsPhoto {
    /// Numeric photo id.
    pub id: u64,
    /// Original width.
    pub width: u32,
    /// Original height.
    pub height: u32,
    /// Photographer name.
    #[serde(default)]
    pub photographer: String,
    /// Photographer id.
    #[serde(default)]
    pub photographer_id: u64,
    /// Pexels page for the photo.
    #[serde(default)]
    pub url: String,
    /// Alternative text.
    #[serde(default)]
    pub alt: String,
    /// Rendition URLs.
    pub src: PhotoVariants,
}

/// Rendition URLs of a photo.
#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct PhotoVariants {
    pub original: String,
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    pub small: String,
    #[serde(default)]
    pub portrait: String,
    #[serde(default)]
    pub landscape: String,
    #[serde(default)]
    pub tiny: String,
}

impl PexelsPhoto {
    /// Maps to a domain item; `None` if a rendition URL is malformed.
    #[must_use]
    pub fn into_item(self) -> Option<ImageItem> {
        let thumbnail = Locator::parse(&self.src.small).ok()?;
        let full_size = Locator::parse(&self.src.original).ok()?;

        Some(ImageItem::new(
            self.id.to_string(),
            thumbnail,
            full_size,
            Dimensions::new(self.width, self.height),
        ))
    }
}

impl PexelsSearchResponse {
    /// Maps to a domain result page, dropping photos with bad URLs.
    #[must_use]
    pub fn into_result_page(self) -> SearchResultPage {
        let next_page = self.next_page.as_deref().and_then(page_from_url);
        let items = self
            .photos
            .into_iter()
            .filter_map(|photo| {
                let id = photo.id;
                let item = photo.into_item();
                if item.is_none() {
                    trace!(id, "Dropping photo with malformed URL");
                }
                item
            })
            .collect();

        SearchResultPage::new(items, next_page).with_total_results(self.total_results)
    }
}

/// Extracts the `page` query parameter of a pagination link.
fn page_from_url(url: &str) -> Option<Page> {
    let url = Locator::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .and_then(Page::new)
}
