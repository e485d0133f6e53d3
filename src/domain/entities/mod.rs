//! Domain entity definitions.

mod api_key;
mod image_bytes;
mod image_item;
mod search;

pub use api_key::ApiKey;
pub use image_bytes::ImageBytes;
#[cfg(test)]
pub(crate) use image_bytes::fixtures;
pub use image_item::{Dimensions, ImageItem, ImageItemId, Locator};
pub use search::{Page, SearchQuery, SearchResultPage};
