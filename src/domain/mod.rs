//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageItem, ImageItemId, Locator, Page, SearchQuery, SearchResultPage};
pub use errors::{FetchError, SearchError};
pub use ports::{SearchProvider, Transport};
