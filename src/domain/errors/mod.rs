//! Domain error types.

mod fetch_error;
mod search_error;

pub use fetch_error::FetchError;
pub use search_error::SearchError;
