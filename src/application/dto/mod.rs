//! Data transfer objects for the application layer.

mod search_dto;

pub use search_dto::{LoadOutcome, SearchSnapshot};
