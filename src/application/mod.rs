//! Application layer with services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateful services driving the domain ports.
pub mod services;

pub use dto::{LoadOutcome, SearchSnapshot};
pub use services::{CacheStats, FullImageLoader, ImageByteCache, SearchPaginator};
