//! Application services.

mod full_image_loader;
mod image_byte_cache;
mod search_paginator;

pub use full_image_loader::FullImageLoader;
pub use image_byte_cache::{CacheStats, ImageByteCache};
pub use search_paginator::SearchPaginator;
