//! Pexels photo search adapter.

mod client;
mod dto;

pub use client::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, Orientation, PEXELS_API_BASE, PexelsClient, PexelsOptions,
};
pub use dto::{PexelsPhoto, PexelsSearchResponse, PhotoVariants};
