//! Image search result entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource address of a fetchable image.
pub type Locator = reqwest::Url;

/// Stable identifier of an image across result pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageItemId(String);

impl ImageItemId {
    /// Creates a new `ImageItemId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Pixel dimensions of the original photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions from width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single search hit. Identity is the `id`; two items with the same id are
/// the same photo even when they arrive on different pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageItem {
    /// Provider-assigned identifier.
    pub id: ImageItemId,
    /// Small rendition used in grids.
    pub thumbnail: Locator,
    /// Original rendition used by the viewer.
    pub full_size: Locator,
    /// Size of the original.
    pub dimensions: Dimensions,
}

impl ImageItem {
    /// Creates a new image item.
    #[must_use]
    pub fn new(
        id: impl Into<ImageItemId>,
        thumbnail: Locator,
        full_size: Locator,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            id: id.into(),
            thumbnail,
            full_size,
            dimensions,
        }
    }

    /// Returns true if both items denote the same photo.
    #[must_use]
    pub fn same_entity(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(path: &str) -> Locator {
        Locator::parse(&format!("https://images.example.com/{path}")).unwrap()
    }

    #[test]
    fn test_identity_is_the_id() {
        let a = ImageItem::new(
            "42",
            locator("a-small.jpg"),
            locator("a.jpg"),
            Dimensions::new(10, 20),
        );
        let b = ImageItem::new(
            "42",
            locator("b-small.jpg"),
            locator("b.jpg"),
            Dimensions::new(30, 40),
        );

        assert!(a.same_entity(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::new(640, 480).to_string(), "640x480");
    }
}
