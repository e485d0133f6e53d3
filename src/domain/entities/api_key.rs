//! Provider API key value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Static API credential sent with every search request.
/// The key is wiped from memory when dropped and never printed in full.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Creates a key, rejecting blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Returns key as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked key for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let visible_prefix: String = self.value.chars().take(4).collect();
        let visible_suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "563492ad6f91700001000001abcdef0123456789";

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_key_masking() {
        let key = ApiKey::new(KEY).unwrap();
        let masked = key.masked();

        assert!(masked.contains("..."));
        assert!(!masked.contains(KEY));
    }

    #[test]
    fn test_short_key_fully_masked() {
        let key = ApiKey::new("abc").unwrap();
        assert_eq!(key.masked(), "***");
    }

    #[test]
    fn test_masking_respects_char_boundaries() {
        let key = ApiKey::new("abcé0123456789xyzé").unwrap();

        assert_eq!(key.masked(), "abcé...xyzé");
        assert_eq!(format!("{key}"), "abcé...xyzé");
    }

    #[test]
    fn test_short_multibyte_key_fully_masked() {
        let key = ApiKey::new("ééé").unwrap();
        assert_eq!(key.masked(), "***");
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = ApiKey::new(KEY).unwrap();
        let debug_output = format!("{key:?}");

        assert!(!debug_output.contains(KEY));
    }
}
