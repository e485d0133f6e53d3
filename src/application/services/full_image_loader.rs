//! Full-size image loading for a single viewer.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::services::ImageByteCache;
use crate::domain::entities::{ImageBytes, ImageItem, ImageItemId};
use crate::domain::errors::FetchError;

#[derive(Default)]
struct ViewerState {
    in_flight: Option<CancellationToken>,
    displayed: Option<(ImageItemId, Arc<ImageBytes>)>,
}

/// Loads the original rendition of one image at a time.
///
/// Starting a load cancels the previous one; a cancelled load never
/// replaces the displayed image, even if its download finishes.
pub struct FullImageLoader {
    cache: ImageByteCache,
    state: Mutex<ViewerState>,
}

impl FullImageLoader {
    /// Creates a loader backed by the shared cache.
    #[must_use]
    pub fn new(cache: ImageByteCache) -> Self {
        Self {
            cache,
            state: Mutex::new(ViewerState::default()),
        }
    }

    /// Loads `item`'s full-size image and displays it.
    ///
    /// Returns `Ok(None)` if another load or [`FullImageLoader::cancel`]
    /// superseded this one before it finished.
    ///
    /// # Errors
    /// Returns the cache's `FetchError` if this load is still current.
    pub async fn load(&self, item: &ImageItem) -> Result<Option<Arc<ImageBytes>>, FetchError> {
        let token = CancellationToken::new();
        if let Some(previous) = self.state.lock().in_flight.replace(token.clone()) {
            previous.cancel();
        }

        debug!(id = %item.id, url = %item.full_size, "Loading full-size image");

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(id = %item.id, "Full-size load cancelled");
                return Ok(None);
            }
            result = self.cache.get(&item.full_size) => result,
        };

        let mut state = self.state.lock();
        if token.is_cancelled() {
            return Ok(None);
        }
        state.in_flight = None;

        match result {
            Ok(image) => {
                state.displayed = Some((item.id.clone(), Arc::clone(&image)));
                Ok(Some(image))
            }
            Err(e) => {
                warn!(id = %item.id, error = %e, "Failed to load full-size image");
                Err(e)
            }
        }
    }

    /// Abandons the load in flight, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.state.lock().in_flight.take() {
            token.cancel();
        }
    }

    /// Returns the image currently shown.
    #[must_use]
    pub fn displayed(&self) -> Option<(ImageItemId, Arc<ImageBytes>)> {
        self.state.lock().displayed.clone()
    }

    /// Returns true while a load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }
}

impl std::fmt::Debug for FullImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FullImageLoader")
            .field("displayed", &state.displayed.as_ref().map(|(id, _)| id))
            .field("loading", &state.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready};

    use crate::domain::entities::{Dimensions, Locator, fixtures};
    use crate::domain::ports::{FetchResponse, Transport};

    /// Serves PNGs sized by locator; locators with a gate wait for it.
    #[derive(Default)]
    struct GatedTransport {
        sizes: HashMap<String, (u32, u32)>,
        gates: HashMap<String, Arc<Notify>>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn fetch(&self, locator: &Locator) -> Result<FetchResponse, FetchError> {
            if let Some(gate) = self.gates.get(locator.as_str()) {
                gate.notified().await;
            }
            match self.sizes.get(locator.as_str()) {
                Some(&(w, h)) => Ok(FetchResponse::new(200, fixtures::png(w, h))),
                None => Ok(FetchResponse::new(404, "")),
            }
        }
    }

    fn item(id: &str) -> ImageItem {
        ImageItem::new(
            id,
            Locator::parse(&format!("https://images.example.com/{id}-small.png")).unwrap(),
            Locator::parse(&format!("https://images.example.com/{id}.png")).unwrap(),
            Dimensions::new(10, 10),
        )
    }

    fn full(id: &str) -> String {
        format!("https://images.example.com/{id}.png")
    }

    #[tokio::test]
    async fn test_load_displays_image() {
        let mut transport = GatedTransport::default();
        transport.sizes.insert(full("a"), (5, 4));
        let loader = FullImageLoader::new(ImageByteCache::new(Arc::new(transport)));

        let image = loader.load(&item("a")).await.unwrap().unwrap();

        assert_eq!((image.width(), image.height()), (5, 4));
        let (id, _) = loader.displayed().unwrap();
        assert_eq!(id.as_str(), "a");
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_newer_load_supersedes_older_one() {
        let gate = Arc::new(Notify::new());
        let mut transport = GatedTransport::default();
        transport.sizes.insert(full("slow"), (9, 9));
        transport.sizes.insert(full("fast"), (3, 3));
        transport.gates.insert(full("slow"), gate.clone());
        let loader = FullImageLoader::new(ImageByteCache::new(Arc::new(transport)));

        let slow_item = item("slow");
        let mut slow = tokio_test::task::spawn(loader.load(&slow_item));
        assert_pending!(slow.poll());

        let fast = loader.load(&item("fast")).await.unwrap();
        assert!(fast.is_some());

        gate.notify_one();
        assert_eq!(assert_ready!(slow.poll()).map(|r| r.is_some()), Ok(false));

        let (id, image) = loader.displayed().unwrap();
        assert_eq!(id.as_str(), "fast");
        assert_eq!(image.width(), 3);
    }

    #[tokio::test]
    async fn test_cancel_keeps_previous_image() {
        let gate = Arc::new(Notify::new());
        let mut transport = GatedTransport::default();
        transport.sizes.insert(full("a"), (2, 2));
        transport.sizes.insert(full("b"), (7, 7));
        transport.gates.insert(full("b"), gate.clone());
        let loader = FullImageLoader::new(ImageByteCache::new(Arc::new(transport)));

        loader.load(&item("a")).await.unwrap();

        let b = item("b");
        let mut pending = tokio_test::task::spawn(loader.load(&b));
        assert_pending!(pending.poll());
        assert!(loader.is_loading());

        loader.cancel();
        gate.notify_one();

        assert_eq!(assert_ready!(pending.poll()).map(|r| r.is_some()), Ok(false));
        assert_eq!(loader.displayed().unwrap().0.as_str(), "a");
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_failure_of_current_load_is_reported() {
        let loader =
            FullImageLoader::new(ImageByteCache::new(Arc::new(GatedTransport::default())));

        let result = loader.load(&item("gone")).await;

        assert_eq!(result.unwrap_err(), FetchError::http_status(404));
        assert!(loader.displayed().is_none());
    }
}
