/// Client-side cache of fetched image bytes
///
/// The browser's lazy <img> loading becomes an explicit cache here:
/// tiles render as placeholders until the bytes for their backend path
/// arrive. Each distinct path is fetched at most once; result paths can
/// repeat across searches, so a repeat render costs no network call.

use iced::widget::image;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ImageCache {
    loaded: HashMap<String, image::Handle>,
    pending: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded handle for a path, if its bytes have arrived
    pub fn get(&self, path: &str) -> Option<&image::Handle> {
        self.loaded.get(path)
    }

    /// Mark a path as being fetched. Returns false when the path is
    /// already loaded or already on the wire, meaning no fetch should
    /// be started.
    pub fn begin_fetch(&mut self, path: &str) -> bool {
        if self.loaded.contains_key(path) || self.pending.contains(path) {
            return false;
        }
        self.pending.insert(path.to_string());
        true
    }

    /// Store fetched bytes; decoding happens inside the image widget
    pub fn insert(&mut self, path: String, bytes: Vec<u8>) {
        self.pending.remove(&path);
        self.loaded.insert(path, image::Handle::from_bytes(bytes));
    }

    /// A fetch failed; allow a later render to retry the path
    pub fn fetch_failed(&mut self, path: &str) {
        self.pending.remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_fetch_deduplicates() {
        let mut cache = ImageCache::new();

        assert!(cache.begin_fetch("/a.jpg"));
        // Already pending
        assert!(!cache.begin_fetch("/a.jpg"));

        cache.insert("/a.jpg".to_string(), vec![0xFF, 0xD8]);
        // Already loaded
        assert!(!cache.begin_fetch("/a.jpg"));
        assert!(cache.get("/a.jpg").is_some());
    }

    #[test]
    fn test_failed_fetch_can_be_retried() {
        let mut cache = ImageCache::new();

        assert!(cache.begin_fetch("/a.jpg"));
        cache.fetch_failed("/a.jpg");
        assert!(cache.get("/a.jpg").is_none());
        assert!(cache.begin_fetch("/a.jpg"));
    }
}
