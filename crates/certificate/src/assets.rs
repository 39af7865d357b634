//! Memoized image assets (header logos and overlay background sources)
//!
//! Assets are fetched and decoded once per source id and shared across
//! generations. Failed loads are never cached, so a missing logo is retried on
//! the next call.

use crate::{CertificateError, Result};
use log::{debug, warn};
use moka::sync::Cache;
use pdf_core::ImageXObject;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Source of raw asset bytes
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, source: &str) -> Result<Vec<u8>>;
}

/// Reads assets from the filesystem, relative to an optional root
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl AssetFetcher for FileFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>> {
        let path = match &self.root {
            Some(root) => root.join(source),
            None => PathBuf::from(source),
        };
        std::fs::read(&path)
            .map_err(|e| CertificateError::AssetError(format!("{}: {}", path.display(), e)))
    }
}

/// Serves assets the caller already holds in memory
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, source: &str, data: Vec<u8>) -> Self {
        self.assets.insert(source.to_string(), data);
        self
    }
}

impl AssetFetcher for StaticFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>> {
        self.assets
            .get(source)
            .cloned()
            .ok_or_else(|| CertificateError::AssetError(format!("unknown asset: {source}")))
    }
}

/// Process-wide image cache keyed by source id
#[derive(Clone)]
pub struct AssetCache {
    cache: Cache<String, Arc<ImageXObject>>,
    fetcher: Arc<dyn AssetFetcher>,
}

impl AssetCache {
    /// Cache reading from the filesystem
    ///
    /// `capacity` bounds the number of cached images; `None` keeps every
    /// asset for the life of the cache.
    pub fn new(capacity: Option<u64>) -> Self {
        Self::with_fetcher(Arc::new(FileFetcher::default()), capacity)
    }

    pub fn with_fetcher(fetcher: Arc<dyn AssetFetcher>, capacity: Option<u64>) -> Self {
        let builder = Cache::builder();
        let cache = match capacity {
            Some(max) => builder.max_capacity(max).build(),
            None => builder.build(),
        };
        Self { cache, fetcher }
    }

    /// Decoded asset for `source`, or `None` if it cannot be fetched or decoded
    pub fn load(&self, source: &str) -> Option<Arc<ImageXObject>> {
        if let Some(image) = self.cache.get(source) {
            debug!("Asset cache hit: {source}");
            return Some(image);
        }

        debug!("Asset cache miss: {source}");
        match self.fetch_and_decode(source) {
            Ok(image) => {
                let image = Arc::new(image);
                self.cache.insert(source.to_string(), Arc::clone(&image));
                Some(image)
            }
            Err(e) => {
                warn!("Failed to load asset {source}: {e}");
                None
            }
        }
    }

    fn fetch_and_decode(&self, source: &str) -> Result<ImageXObject> {
        let data = self.fetcher.fetch(source)?;
        Ok(ImageXObject::decode(&data)?)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.cache.contains_key(source)
    }

    /// Number of cached assets
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 51, 102]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    /// Counts fetches so cache hits can be observed
    struct CountingFetcher {
        inner: StaticFetcher,
        calls: AtomicUsize,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, source: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(source)
        }
    }

    fn counting(assets: StaticFetcher) -> Arc<CountingFetcher> {
        Arc::new(CountingFetcher {
            inner: assets,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_load_is_memoized() {
        let fetcher = counting(StaticFetcher::new().with_asset("seal.png", png_bytes()));
        let cache = AssetCache::with_fetcher(fetcher.clone(), None);

        let first = cache.load("seal.png").unwrap();
        let second = cache.load("seal.png").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.width, 2);
        assert!(cache.contains("seal.png"));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let fetcher = counting(
            StaticFetcher::new().with_asset("broken.png", b"not an image".to_vec()),
        );
        let cache = AssetCache::with_fetcher(fetcher.clone(), None);

        assert!(cache.load("missing.png").is_none());
        assert!(cache.load("broken.png").is_none());
        assert!(cache.load("broken.png").is_none());

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_file_fetcher_missing_file() {
        let fetcher = FileFetcher::new(Some(PathBuf::from("/nonexistent")));
        assert!(matches!(
            fetcher.fetch("logo.png"),
            Err(CertificateError::AssetError(_))
        ));
    }

    #[test]
    fn test_file_fetcher_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("certificate-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("logo.png"), png_bytes()).unwrap();

        let cache = AssetCache::with_fetcher(Arc::new(FileFetcher::new(Some(dir.clone()))), Some(8));
        assert!(cache.load("logo.png").is_some());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(!cache.contains("logo.png"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = AssetCache::with_fetcher(
            Arc::new(StaticFetcher::new().with_asset("seal.png", png_bytes())),
            None,
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.load("seal.png").is_some())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(cache.len(), 1);
    }
}
