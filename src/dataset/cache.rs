//! # Dataset caching
//!
//! The evaluator asks for every dataset once per individual, so a generation of
//! 150 individuals over 11 datasets reads 1650 windows that are mostly
//! identical. [`CachedDatasetProvider`] memoizes the windows of a wrapped
//! provider, including "not found" answers. Read errors are not cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{DatasetProvider, PriceWindow};
use crate::error::Result;

type WindowCache = HashMap<(String, usize), Option<PriceWindow>>;

/// A wrapper around a provider that caches the windows it returns.
#[derive(Debug, Clone)]
pub struct CachedDatasetProvider<P>
where
    P: DatasetProvider,
{
    /// The wrapped provider
    provider: P,
    /// Windows keyed by dataset id and window size
    cache: Arc<Mutex<WindowCache>>,
}

impl<P> CachedDatasetProvider<P>
where
    P: DatasetProvider,
{
    /// Creates a new cached provider wrapping the given provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns a reference to the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }

    /// Returns the number of cached answers.
    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    /// Clears the cache.
    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, WindowCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> DatasetProvider for CachedDatasetProvider<P>
where
    P: DatasetProvider,
{
    fn read(&self, id: &str, window: usize) -> Result<Option<PriceWindow>> {
        let key = (id.to_string(), window);
        let mut cache = self.lock();

        if let Some(cached) = cache.get(&key) {
            return Ok(cached.clone());
        }

        let fresh = self.provider.read(id, window)?;
        cache.insert(key, fresh.clone());

        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default)]
    struct CountingProvider {
        reads: Arc<AtomicUsize>,
    }

    impl CountingProvider {
        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl DatasetProvider for CountingProvider {
        fn read(&self, id: &str, window: usize) -> Result<Option<PriceWindow>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match id {
                "missing" => Ok(None),
                "broken" => Err(SearchError::Dataset("unreadable".to_string())),
                _ => Ok(Some(PriceWindow {
                    columns: vec!["Close".to_string()],
                    index: (0..window).collect(),
                    data: (0..window).map(|i| vec![i.to_string()]).collect(),
                })),
            }
        }
    }

    #[test]
    fn test_cached_provider() {
        let provider = CountingProvider::default();
        let cached = CachedDatasetProvider::new(provider.clone());

        let first = cached.read("EURUSD60.csv", 3).unwrap();
        let second = cached.read("EURUSD60.csv", 3).unwrap();
        assert_eq!(provider.reads(), 1);
        assert_eq!(first, second);

        // A different window size is a different key
        cached.read("EURUSD60.csv", 2).unwrap();
        assert_eq!(provider.reads(), 2);
        assert_eq!(cached.cache_size(), 2);

        cached.clear_cache();
        cached.read("EURUSD60.csv", 3).unwrap();
        assert_eq!(provider.reads(), 3);
    }

    #[test]
    fn test_not_found_is_cached() {
        let provider = CountingProvider::default();
        let cached = CachedDatasetProvider::new(provider.clone());

        assert!(cached.read("missing", 3).unwrap().is_none());
        assert!(cached.read("missing", 3).unwrap().is_none());
        assert_eq!(provider.reads(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let provider = CountingProvider::default();
        let cached = CachedDatasetProvider::new(provider.clone());

        assert!(cached.read("broken", 3).is_err());
        assert!(cached.read("broken", 3).is_err());
        assert_eq!(provider.reads(), 2);
        assert_eq!(cached.cache_size(), 0);
    }
}
