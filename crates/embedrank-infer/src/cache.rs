//! LRU cache of embedding rows, and a provider that uses it.
//!
//! Candidate phrases repeat across documents of the same corpus; caching
//! their rows avoids re-running the model. Default: 1000 entries, 1-hour TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use embedrank_core::{Error, Result};
use ndarray::{Array1, Array2};
use parking_lot::Mutex;
use tracing::debug;

use crate::embedder::EmbeddingProvider;

/// Cached embedding entry with timestamp.
struct CacheEntry {
    embedding: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache of embeddings keyed by input text.
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl EmbeddingCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (1000 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(1000, Duration::from_secs(3600))
    }

    /// Get a cached embedding. Returns None on miss or expired entry.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let (fresh, hit) = match inner.entries.get(text) {
            Some(entry) => (entry.inserted_at.elapsed() < ttl, entry.embedding.clone()),
            None => return None,
        };

        if !fresh {
            // Expired
            inner.entries.remove(text);
            inner.order.retain(|k| k != text);
            return None;
        }

        if let Some(pos) = inner.order.iter().position(|k| k == text) {
            let key = inner.order.remove(pos);
            inner.order.push(key);
        }
        Some(hit)
    }

    /// Insert an embedding into the cache.
    pub fn put(&self, text: String, embedding: Array1<f32>) {
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        // If already present, update and move to end
        if inner.entries.contains_key(&text) {
            inner.order.retain(|k| k != &text);
        } else {
            // Evict oldest if at capacity
            while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                inner.entries.remove(&oldest);
            }
        }

        inner.order.push(text.clone());
        inner.entries.insert(
            text,
            CacheEntry {
                embedding,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provider wrapper that answers repeated inputs from an [`EmbeddingCache`].
///
/// Misses of a batch are sent to the inner provider in a single call.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: EmbeddingCache,
}

impl<E: EmbeddingProvider> CachedEmbedder<E> {
    pub fn new(inner: E, cache: EmbeddingCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

impl<E: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
        let dim = self.inner.dimension();
        let mut matrix = Array2::zeros((texts.len(), dim));
        let mut misses: Vec<&str> = Vec::new();
        let mut miss_rows: HashMap<&str, Vec<usize>> = HashMap::new();

        for (i, &text) in texts.iter().enumerate() {
            match self.cache.get(text) {
                Some(row) if row.len() == dim => matrix.row_mut(i).assign(&row),
                _ => {
                    let rows = miss_rows.entry(text).or_default();
                    if rows.is_empty() {
                        misses.push(text);
                    }
                    rows.push(i);
                }
            }
        }

        debug!(
            "Embedding cache: {} hits, {} misses",
            texts.len() - miss_rows.values().map(Vec::len).sum::<usize>(),
            misses.len()
        );

        if misses.is_empty() {
            return Ok(matrix);
        }

        let fresh = self.inner.embed_batch(&misses)?;
        if fresh.nrows() != misses.len() {
            return Err(Error::DimensionMismatch {
                expected: misses.len(),
                actual: fresh.nrows(),
            });
        }
        if fresh.ncols() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: fresh.ncols(),
            });
        }

        for (text, row) in misses.iter().zip(fresh.rows()) {
            for &i in &miss_rows[text] {
                matrix.row_mut(i).assign(&row);
            }
            self.cache.put(text.to_string(), row.to_owned());
        }

        Ok(matrix)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = EmbeddingCache::new(10, Duration::from_secs(3600));
        assert!(cache.get("hello").is_none());

        cache.put("hello".into(), array![1.0, 2.0, 3.0]);
        let hit = cache.get("hello");
        assert!(hit.is_some());
        assert_eq!(hit.unwrap(), array![1.0, 2.0, 3.0]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_eviction() {
        let cache = EmbeddingCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), array![1.0]);
        cache.put("b".into(), array![2.0]);
        assert_eq!(cache.len(), 2);

        // Adding third should evict "a"
        cache.put("c".into(), array![3.0]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_ttl_expiry() {
        let cache = EmbeddingCache::new(10, Duration::from_millis(1));
        cache.put("ephemeral".into(), array![1.0]);

        // Sleep past TTL
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("ephemeral").is_none());
        assert!(cache.is_empty());
    }

    /// Provider that embeds a string as `[len, 1]` and counts how many texts it saw.
    struct Counting {
        seen: AtomicUsize,
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for Counting {
        fn embed_batch(&self, texts: &[&str]) -> Result<Array2<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.fetch_add(texts.len(), Ordering::SeqCst);
            let mut m = Array2::zeros((texts.len(), 2));
            for (i, t) in texts.iter().enumerate() {
                m[[i, 0]] = t.len() as f32;
                m[[i, 1]] = 1.0;
            }
            Ok(m)
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_cached_embedder_batches_misses() {
        let provider = CachedEmbedder::new(
            Counting {
                seen: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            },
            EmbeddingCache::default_cache(),
        );

        let first = provider.embed_batch(&["ab", "abc", "ab"]).unwrap();
        assert_eq!(first.row(0), array![2.0, 1.0]);
        assert_eq!(first.row(1), array![3.0, 1.0]);
        assert_eq!(first.row(2), array![2.0, 1.0]);
        // Duplicate inputs are only embedded once
        assert_eq!(provider.inner.seen.load(Ordering::SeqCst), 2);

        let second = provider.embed_batch(&["abc", "abcd"]).unwrap();
        assert_eq!(second.row(0), array![3.0, 1.0]);
        assert_eq!(second.row(1), array![4.0, 1.0]);
        assert_eq!(provider.inner.seen.load(Ordering::SeqCst), 3);
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);

        // Fully cached batch never reaches the inner provider
        provider.embed_batch(&["ab", "abcd"]).unwrap();
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.cache().len(), 3);
    }
}
