//! In-process, tag-invalidated cache for read endpoints.
//!
//! Values are stored as JSON alongside the tags they depend on. Mutations
//! call [`TagCache::invalidate_tag`] for every tag they affect; entries older
//! than the TTL are treated as misses.
//!
//! A load that overlaps any invalidation is returned to its caller but not
//! stored, so a value read before a write commits cannot outlive the write.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

struct CacheEntry {
    value: serde_json::Value,
    tags: Vec<String>,
    inserted_at: Instant,
}

/// Key/value cache whose entries are dropped by tag.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` and share.
pub struct TagCache {
    ttl: Duration,
    /// Bumped by every invalidation, under the write lock.
    generation: AtomicU64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TagCache {
    /// Create an empty cache whose entries live at most `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            generation: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the fresh cached value under `key`, or run `loader`, store its
    /// result under `key` with `tags`, and return it.
    ///
    /// Loader errors are returned as-is and nothing is cached.
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        key: &str,
        tags: &[String],
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            return Ok(hit);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let value = loader().await?;
        match serde_json::to_value(&value) {
            Ok(json) => self.insert(key, tags, json, generation).await,
            Err(e) => tracing::warn!(key, error = %e, "Skipping cache insert"),
        }
        Ok(value)
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    async fn insert(&self, key: &str, tags: &[String], value: serde_json::Value, generation: u64) {
        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(key, "Cache invalidated during load, not storing");
            return;
        }
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                tags: tags.to_vec(),
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry carrying `tag`.
    pub async fn invalidate_tag(&self, tag: &str) {
        self.invalidate_tags(&[tag]).await;
    }

    /// Drop every entry carrying any of `tags`.
    pub async fn invalidate_tags<S: AsRef<str>>(&self, tags: &[S]) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let before = entries.len();
        entries.retain(|_, e| {
            !e.tags
                .iter()
                .any(|t| tags.iter().any(|x| x.as_ref() == t.as_str()))
        });
        let dropped = before - entries.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Cache entries invalidated");
        }
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn load(cache: &TagCache, key: &str, t: &[String], calls: &AtomicUsize) -> Vec<i64> {
        cache
            .get_or_load(key, t, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(vec![1, 2, 3])
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = TagCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let t = tags(&["document:1"]);

        assert_eq!(load(&cache, "a", &t, &calls).await, vec![1, 2, 3]);
        assert_eq!(load(&cache, "a", &t, &calls).await, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_tag_drops_only_tagged_entries() {
        let cache = TagCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        load(&cache, "a", &tags(&["document:1", "documents:public"]), &calls).await;
        load(&cache, "b", &tags(&["document:2"]), &calls).await;
        assert_eq!(cache.len().await, 2);

        cache.invalidate_tag("documents:public").await;
        assert_eq!(cache.len().await, 1);

        load(&cache, "a", &tags(&["document:1"]), &calls).await;
        load(&cache, "b", &tags(&["document:2"]), &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_expired_entries_reload() {
        let cache = TagCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let t = tags(&["entry:1"]);

        load(&cache, "a", &t, &calls).await;
        load(&cache, "a", &t, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loader_error_is_not_cached() {
        let cache = TagCache::new(Duration::from_secs(60));
        let result: Result<Vec<i64>, &str> =
            cache.get_or_load("a", &tags(&["x"]), || async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_value_loaded_across_invalidation_is_not_stored() {
        let cache = TagCache::new(Duration::from_secs(60));
        let shared = &cache;
        let t = tags(&["document:1"]);

        let first: Vec<String> = cache
            .get_or_load("a", &t, || async move {
                // A write lands while the read is in flight.
                shared.invalidate_tag("document:1").await;
                Ok::<_, Infallible>(vec!["The quick fox".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(first, vec!["The quick fox"]);
        assert!(cache.is_empty().await);

        let second: Vec<String> = cache
            .get_or_load("a", &t, || async {
                Ok::<_, Infallible>(vec!["The slow fox".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(second, vec!["The slow fox"]);
        assert_eq!(cache.len().await, 1);
    }
}
