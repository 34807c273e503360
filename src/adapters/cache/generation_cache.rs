//! Memoizing wrapper around a generation backend using a moka cache.
//!
//! Entries are keyed by (input text, arm id) and written once: a second
//! request for the same key returns the stored generation without calling the
//! backend. Concurrent requests for one key share a single in-flight call.
//! Failed calls leave no entry behind. There is no TTL or capacity bound.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::GenerationError;
use crate::domain::models::{Generation, Params};
use crate::domain::ports::GenerationBackend;

/// Cache key: the raw input text and the arm that rendered it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub input: String,
    pub arm_id: String,
}

impl CacheKey {
    pub fn new(input: impl Into<String>, arm_id: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            arm_id: arm_id.into(),
        }
    }
}

/// A generation plus whether it was served from the cache.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub generation: Arc<Generation>,
    pub hit: bool,
}

/// Write-once generation cache in front of a backend.
pub struct GenerationCache {
    backend: Arc<dyn GenerationBackend>,
    entries: Cache<CacheKey, Arc<Generation>>,
    timeout: Option<Duration>,
}

impl GenerationCache {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            entries: Cache::builder().build(),
            timeout: None,
        }
    }

    /// Abandon backend calls that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Return the cached generation for `key`, or call the backend with
    /// `prompt`/`params` and store the result.
    pub async fn get_or_generate(
        &self,
        key: CacheKey,
        prompt: &str,
        params: &Params,
    ) -> Result<CacheLookup, GenerationError> {
        let backend = Arc::clone(&self.backend);
        let timeout = self.timeout;
        let init = async move {
            let call = backend.generate(prompt, params);
            let generation = match timeout {
                Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                    GenerationError::Timeout(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX))
                })??,
                None => call.await?,
            };
            Ok::<_, GenerationError>(Arc::new(generation))
        };

        let entry = self
            .entries
            .entry(key)
            .or_try_insert_with(init)
            .await
            .map_err(|e: Arc<GenerationError>| (*e).clone())?;

        let hit = !entry.is_fresh();
        debug!(
            input = %entry.key().input,
            arm_id = %entry.key().arm_id,
            hit,
            "generation cache lookup"
        );

        Ok(CacheLookup {
            generation: entry.into_value(),
            hit,
        })
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored generations.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backends::MockBackend;
    use crate::domain::models::Usage;

    #[tokio::test]
    async fn test_second_lookup_is_a_hit() {
        let backend = Arc::new(MockBackend::constant("Final: Paris", Usage::new(10, 5)));
        let cache = GenerationCache::new(backend.clone());
        let key = CacheKey::new("Capital of France?", "arm_0");

        let first = cache.get_or_generate(key.clone(), "prompt", &Params::default()).await.unwrap();
        let second = cache.get_or_generate(key.clone(), "prompt", &Params::default()).await.unwrap();

        assert!(!first.hit);
        assert!(second.hit);
        assert_eq!(first.generation, second.generation);
        assert_eq!(backend.calls(), 1);
        assert!(cache.contains(&key));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_key_unwritten() {
        let backend = Arc::new(MockBackend::failing(GenerationError::RequestFailed("down".into())));
        let cache = GenerationCache::new(backend.clone());
        let key = CacheKey::new("q", "arm_0");

        let err = cache.get_or_generate(key.clone(), "p", &Params::default()).await.unwrap_err();
        assert_eq!(err, GenerationError::RequestFailed("down".into()));
        assert!(!cache.contains(&key));

        // A retry calls the backend again.
        let _ = cache.get_or_generate(key, "p", &Params::default()).await;
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_a_generation_error() {
        let backend = Arc::new(
            MockBackend::constant("late", Usage::default()).with_delay(Duration::from_millis(200)),
        );
        let cache = GenerationCache::new(backend).with_timeout(Duration::from_millis(10));
        let err = cache
            .get_or_generate(CacheKey::new("q", "a"), "p", &Params::default())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::Timeout(10));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_call() {
        let backend = Arc::new(
            MockBackend::constant("Final: 44", Usage::new(3, 3)).with_delay(Duration::from_millis(30)),
        );
        let cache = Arc::new(GenerationCache::new(backend.clone()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_generate(CacheKey::new("Compute 13 + 31", "arm_3"), "p", &Params::default())
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().generation.output, "Final: 44");
        }
        assert_eq!(backend.calls(), 1);
    }
}
