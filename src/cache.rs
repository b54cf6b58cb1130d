//! Memoizing volunteer enrichment cache.
//!
//! Maps volunteer id to normalized contact details, populated lazily via
//! the upstream client. Uses [`moka`] so concurrent misses on the same id
//! coalesce into a single upstream fetch: `try_get_with` serializes the
//! read-modify-write per key. Entries never expire within a process
//! lifetime — a duty roster is small and bounded, so the cache carries no
//! TTL and no capacity limit. Load failures are not cached; a later call
//! for the same id retries upstream.
//!
//! Unlike a process-global cache, each [`VolunteerCache`] is owned by its
//! aggregator and handed to request handlers by reference.

use moka::future::Cache;

use crate::client::RotaClient;
use crate::error::{BoardError, Result};
use crate::types::VolunteerDetail;

/// Per-aggregator volunteer detail cache.
pub struct VolunteerCache {
    inner: Cache<u64, VolunteerDetail>,
}

impl VolunteerCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Look up a volunteer, fetching and memoizing on miss.
    ///
    /// The returned value is a copy; later cache writes never alter a
    /// detail already handed out.
    ///
    /// # Errors
    ///
    /// Propagates the upstream client's error when a miss cannot be
    /// populated. The failure is not stored.
    pub async fn get(&self, client: &RotaClient, id: u64) -> Result<VolunteerDetail> {
        self.inner
            .try_get_with(id, async {
                tracing::trace!(volunteer_id = id, "volunteer cache miss");
                client.fetch_volunteer(id).await
            })
            .await
            .map_err(|e: std::sync::Arc<BoardError>| (*e).clone())
    }

    /// Number of memoized volunteers. Pending inserts may lag; used for
    /// diagnostics only.
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VolunteerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    fn client() -> RotaClient {
        let config = BoardConfig {
            // Unroutable; any actual fetch in these tests is a bug.
            base_url: "http://127.0.0.1:9".into(),
            api_key: "test-key".into(),
            timeout_seconds: 1,
            ..Default::default()
        };
        RotaClient::new(&config).expect("client should build")
    }

    #[tokio::test]
    async fn miss_propagates_upstream_error() {
        let cache = VolunteerCache::new();
        let result = cache.get(&client(), 42).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = VolunteerCache::new();
        let _ = cache.get(&client(), 42).await;
        cache.inner.run_pending_tasks().await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn hit_returns_stored_value_without_fetch() {
        let cache = VolunteerCache::new();
        let detail = VolunteerDetail {
            id: 42,
            display_name: "Al".into(),
            contacts: vec![],
        };
        cache.inner.insert(42, detail.clone()).await;

        // The client points at an unroutable address, so a hit is the
        // only way this can succeed.
        let got = cache.get(&client(), 42).await.expect("should hit");
        assert_eq!(got, detail);
    }

    #[tokio::test]
    async fn new_cache_is_empty() {
        let cache = VolunteerCache::new();
        cache.inner.run_pending_tasks().await;
        assert!(cache.is_empty());
    }
}
