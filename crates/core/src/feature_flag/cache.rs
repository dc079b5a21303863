//! Effective-value caching using Moka.
//!
//! Resolving a flag touches up to four rows. Resolved values are cached per
//! (flag, organization, user) and dropped whenever that flag is written.

use moka::sync::Cache;
use std::time::Duration;
use uuid::Uuid;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    feature_key: String,
    org_id: Option<Uuid>,
    user_id: Option<Uuid>,
}

/// Cache of resolved flag values. Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct FlagCache {
    cache: Cache<CacheKey, bool>,
}

impl FlagCache {
    /// Creates a cache with default settings (10k entries, 5 minute TTL).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self { cache }
    }

    /// Returns the cached value, if any.
    #[must_use]
    pub fn get(&self, feature_key: &str, org_id: Option<Uuid>, user_id: Option<Uuid>) -> Option<bool> {
        self.cache.get(&CacheKey {
            feature_key: feature_key.to_string(),
            org_id,
            user_id,
        })
    }

    /// Stores a resolved value.
    pub fn insert(&self, feature_key: &str, org_id: Option<Uuid>, user_id: Option<Uuid>, value: bool) {
        self.cache.insert(
            CacheKey {
                feature_key: feature_key.to_string(),
                org_id,
                user_id,
            },
            value,
        );
    }

    /// Drops every cached value of `feature_key`, for all orgs and users.
    pub fn invalidate_flag(&self, feature_key: &str) {
        let feature_key = feature_key.to_string();
        if self
            .cache
            .invalidate_entries_if(move |key, _| key.feature_key == feature_key)
            .is_err()
        {
            self.invalidate_all();
        }
    }

    /// Drops everything.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Runs pending maintenance (evictions and invalidation predicates).
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for FlagCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_keyed_by_org_and_user() {
        let cache = FlagCache::new();
        let org = Some(Uuid::now_v7());
        let user = Some(Uuid::now_v7());

        cache.insert("scheduling.meta.enabled", org, None, true);
        cache.insert("scheduling.meta.enabled", org, user, false);

        assert_eq!(cache.get("scheduling.meta.enabled", org, None), Some(true));
        assert_eq!(cache.get("scheduling.meta.enabled", org, user), Some(false));
        assert_eq!(cache.get("scheduling.meta.enabled", None, None), None);
    }

    #[test]
    fn test_invalidate_flag_is_scoped_to_key() {
        let cache = FlagCache::new();
        let org = Some(Uuid::now_v7());
        cache.insert("a", org, None, true);
        cache.insert("b", org, None, true);

        cache.invalidate_flag("a");
        cache.run_pending_tasks();

        assert_eq!(cache.get("a", org, None), None);
        assert_eq!(cache.get("b", org, None), Some(true));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = FlagCache::with_config(10, 60);
        cache.insert("a", None, None, false);
        cache.invalidate_all();
        assert_eq!(cache.get("a", None, None), None);
    }
}
