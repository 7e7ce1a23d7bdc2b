//! In-memory cache backend.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{CacheBackend, CacheItem, Expire};

/// Cache backend keeping items in a concurrent hash map.
///
/// Cloning is cheap only through an `Arc`; share one instance across managers
/// with `Arc<MemoryBackend>` to get cross-request reuse.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: DashMap<String, CacheItem>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the backend holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All stored cache ids, sorted.
    pub fn cids(&self) -> Vec<String> {
        let mut cids: Vec<String> = self.items.iter().map(|entry| entry.key().clone()).collect();
        cids.sort();
        cids
    }

    /// Remove `cid` only if the stored item is expired at `now`.
    ///
    /// Another caller may `set` a fresh item between the expiry check and
    /// this call; that item stays.
    fn evict_if_expired(&self, cid: &str, now: DateTime<Utc>) -> bool {
        let evicted = self.items.remove_if(cid, |_, item| !item.expire.is_valid_at(now)).is_some();
        if evicted {
            tracing::trace!("Evicted expired cache item {cid}");
        }
        evicted
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, cid: &str) -> Option<CacheItem> {
        let now = Utc::now();
        let item = self.items.get(cid)?;
        if item.expire.is_valid_at(now) {
            return Some(item.clone());
        }
        // Release the read guard before evicting
        drop(item);
        self.evict_if_expired(cid, now);
        None
    }

    fn set(&self, cid: &str, data: serde_json::Value, expire: Expire, tags: &[&str]) {
        let item = CacheItem {
            cid: cid.to_string(),
            data,
            expire,
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            created: Utc::now(),
        };
        self.items.insert(cid.to_string(), item);
    }

    fn delete(&self, cid: &str) {
        self.items.remove(cid);
    }

    fn invalidate_tags(&self, tags: &[&str]) {
        let before = self.items.len();
        self.items.retain(|_, item| !item.tags.iter().any(|tag| tags.contains(&tag.as_str())));
        tracing::debug!(
            "Invalidated {} cache item(s) for tags {:?}",
            before.saturating_sub(self.items.len()),
            tags
        );
    }
}
