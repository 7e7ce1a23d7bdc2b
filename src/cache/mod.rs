//! Key-value cache with tag-based invalidation
//!
//! The local task manager stores two kinds of derived data here:
//! - the processed definition set, under `local_task:<langcode>`
//! - one hierarchy entry per route, under `local_task:<langcode>:<route>`
//!
//! Both are tagged `local_task`, so a single [`CacheBackend::invalidate_tags`]
//! call drops every derived entry when definitions change.
//!
//! # Architecture
//!
//! - [`CacheBackend`]: the collaborator contract (`get`, `set`, `delete`,
//!   `invalidate_tags`)
//! - [`CacheItem`]: a stored value plus its expiry, tags and creation time
//! - [`MemoryBackend`]: a process-wide backend built on `DashMap`
//!
//! Data is stored as [`serde_json::Value`], which keeps backends agnostic of
//! the payload type and makes entries trivially serialisable.
//!
//! # Concurrency
//!
//! Writers follow compute-then-set. Recomputing an entry from immutable
//! definitions is idempotent, so concurrent writers may race but always
//! converge on the same value; `set` only needs to be atomic per key.

mod memory;

pub use memory::MemoryBackend;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a cache item stops being valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expire {
    /// Valid until explicitly deleted or invalidated by tag.
    Permanent,
    /// Valid until the given instant.
    At(DateTime<Utc>),
}

impl Expire {
    /// Whether an item with this expiry is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Permanent => true,
            Self::At(deadline) => now < *deadline,
        }
    }
}

/// A cached value with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheItem {
    /// Cache id the item was stored under.
    pub cid: String,
    /// The stored payload.
    pub data: serde_json::Value,
    /// Expiry of the item.
    pub expire: Expire,
    /// Invalidation tags.
    pub tags: Vec<String>,
    /// When the item was written.
    pub created: DateTime<Utc>,
}

/// Collaborator contract for cache storage.
///
/// Implementations must be safe to share between requests. A `get` for an
/// expired or invalidated item returns `None`.
pub trait CacheBackend: Send + Sync {
    /// Fetch a valid item by cache id.
    fn get(&self, cid: &str) -> Option<CacheItem>;

    /// Store `data` under `cid`, replacing any previous item atomically.
    fn set(&self, cid: &str, data: serde_json::Value, expire: Expire, tags: &[&str]);

    /// Remove a single item.
    fn delete(&self, cid: &str);

    /// Remove every item carrying at least one of `tags`.
    fn invalidate_tags(&self, tags: &[&str]);
}
