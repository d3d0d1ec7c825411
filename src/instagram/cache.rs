//! Short-lived in-memory cache of successful retrievals

use crate::types::Post;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current monotonic time
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Clone, Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Clock frozen at the moment of creation
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|o| *o).unwrap_or_default();
        self.start + offset
    }
}

/// Stored post with its insertion time
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Account as requested when the entry was written
    pub account: String,
    /// The cached post
    pub post: Post,
    /// When the entry was written
    pub stored_at: Instant,
}

/// Store of recently retrieved posts, keyed by account
#[async_trait]
pub trait PostCache: Send + Sync {
    /// Fresh post for `account`, if any
    async fn get(&self, account: &str) -> Option<Post>;

    /// Store `post` for `account`, replacing any previous entry
    async fn put(&self, account: &str, post: Post);
}

/// Process-local [`PostCache`] with a fixed time-to-live
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Cache on the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Cache on a caller-supplied clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Whether `entry` is older than the time-to-live at `now`
    pub fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) > self.ttl
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn cache_key(account: &str) -> String {
    account.trim().to_lowercase()
}

#[async_trait]
impl PostCache for MemoryCache {
    async fn get(&self, account: &str) -> Option<Post> {
        let key = cache_key(account);
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return None,
                Some(entry) if !self.is_expired(entry, now) => return Some(entry.post.clone()),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer refreshed it in the meantime
        let mut entries = self.entries.write().await;
        if entries
            .get(&key)
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            entries.remove(&key);
            tracing::debug!(account = %account, "Evicted expired cache entry");
        }
        None
    }

    async fn put(&self, account: &str, post: Post) {
        let entry = CacheEntry {
            account: account.to_string(),
            post,
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(cache_key(account), entry);
    }
}
