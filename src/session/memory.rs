use super::store::SessionStore;
use ahash::AHashMap;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How often a write also drops every expired entry.
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Default)]
struct Entries {
    map: AHashMap<String, Entry>,
    next_sweep: Option<Instant>,
}

impl Entries {
    fn sweep_if_due(&mut self, now: Instant) {
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        self.map.retain(|_, entry| entry.is_live(now));
        self.next_sweep = Some(now + SWEEP_INTERVAL);
    }
}

/// An in-process session store.
///
/// An expired entry is invisible at once and dropped when its key is next
/// read, or by the sweep a write runs at most every 30 seconds.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<Entries>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .map
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    /// Number of stored entries, including expired ones not yet dropped.
    pub async fn stored_len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.map.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.map.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.map.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Option<()> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);
        let mut entries = self.entries.write().await;
        entries.sweep_if_due(now);
        entries
            .map
            .insert(key.to_string(), Entry { value, expires_at });
        Some(())
    }

    async fn del(&self, key: &str) -> Option<u64> {
        let now = Instant::now();
        let removed = self.entries.write().await.map.remove(key);
        Some(match removed {
            Some(entry) if entry.is_live(now) => 1,
            _ => 0,
        })
    }
}
