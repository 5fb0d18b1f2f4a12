//! In-process counter store
//!
//! Expiry uses the tokio clock so paused-time tests can step through windows.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use super::{CounterStore, CounterStoreError};

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: u64,
    expires_at: Instant,
}

/// Counter store backed by a concurrent hash map
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    entries: DashMap<String, Entry>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired key; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value)),
            Some(_) => None,
            None => return Ok(None),
        };
        // expired: remove outside of the read guard
        self.entries
            .remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(value)
    }

    async fn set(&self, key: &str, value: u64, ttl: Duration) -> Result<(), CounterStoreError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CounterStoreError> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_get_set_and_expiry() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", 3, Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(3));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restarts_ttl() {
        let store = MemoryCounterStore::new();
        store.set("k", 1, Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        store.set("k", 2, Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(store.get("k").await.unwrap(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_counts_down() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.ttl("k").await.unwrap(), None);

        store.set("k", 1, Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(store.ttl("k").await.unwrap(), Some(Duration::from_secs(15)));

        tokio::time::advance(Duration::from_secs(15)).await;
        assert_eq!(store.ttl("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = MemoryCounterStore::new();
        store.set("short", 1, Duration::from_secs(1)).await.unwrap();
        store.set("long", 1, Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long").await.unwrap(), Some(1));
    }
}
