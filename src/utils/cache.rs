use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Small TTL cache for writers whose lookups are expensive enough to matter
/// across rapid prompt redraws.
pub struct Cache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if Instant::now() > entry.expires_at {
            // The read guard must go before remove touches the same shard.
            drop(entry);
            self.data.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.data.insert(key, CacheEntry { value, expires_at });
    }
}
