// src/cache.rs
//
// Short-lived in-memory response cache for the headlines route, keyed by
// path+query. A collaborator of the pipeline, not part of it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use metrics::counter;

struct Entry {
    bytes: Vec<u8>,
    inserted: Instant,
}

pub struct ResponseCache {
    ttl: Duration,
    inner: Mutex<HashMap<u64, Entry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(route: &str) -> u64 {
        let mut h = DefaultHasher::new();
        route.hash(&mut h);
        h.finish()
    }

    /// Cached body for `route`, if present and fresh.
    pub fn get(&self, route: &str) -> Option<Vec<u8>> {
        let key = Self::key(route);
        let mut map = self.inner.lock().expect("cache mutex poisoned");
        match map.get(&key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => {
                counter!("cache_hits_total").increment(1);
                Some(entry.bytes.clone())
            }
            Some(_) => {
                map.remove(&key);
                counter!("cache_misses_total").increment(1);
                None
            }
            None => {
                counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    /// Store a fresh body for `route`; expired entries are pruned here so
    /// the map stays bounded by live routes.
    pub fn put(&self, route: &str, bytes: Vec<u8>) {
        let key = Self::key(route);
        let mut map = self.inner.lock().expect("cache mutex poisoned");
        map.retain(|_, entry| entry.inserted.elapsed() < self.ttl);
        map.insert(
            key,
            Entry {
                bytes,
                inserted: Instant::now(),
            },
        );
    }
}
