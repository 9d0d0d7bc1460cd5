// src/rate_limit.rs
//
// Fixed-window request limiter, one window per client key. A collaborator
// applied as router middleware; the pipeline never sees it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request};

struct Window {
    started: Instant,
    count: u32,
}

pub struct FixedWindowLimiter {
    max: u32,
    window: Duration,
    inner: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for `key`. Returns false once the window budget
    /// is exhausted; a new window starts when the old one ages out.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut map = self.inner.lock().expect("limiter mutex poisoned");
        let w = map.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(w.started) >= self.window {
            w.started = now;
            w.count = 0;
        }
        w.count += 1;
        w.count <= self.max
    }
}

/// Client identity: leftmost `x-forwarded-for` entry (trust-proxy
/// deployments), else the peer address, else a local fallback.
pub fn client_key(req: &Request) -> String {
    if let Some(xff) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = xff.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    "local".to_string()
}
