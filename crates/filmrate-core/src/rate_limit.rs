//! Fixed-window request limiting keyed by client IP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Expired windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u64,
}

/// Per-client budget of `max` requests per `period`. Cloning shares the
/// counters.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max: u64,
    period: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(max: u64, period: Duration) -> Self {
        Self {
            max: max.max(1),
            period,
            windows: Arc::default(),
        }
    }

    /// Count a request from `key`; `false` once its window is spent.
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Instant::now())
    }

    fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        if windows.len() >= SWEEP_THRESHOLD && !windows.contains_key(key) {
            let period = self.period;
            windows.retain(|_, w| now.duration_since(w.started) < period);
        }
        let window = windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(window.started) >= self.period {
            *window = Window {
                started: now,
                hits: 0,
            };
        }
        if window.hits >= self.max {
            return false;
        }
        window.hits += 1;
        true
    }
}

/// Client address: the socket peer when the server records it, otherwise the
/// first `X-Forwarded-For` hop or `X-Real-IP`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(peer) = peer {
        return peer.ip().to_string();
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_owned()
}

/// Middleware: 429 once the caller's window is spent.
pub async fn rate_limit(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(req.headers(), peer);
    if !limiter.try_acquire(&key) {
        tracing::warn!(client = %key, "rate limit exceeded");
        return AppError::TooManyRequests.into_response();
    }
    next.run(req).await
}
