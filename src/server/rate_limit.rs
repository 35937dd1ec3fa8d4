//! Per-client sliding-window rate limiting.

use crate::config::RateLimitConfig;
use crate::models::ErrorBody;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

/// Request timestamps inside the current window for one client.
#[derive(Debug, Default)]
struct RequestWindow {
    hits: VecDeque<Instant>,
}

impl RequestWindow {
    fn expire(&mut self, now: Instant, config: &RateLimitConfig) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) >= config.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

pub struct RateLimiter {
    windows: DashMap<IpAddr, RequestWindow>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            config,
        }
    }

    /// Records a request from `client` and reports whether it is allowed.
    /// Rejected requests are not counted.
    pub fn try_acquire(&self, client: IpAddr) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut window = self.windows.entry(client).or_default();
        window.expire(now, &self.config);
        if window.hits.len() >= self.config.max_requests {
            return false;
        }
        window.hits.push_back(now);
        true
    }

    /// Drops clients whose window has fully expired.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows.retain(|_, window| {
            window.expire(now, &self.config);
            !window.hits.is_empty()
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

/// Middleware keyed by the peer address. Requests without connection info
/// (e.g. in-process tests) share one bucket.
pub async fn limit_by_ip(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !limiter.try_acquire(client) {
        tracing::warn!("Rate limit exceeded for {}", client);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody::new(TOO_MANY_REQUESTS)),
        )
            .into_response();
    }

    next.run(request).await
}
