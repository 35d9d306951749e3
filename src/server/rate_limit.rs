use std::{
    collections::{HashMap, VecDeque},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{config::RateLimitSettings, service};

/// Idle clients are swept once this many are tracked.
const SWEEP_THRESHOLD: usize = 10_000;

/// Sliding-window limiter keyed by client address.
pub struct RateLimiter {
    settings: RateLimitSettings,
    hits: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self { settings, hits: Mutex::new(HashMap::new()) }
    }

    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    /// Records a hit at `now`, or returns how long the client has to wait.
    pub fn check_at(&self, client: IpAddr, now: Instant) -> Result<(), Duration> {
        let window = self.settings.window;
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        if hits.len() >= SWEEP_THRESHOLD {
            hits.retain(|_, queue| queue.back().is_some_and(|last| now.duration_since(*last) < window));
        }

        let queue = hits.entry(client).or_default();
        while queue.front().is_some_and(|first| now.duration_since(*first) >= window) {
            queue.pop_front();
        }

        if queue.len() >= self.settings.max_requests {
            let oldest = queue.front().copied().unwrap_or(now);
            return Err(window.saturating_sub(now.duration_since(oldest)));
        }

        queue.push_back(now);
        Ok(())
    }
}

pub async fn enforce(State(limiter): State<Arc<RateLimiter>>, request: Request, next: Next) -> Response {
    let client = client_address(&request);
    match limiter.check(client) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(%client, "Rate limit exceeded");
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                [(header::RETRY_AFTER, HeaderValue::from(seconds.max(1)))],
                service::Error::TooManyRequests,
            )
                .into_response()
        }
    }
}

fn client_address(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| {
            request
                .headers()
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .and_then(|first| first.trim().parse().ok())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize) -> RateLimiter {
        RateLimiter::new(RateLimitSettings { max_requests, window: Duration::from_secs(60) })
    }

    const ALICE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const BOB: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn rejects_once_window_is_full() {
        let limiter = limiter(3);
        let start = Instant::now();
        for i in 0..3 {
            assert!(limiter.check_at(ALICE, start + Duration::from_secs(i)).is_ok());
        }
        let retry = limiter.check_at(ALICE, start + Duration::from_secs(10)).unwrap_err();
        assert_eq!(retry, Duration::from_secs(50));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = limiter(1);
        let now = Instant::now();
        assert!(limiter.check_at(ALICE, now).is_ok());
        assert!(limiter.check_at(ALICE, now).is_err());
        assert!(limiter.check_at(BOB, now).is_ok());
    }

    #[test]
    fn window_slides() {
        let limiter = limiter(2);
        let start = Instant::now();
        assert!(limiter.check_at(ALICE, start).is_ok());
        assert!(limiter.check_at(ALICE, start + Duration::from_secs(30)).is_ok());
        assert!(limiter.check_at(ALICE, start + Duration::from_secs(59)).is_err());
        // The first hit has left the window, the second has not.
        assert!(limiter.check_at(ALICE, start + Duration::from_secs(60)).is_ok());
        assert!(limiter.check_at(ALICE, start + Duration::from_secs(61)).is_err());
    }

    #[test]
    fn rejected_requests_do_not_extend_the_window() {
        let limiter = limiter(1);
        let start = Instant::now();
        assert!(limiter.check_at(ALICE, start).is_ok());
        for i in 1..10 {
            assert!(limiter.check_at(ALICE, start + Duration::from_secs(i)).is_err());
        }
        assert!(limiter.check_at(ALICE, start + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn reads_forwarded_address_without_connect_info() {
        let request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_address(&request), "203.0.113.7".parse::<IpAddr>().unwrap());
    }
}
