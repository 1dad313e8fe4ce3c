//! Sliding-window rate limiter shared by every call to a generation backend.
//!
//! Each `LlmClient` owns one limiter. Limiters are `Send + Sync` and may be
//! shared across request-handling tasks; check-and-record happens under a
//! single lock so two callers can never both claim the last free slot.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Granularity of the wait loop in `record_and_wait`.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// A limiter with `max_requests == 0` never admits a request.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns true if a request could be made right now without waiting.
    pub async fn can_proceed(&self) -> bool {
        let mut requests = self.requests.lock().await;
        purge_expired(&mut requests, Instant::now(), self.window);
        requests.len() < self.max_requests
    }

    /// Blocks the calling task until a slot is free, then claims it.
    pub async fn record_and_wait(&self) {
        loop {
            {
                let mut requests = self.requests.lock().await;
                let now = Instant::now();
                purge_expired(&mut requests, now, self.window);
                if requests.len() < self.max_requests {
                    requests.push_back(now);
                    return;
                }
                debug!(
                    "Rate limit reached ({}/{} in {}s), waiting",
                    requests.len(),
                    self.max_requests,
                    self.window.as_secs()
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Drops timestamps that have aged out of the window. Timestamps are pushed in
/// order, so expired entries are always at the front.
fn purge_expired(requests: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = requests.front() {
        if now.duration_since(*oldest) >= window {
            requests.pop_front();
        } else {
            break;
        }
    }
}
