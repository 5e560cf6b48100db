//! Per-source request throttling.
//!
//! One limiter per source; throttling is never shared across sources. This
//! is a single-slot limiter that serializes callers through one timer, not a
//! token bucket with burst capacity.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct LimiterState {
    min_interval: Duration,
    last_call: Option<Instant>,
}

pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Panics if `requests_per_second` is not positive — a limiter that can
    /// never fire is a configuration defect.
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            state: Mutex::new(LimiterState {
                min_interval: interval(requests_per_second),
                last_call: None,
            }),
        }
    }

    /// Change the rate at runtime. Applies from the next throttled call.
    pub async fn set_rate(&self, requests_per_second: f64) {
        self.state.lock().await.min_interval = interval(requests_per_second);
    }

    /// Wait out the minimum inter-call spacing, then run `op` and return its
    /// result. Concurrent callers queue on the slot in arrival order.
    pub async fn throttle<T, F, Fut>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut state = self.state.lock().await;
        if let Some(last) = state.last_call {
            let elapsed = last.elapsed();
            if elapsed < state.min_interval {
                tokio::time::sleep(state.min_interval - elapsed).await;
            }
        }
        state.last_call = Some(Instant::now());
        // The slot stays held while op runs, serializing calls per source.
        op().await
    }
}

fn interval(requests_per_second: f64) -> Duration {
    assert!(
        requests_per_second > 0.0,
        "requests_per_second must be positive, got {requests_per_second}"
    );
    Duration::from_secs_f64(1.0 / requests_per_second)
}
