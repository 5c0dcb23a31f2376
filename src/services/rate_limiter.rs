//! Sliding-window admission gate for the football-data API.
//!
//! `acquire` never rejects a caller, it only delays it until fewer than
//! `max_calls` admissions fall inside the trailing window.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Extra wait added on top of the computed remaining window time
const ADMISSION_SLACK: Duration = Duration::from_millis(100);

pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            admitted: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until a call is admissible, then record it.
    pub async fn acquire(&self) {
        loop {
            let wait = match self.try_admit(Instant::now()) {
                None => return,
                Some(wait) => wait,
            };

            tracing::debug!(
                "Rate limit of {} calls per {:?} reached, waiting {:?}",
                self.max_calls,
                self.window,
                wait
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Admit at `now` and return `None`, or return how long to wait before trying again.
    /// The lock is released before the caller suspends.
    fn try_admit(&self, now: Instant) -> Option<Duration> {
        let mut admitted = self.admitted.lock();

        while let Some(&oldest) = admitted.front() {
            if now.duration_since(oldest) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }

        if admitted.len() < self.max_calls {
            admitted.push_back(now);
            return None;
        }

        let oldest = admitted.front().copied().unwrap_or(now);
        let elapsed = now.duration_since(oldest);
        Some(self.window.saturating_sub(elapsed) + ADMISSION_SLACK)
    }

    /// Number of admissions inside the current window.
    pub fn in_flight_window(&self) -> usize {
        let now = Instant::now();
        self.admitted
            .lock()
            .iter()
            .filter(|&&t| now.duration_since(t) < self.window)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Every run of `max_calls + 1` consecutive admissions must span at least one window.
    fn assert_window_ceiling(times: &[Instant], max_calls: usize, window: Duration) {
        for pair in times.windows(max_calls + 1) {
            let span = pair[max_calls].duration_since(pair[0]);
            assert!(
                span >= window,
                "{} calls admitted within {:?} (window {:?})",
                max_calls + 1,
                span,
                window
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_calls_admitted_immediately_then_delayed() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let start = Instant::now();
        let mut admitted_at = Vec::new();

        for _ in 0..12 {
            limiter.acquire().await;
            admitted_at.push(Instant::now());
        }

        for t in &admitted_at[..10] {
            assert!(t.duration_since(start) < Duration::from_secs(1));
        }
        for t in &admitted_at[10..] {
            assert!(t.duration_since(start) >= Duration::from_secs(60));
        }
        assert_window_ceiling(&admitted_at, 10, Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_holds_across_concurrent_callers() {
        let limiter = Arc::new(RateLimiter::new(3, Duration::from_secs(10)));
        let times = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let limiter = limiter.clone();
            let times = times.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                times.lock().push(Instant::now());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut times = times.lock().clone();
        times.sort();
        assert_eq!(times.len(), 10);
        assert_window_ceiling(&times, 3, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_free_up_as_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(5));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        limiter.acquire().await;
        assert_eq!(limiter.in_flight_window(), 2);

        // The first call leaves the window at t=5, so the third waits ~2s, not 5s
        let before = Instant::now();
        limiter.acquire().await;
        let waited = Instant::now().duration_since(before);
        assert!(waited >= Duration::from_secs(2));
        assert!(waited < Duration::from_secs(3));
    }

    #[test]
    fn test_zero_max_calls_is_clamped() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.max_calls(), 1);
    }
}
