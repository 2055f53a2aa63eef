//! Rate limiting for repeated warnings, e.g. a heartbeat failing every second
//! while the registry is down.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lets through at most one log line per window and counts the ones it held back.
#[derive(Debug)]
pub struct ThrottledLog {
    start: Instant,
    /// Milliseconds since `start` at which the next line may be emitted.
    next_log_ms: AtomicU64,
    window_ms: u64,
    suppressed: AtomicU64,
}

fn u64_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl ThrottledLog {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            start: Instant::now(),
            next_log_ms: AtomicU64::new(0),
            window_ms: u64_millis(window),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Returns `Some(n)` if the caller may log now, `n` being the number of
    /// lines dropped since the last permitted one. Returns `None` otherwise.
    ///
    /// Under concurrent calls only one caller per window gets `Some`.
    pub fn permit(&self) -> Option<u64> {
        let now_ms = u64_millis(self.start.elapsed());
        let next = self.next_log_ms.load(Ordering::Relaxed);

        if now_ms >= next
            && self
                .next_log_ms
                .compare_exchange(
                    next,
                    now_ms.saturating_add(self.window_ms),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                )
                .is_ok()
        {
            return Some(self.suppressed.swap(0, Ordering::Relaxed));
        }

        self.suppressed.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Forget the current window, e.g. after the failing condition recovered.
    pub fn reset(&self) {
        self.next_log_ms.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
    }
}
