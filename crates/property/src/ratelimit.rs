use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Allows at most `burst` events per `interval`.
pub(crate) struct RateLimit {
    interval: Duration,
    burst: u32,
    window: Mutex<Window>,
}

struct Window {
    start: Option<Instant>,
    printed: u32,
    missed: u32,
}

impl RateLimit {
    pub(crate) const fn new(interval: Duration, burst: u32) -> Self {
        Self {
            interval,
            burst,
            window: Mutex::new(Window {
                start: None,
                printed: 0,
                missed: 0,
            }),
        }
    }

    /// Returns `Some(suppressed)` when the event may be emitted, where
    /// `suppressed` counts events dropped since the last emitted one in a
    /// previous window.
    pub(crate) fn check(&self) -> Option<u32> {
        self.check_at(Instant::now())
    }

    pub(crate) fn check_at(&self, now: Instant) -> Option<u32> {
        let mut window = self
            .window
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut suppressed = 0;
        let expired = match window.start {
            Some(start) => now.saturating_duration_since(start) >= self.interval,
            None => true,
        };
        if expired {
            suppressed = window.missed;
            window.start = Some(now);
            window.printed = 0;
            window.missed = 0;
        }

        if window.printed < self.burst {
            window.printed += 1;
            Some(suppressed)
        } else {
            window.missed += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_suppress() {
        let limit = RateLimit::new(Duration::from_secs(5), 3);
        let t0 = Instant::now();
        assert_eq!(limit.check_at(t0), Some(0));
        assert_eq!(limit.check_at(t0), Some(0));
        assert_eq!(limit.check_at(t0), Some(0));
        assert_eq!(limit.check_at(t0), None);
        assert_eq!(limit.check_at(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_new_window_reports_missed() {
        let limit = RateLimit::new(Duration::from_secs(5), 1);
        let t0 = Instant::now();
        assert_eq!(limit.check_at(t0), Some(0));
        assert_eq!(limit.check_at(t0), None);
        assert_eq!(limit.check_at(t0), None);
        assert_eq!(limit.check_at(t0 + Duration::from_secs(5)), Some(2));
        assert_eq!(limit.check_at(t0 + Duration::from_secs(6)), None);
    }
}
