//! Fixed-rate tickers for the single-threaded repaint loop
//!
//! The UI loop calls [`Ticker::poll`] on every repaint; a ticker fires at most
//! once per interval. Sampling (1 Hz), model animation (20 Hz) and the code
//! stream each own one.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when the interval has elapsed since the last firing.
    /// The first poll always fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            Some(last) => {
                // Stay on the schedule grid unless we fell more than a whole
                // interval behind.
                let next = last + self.interval;
                self.last = Some(if now.saturating_duration_since(next) >= self.interval {
                    now
                } else {
                    next
                });
                true
            }
            None => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left before the ticker fires again
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_fires() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let now = Instant::now();
        assert!(ticker.poll(now));
        assert!(!ticker.poll(now));
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        let start = Instant::now();
        assert!(ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(49)));
        assert!(ticker.poll(start + Duration::from_millis(50)));
        assert!(!ticker.poll(start + Duration::from_millis(60)));
        assert!(ticker.poll(start + Duration::from_millis(101)));
    }

    #[test]
    fn test_resyncs_after_stall() {
        let mut ticker = Ticker::new(Duration::from_millis(50));
        let start = Instant::now();
        ticker.poll(start);
        let late = start + Duration::from_secs(5);
        assert!(ticker.poll(late));
        // no burst of catch-up ticks
        assert!(!ticker.poll(late + Duration::from_millis(10)));
    }

    #[test]
    fn test_time_until_next() {
        let mut ticker = Ticker::new(Duration::from_millis(1000));
        let start = Instant::now();
        assert_eq!(ticker.time_until_next(start), Duration::ZERO);
        ticker.poll(start);
        assert_eq!(
            ticker.time_until_next(start + Duration::from_millis(400)),
            Duration::from_millis(600)
        );
        assert_eq!(
            ticker.time_until_next(start + Duration::from_millis(4000)),
            Duration::ZERO
        );
    }
}
