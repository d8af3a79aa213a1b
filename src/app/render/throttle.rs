use std::time::{Duration, Instant};

/// Lets at most one event through per `interval`.
#[derive(Clone, Debug)]
pub(in crate::app) struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub(in crate::app) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub(in crate::app) fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
