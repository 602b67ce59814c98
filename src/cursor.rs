// Fixed-cadence cursor feed.
// Visual expectation: the head follows the pointer in 50 ms steps (default),
// not every frame. Only the newest sample matters; nothing queues up.

use crate::types::CursorSample;
use std::time::{Duration, Instant};

pub struct CursorFeed {
    interval: Duration,
    next_due: Option<Instant>,    // None until the first poll
    pending: Option<CursorSample>, // at-most-latest slot
}

impl CursorFeed {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_due: None, pending: None }
    }

    /// Poll the pointer if the interval has elapsed. `read` returns `None`
    /// when the platform can't report a position right now.
    pub fn tick(&mut self, now: Instant, read: impl FnOnce() -> Option<CursorSample>) {
        if let Some(due) = self.next_due {
            if now < due {
                return;
            }
        }
        self.next_due = Some(now + self.interval);
        if let Some(sample) = read() {
            self.push(sample);
        }
    }

    /// Deliver a sample. Overwrites one that was never consumed.
    pub fn push(&mut self, sample: CursorSample) {
        self.pending = Some(sample);
    }

    /// Hand the newest sample to the consumer.
    pub fn take(&mut self) -> Option<CursorSample> {
        self.pending.take()
    }
}
