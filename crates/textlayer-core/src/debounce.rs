//! Single-deadline debouncing driven by caller-supplied timestamps.

use std::ops::Add;
use std::time::{Duration, Instant};

/// A monotonic timestamp the debouncer can schedule against.
///
/// Implemented for [`Instant`] and for [`Duration`] (an offset from any
/// fixed origin, e.g. `performance.now()` on the web where `Instant` is
/// unavailable).
pub trait Timestamp: Copy + Ord + Add<Duration, Output = Self> {}

impl<T: Copy + Ord + Add<Duration, Output = T>> Timestamp for T {}

/// Holds at most one pending deadline. Scheduling again replaces it.
#[derive(Debug, Clone)]
pub struct Debouncer<T = Instant> {
    delay: Duration,
    deadline: Option<T>,
}

impl<T: Timestamp> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the deadline at `now + delay`.
    pub fn schedule(&mut self, now: T) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<T> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` has reached the deadline.
    pub fn fire(&mut self, now: T) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
