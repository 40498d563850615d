//! Cancellable one-shot timers driven by an injectable clock.
//!
//! The queue never calls back on its own: the host polls [`TimerQueue::take_due`]
//! (from its event loop or a real timer) and dispatches the returned handles.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    next_id: u64,
    pending: Vec<(TimerHandle, Duration)>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((handle, self.clock.now() + delay));
        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    /// Remove and return expired timers, earliest deadline first.
    pub fn take_due(&mut self) -> Vec<TimerHandle> {
        let now = self.clock.now();
        let mut due: Vec<(TimerHandle, Duration)> = Vec::new();
        self.pending.retain(|&(handle, deadline)| {
            if deadline <= now {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, deadline)| (deadline, handle));
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    /// Time until the earliest pending deadline.
    pub fn next_deadline_in(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.pending
            .iter()
            .map(|&(_, deadline)| deadline.saturating_sub(now))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());
        let handle = timers.schedule(Duration::from_millis(400));

        clock.advance(Duration::from_millis(399));
        assert!(timers.take_due().is_empty());
        assert_eq!(timers.next_deadline_in(), Some(Duration::from_millis(1)));

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.take_due(), vec![handle]);
        assert!(timers.take_due().is_empty());
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());
        let first = timers.schedule(Duration::from_millis(100));
        let second = timers.schedule(Duration::from_millis(50));

        assert!(timers.cancel(first));
        assert!(!timers.cancel(first));
        clock.advance(Duration::from_secs(1));
        assert_eq!(timers.take_due(), vec![second]);
    }

    #[test]
    fn test_due_in_deadline_order() {
        let clock = ManualClock::new();
        let mut timers = TimerQueue::new(clock.clone());
        let late = timers.schedule(Duration::from_millis(300));
        let early = timers.schedule(Duration::from_millis(100));
        clock.advance(Duration::from_millis(500));
        assert_eq!(timers.take_due(), vec![early, late]);
    }
}
