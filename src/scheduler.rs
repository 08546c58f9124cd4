//! The delayed-callback port and the timer queue hosts drive it with.
//!
//! A [`Scheduler`] hands out single-use [`ScheduleHandle`]s. When a handle's
//! delay elapses the host passes it back through
//! [`MessageLog::on_timer`](crate::MessageLog::on_timer), which routes it to
//! whichever message scheduled it.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::time::Instant;

/// Longest delay a deadline is computed from. Longer delays are capped here
/// so the deadline never overflows `Instant`.
pub const MAX_DELAY: Duration = Duration::from_secs(86400 * 365 * 30);

/// Identifies one scheduled step. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(u64);

/// Single-threaded, single-shot delayed callbacks with cancel-by-handle.
///
/// A cancelled handle must never fire, and a fired handle must never need
/// cancelling.
pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration) -> ScheduleHandle;
    fn cancel(&mut self, handle: ScheduleHandle);
}

/// Pending handles ordered by deadline, then by scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    queue: BTreeSet<(Instant, ScheduleHandle)>,
    deadlines: HashMap<ScheduleHandle, Instant>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.first().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest handle whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<ScheduleHandle> {
        match self.queue.first() {
            Some((deadline, _)) if *deadline <= now => self.pop_next(),
            _ => None,
        }
    }

    /// Remove and return the earliest handle regardless of its deadline.
    pub fn pop_next(&mut self) -> Option<ScheduleHandle> {
        let (_, handle) = self.queue.pop_first()?;
        self.deadlines.remove(&handle);
        Some(handle)
    }

    pub fn contains(&self, handle: ScheduleHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_id);
        self.next_id += 1;
        let deadline = Instant::now() + delay.min(MAX_DELAY);
        self.queue.insert((deadline, handle));
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if let Some(deadline) = self.deadlines.remove(&handle) {
            self.queue.remove(&(deadline, handle));
        }
    }
}
