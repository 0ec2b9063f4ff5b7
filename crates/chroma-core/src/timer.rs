//! Tick-indexed timer queue with explicit cancel handles.
//!
//! Replaces coroutine-style delayed waits with an explicit scheduled-task
//! abstraction: every deferred action is an entry with a due tick, a
//! payload, and a [`TimerHandle`] the owner can use to cancel it (e.g.
//! on companion teardown, so no scheduled work dangles after the
//! companion is gone). Firing order is by due tick, FIFO among equal
//! deadlines.

use std::collections::BTreeMap;

/// Errors that can occur during timer operations.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// The handle counter would overflow.
    #[error("timer handle counter overflow")]
    HandleOverflow,
}

/// Cancel handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// A queue of deferred payloads keyed by due tick.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    /// Next handle value; also the FIFO sequence among equal deadlines.
    next_seq: u64,
    /// (due tick, sequence) to payload.
    entries: BTreeMap<(u64, u64), T>,
    /// Handle to its key in `entries`, for O(log n) cancellation.
    by_handle: BTreeMap<u64, (u64, u64)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            next_seq: 0,
            entries: BTreeMap::new(),
            by_handle: BTreeMap::new(),
        }
    }

    /// Schedule a payload to fire at `due_tick`.
    ///
    /// A `due_tick` at or before the current tick fires on the next
    /// [`fire_due`](Self::fire_due) call.
    pub fn schedule(&mut self, due_tick: u64, payload: T) -> Result<TimerHandle, TimerError> {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.checked_add(1).ok_or(TimerError::HandleOverflow)?;
        self.entries.insert((due_tick, seq), payload);
        self.by_handle.insert(seq, (due_tick, seq));
        Ok(TimerHandle(seq))
    }

    /// Cancel a scheduled task. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.by_handle.remove(&handle.0) {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel every pending task whose payload matches the predicate.
    ///
    /// Returns the number of tasks cancelled. Used on companion
    /// teardown to drop scheduled work referencing a removed companion.
    pub fn cancel_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let doomed: Vec<(u64, u64)> = self
            .entries
            .iter()
            .filter(|(_, payload)| pred(payload))
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.entries.remove(key);
            self.by_handle.remove(&key.1);
        }
        doomed.len()
    }

    /// Remove and return every payload due at or before `now`, in
    /// firing order.
    pub fn fire_due(&mut self, now: u64) -> Vec<T> {
        let mut due_keys: Vec<(u64, u64)> = Vec::new();
        for (key, _) in self.entries.range(..=(now, u64::MAX)) {
            due_keys.push(*key);
        }
        let mut fired = Vec::with_capacity(due_keys.len());
        for key in due_keys {
            if let Some(payload) = self.entries.remove(&key) {
                self.by_handle.remove(&key.1);
                fired.push(payload);
            }
        }
        fired
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_or_before_now() {
        let mut q = TimerQueue::new();
        let _ = q.schedule(5, "a");
        let _ = q.schedule(10, "b");
        assert!(q.fire_due(4).is_empty());
        assert_eq!(q.fire_due(5), vec!["a"]);
        assert_eq!(q.fire_due(20), vec!["b"]);
        assert!(q.is_empty());
    }

    #[test]
    fn fifo_among_equal_deadlines() {
        let mut q = TimerQueue::new();
        let _ = q.schedule(5, "first");
        let _ = q.schedule(5, "second");
        let _ = q.schedule(5, "third");
        assert_eq!(q.fire_due(5), vec!["first", "second", "third"]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut q = TimerQueue::new();
        let a = q.schedule(5, "a").ok();
        let _ = q.schedule(5, "b");
        assert!(a.is_some_and(|h| q.cancel(h)));
        assert_eq!(q.fire_due(5), vec!["b"]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let a = q.schedule(5, "a").ok();
        if let Some(handle) = a {
            assert!(q.cancel(handle));
            assert!(!q.cancel(handle));
        }
    }

    #[test]
    fn cancel_where_drops_matching_payloads() {
        let mut q = TimerQueue::new();
        let _ = q.schedule(5, 1_u32);
        let _ = q.schedule(6, 2_u32);
        let _ = q.schedule(7, 1_u32);
        assert_eq!(q.cancel_where(|p| *p == 1), 2);
        assert_eq!(q.len(), 1);
        assert_eq!(q.fire_due(10), vec![2]);
    }

    #[test]
    fn missed_deadlines_still_fire_late() {
        // A one-shot deferred action always fires after its delay even
        // if the queue is drained later than scheduled.
        let mut q = TimerQueue::new();
        let _ = q.schedule(5, "late");
        assert_eq!(q.fire_due(100), vec!["late"]);
    }
}
