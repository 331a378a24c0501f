//! Deferred continuations tagged with a round generation.
//!
//! Sessions never own timers. They hand a [`ScheduledEvent`] to an external
//! [`Scheduler`] and expect it back through `fire` once the delay elapses.
//! Each event carries the [`Generation`] that was current when it was
//! scheduled; a session discards events from any other generation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of one dealt layout. Bumped on every regeneration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Work a session asks to run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Deal the next round after a completed one
    AdvanceRound,
    /// Compare the two revealed cards
    ResolvePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub generation: Generation,
    pub action: DeferredAction,
}

impl ScheduledEvent {
    pub fn new(generation: Generation, action: DeferredAction) -> Self {
        Self { generation, action }
    }
}

/// Event loop that delivers a [`ScheduledEvent`] back to its session after
/// `delay`. Validity checks are the session's job, not the scheduler's.
pub trait Scheduler {
    fn after(&mut self, delay: Duration, event: ScheduledEvent);
}

#[derive(Debug, Clone)]
struct PendingEvent {
    due: Duration,
    sequence: u64,
    event: ScheduledEvent,
}

/// Deterministic single-threaded scheduler driven by a virtual clock.
///
/// Events become due when the clock is advanced past their deadline and are
/// released in deadline order, ties broken by scheduling order.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    now: Duration,
    sequence: u64,
    pending: Vec<PendingEvent>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|entry| entry.due).min()
    }

    /// Moves the clock forward by `by` and returns every event now due.
    pub fn advance(&mut self, by: Duration) -> Vec<ScheduledEvent> {
        self.now += by;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.pending = waiting;
        due.sort_by_key(|entry| (entry.due, entry.sequence));
        due.into_iter().map(|entry| entry.event).collect()
    }

    /// Jumps the clock to the earliest deadline and releases that one event.
    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(position, _)| position)?;
        let entry = self.pending.remove(position);
        self.now = self.now.max(entry.due);
        Some(entry.event)
    }
}

impl Scheduler for DeferredQueue {
    fn after(&mut self, delay: Duration, event: ScheduledEvent) {
        self.sequence += 1;
        self.pending.push(PendingEvent {
            due: self.now + delay,
            sequence: self.sequence,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(generation: u64, action: DeferredAction) -> ScheduledEvent {
        ScheduledEvent::new(Generation(generation), action)
    }

    #[test]
    fn releases_only_due_events_in_deadline_order() {
        let mut queue = DeferredQueue::new();
        queue.after(Duration::from_millis(1000), event(1, DeferredAction::AdvanceRound));
        queue.after(Duration::from_millis(500), event(2, DeferredAction::ResolvePair));
        queue.after(Duration::from_millis(500), event(3, DeferredAction::ResolvePair));

        assert!(queue.advance(Duration::from_millis(499)).is_empty());
        let due = queue.advance(Duration::from_millis(1));
        assert_eq!(
            due,
            vec![
                event(2, DeferredAction::ResolvePair),
                event(3, DeferredAction::ResolvePair)
            ]
        );
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.next_due(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn pop_next_jumps_clock() {
        let mut queue = DeferredQueue::new();
        queue.after(Duration::from_millis(300), event(0, DeferredAction::AdvanceRound));
        assert_eq!(
            queue.pop_next(),
            Some(event(0, DeferredAction::AdvanceRound))
        );
        assert_eq!(queue.now(), Duration::from_millis(300));
        assert!(queue.pop_next().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn generations_increase() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
    }
}
