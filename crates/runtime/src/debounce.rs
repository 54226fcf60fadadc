//! Single-slot debounce window.
//!
//! Key properties:
//! - At most one payload is pending at any instant.
//! - `schedule` replaces the pending payload and restarts the quiet interval
//!   (last-write-wins, never queued).
//! - `poll` fires at most once per burst and clears the slot.
//! - After `close`, nothing is ever scheduled or fired again.
//!
//! Time is supplied by the caller so a burst can be replayed exactly.

use std::time::Duration;

use foundation::time::Time;

/// Quiet interval matching the burst rate of drag gestures.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PendingToken(pub u64);

#[derive(Debug)]
struct Pending<T> {
    token: PendingToken,
    due: Time,
    payload: T,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    next_token: u64,
    pending: Option<Pending<T>>,
    replaced: u64,
    closed: bool,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            next_token: 0,
            pending: None,
            replaced: 0,
            closed: false,
        }
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Arms the slot with `payload`, due `quiet` after `now`.
    ///
    /// Any payload already pending is dropped. Returns `None` once closed.
    pub fn schedule(&mut self, now: Time, payload: T) -> Option<PendingToken> {
        if self.closed {
            return None;
        }
        let token = PendingToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        if self.pending.is_some() {
            self.replaced += 1;
        }
        self.pending = Some(Pending {
            token,
            due: now.saturating_add(self.quiet),
            payload,
        });
        Some(token)
    }

    /// Returns the settled payload if the quiet interval has elapsed.
    pub fn poll(&mut self, now: Time) -> Option<T> {
        if self.closed {
            return None;
        }
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.payload),
            _ => None,
        }
    }

    /// Clears the slot without firing.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Cancels the pending slot and rejects all later scheduling.
    pub fn close(&mut self) -> Option<T> {
        self.closed = true;
        self.cancel()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<PendingToken> {
        self.pending.as_ref().map(|p| p.token)
    }

    pub fn due_at(&self) -> Option<Time> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Number of payloads discarded because a newer one replaced them.
    pub fn replaced_count(&self) -> u64 {
        self.replaced
    }
}

#[cfg(test)]
mod tests {
    use super::{Debouncer, PendingToken};
    use foundation::time::Time;
    use std::time::Duration;

    fn debouncer() -> Debouncer<&'static str> {
        Debouncer::new(Duration::from_millis(100))
    }

    #[test]
    fn fires_once_after_quiet_interval() {
        let mut d = debouncer();
        d.schedule(Time(0), "a");
        assert_eq!(d.poll(Time(99)), None);
        assert_eq!(d.poll(Time(100)), Some("a"));
        assert_eq!(d.poll(Time(500)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn burst_keeps_only_last_payload() {
        let mut d = debouncer();
        for (t, v) in [(0, "a"), (20, "b"), (40, "c"), (60, "d")] {
            d.schedule(Time(t), v);
            assert_eq!(d.poll(Time(t)), None);
        }
        assert_eq!(d.due_at(), Some(Time(160)));
        assert_eq!(d.poll(Time(159)), None);
        assert_eq!(d.poll(Time(160)), Some("d"));
        assert_eq!(d.replaced_count(), 3);
    }

    #[test]
    fn reschedule_issues_fresh_token() {
        let mut d = debouncer();
        let a = d.schedule(Time(0), "a").unwrap();
        let b = d.schedule(Time(10), "b").unwrap();
        assert_ne!(a, b);
        assert_eq!(d.pending_token(), Some(PendingToken(1)));
    }

    #[test]
    fn cancel_clears_without_firing() {
        let mut d = debouncer();
        d.schedule(Time(0), "a");
        assert_eq!(d.cancel(), Some("a"));
        assert_eq!(d.poll(Time(1_000)), None);
        // Still usable afterwards.
        d.schedule(Time(1_000), "b");
        assert_eq!(d.poll(Time(1_100)), Some("b"));
    }

    #[test]
    fn close_is_terminal() {
        let mut d = debouncer();
        d.schedule(Time(0), "a");
        assert_eq!(d.close(), Some("a"));
        assert!(d.is_closed());
        assert_eq!(d.poll(Time(1_000)), None);
        assert_eq!(d.schedule(Time(1_000), "b"), None);
        assert!(!d.is_pending());
    }
}
