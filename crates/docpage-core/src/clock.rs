#![forbid(unsafe_code)]

//! Host-driven time and the copy-button reset schedule.
//!
//! The controller never reads a wall clock. The host sets or advances a
//! monotonic [`DeterministicClock`]; resets whose deadline has been reached
//! are handed back by [`ResetSchedule::take_due`].

use core::time::Duration;

use serde::Serialize;

use crate::config::ResetPolicy;

/// Monotonic clock controlled by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current time. Moving backwards is allowed (replay hosts do it).
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance time by `dt`, saturating.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// One scheduled return of a copy button to its default face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingReset {
    /// 1-based snippet/button index.
    pub button: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub deadline: Duration,
    #[serde(skip)]
    seq: u64,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

/// Pending resets ordered by deadline, then by scheduling order.
#[derive(Debug, Clone, Default)]
pub struct ResetSchedule {
    policy: ResetPolicy,
    pending: Vec<PendingReset>,
    next_seq: u64,
}

impl ResetSchedule {
    #[must_use]
    pub fn new(policy: ResetPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> ResetPolicy {
        self.policy
    }

    /// Schedule a reset of `button` at `deadline`.
    ///
    /// Under [`ResetPolicy::Restart`] any reset already pending for the same
    /// button is dropped first.
    pub fn schedule(&mut self, button: usize, deadline: Duration) {
        if self.policy == ResetPolicy::Restart {
            self.pending.retain(|reset| reset.button != button);
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let at = self
            .pending
            .partition_point(|reset| (reset.deadline, reset.seq) <= (deadline, seq));
        self.pending.insert(
            at,
            PendingReset {
                button,
                deadline,
                seq,
            },
        );
    }

    /// Remove and return every reset with `deadline <= now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<PendingReset> {
        let due = self.pending.partition_point(|reset| reset.deadline <= now);
        self.pending.drain(..due).collect()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.first().map(|reset| reset.deadline)
    }

    #[must_use]
    pub fn pending_for(&self, button: usize) -> usize {
        self.pending
            .iter()
            .filter(|reset| reset.button == button)
            .count()
    }

    #[must_use]
    pub fn pending(&self) -> &[PendingReset] {
        &self.pending
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn buttons(resets: &[PendingReset]) -> Vec<usize> {
        resets.iter().map(|reset| reset.button).collect()
    }

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut clock = DeterministicClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(ms(10));
        clock.advance(ms(5));
        assert_eq!(clock.now(), ms(15));

        // Saturation: don't panic or wrap.
        clock.set(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn due_resets_come_out_in_deadline_order() {
        let mut schedule = ResetSchedule::new(ResetPolicy::Restart);
        schedule.schedule(2, ms(3000));
        schedule.schedule(1, ms(1500));
        schedule.schedule(3, ms(2000));
        assert_eq!(schedule.next_deadline(), Some(ms(1500)));

        assert!(schedule.take_due(ms(1499)).is_empty());
        assert_eq!(buttons(&schedule.take_due(ms(2000))), vec![1, 3]);
        assert_eq!(schedule.next_deadline(), Some(ms(3000)));
        assert_eq!(buttons(&schedule.take_due(ms(10_000))), vec![2]);
        assert!(schedule.is_empty());
        assert_eq!(schedule.next_deadline(), None);
    }

    #[test]
    fn restart_policy_keeps_only_the_latest_reset_per_button() {
        let mut schedule = ResetSchedule::new(ResetPolicy::Restart);
        schedule.schedule(4, ms(1500));
        schedule.schedule(4, ms(2500));
        assert_eq!(schedule.pending_for(4), 1);
        assert!(schedule.take_due(ms(1500)).is_empty());
        assert_eq!(buttons(&schedule.take_due(ms(2500))), vec![4]);
    }

    #[test]
    fn independent_policy_keeps_every_reset() {
        let mut schedule = ResetSchedule::new(ResetPolicy::Independent);
        schedule.schedule(4, ms(1500));
        schedule.schedule(4, ms(2500));
        assert_eq!(schedule.pending_for(4), 2);
        assert_eq!(buttons(&schedule.take_due(ms(1500))), vec![4]);
        assert_eq!(buttons(&schedule.take_due(ms(2500))), vec![4]);
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut schedule = ResetSchedule::new(ResetPolicy::Independent);
        schedule.schedule(5, ms(100));
        schedule.schedule(1, ms(100));
        schedule.schedule(3, ms(100));
        assert_eq!(buttons(&schedule.take_due(ms(100))), vec![5, 1, 3]);
    }

    #[test]
    fn pending_resets_serialize_deadlines_in_millis() {
        let mut schedule = ResetSchedule::new(ResetPolicy::Restart);
        schedule.schedule(2, ms(1750));
        let json = serde_json::to_string(schedule.pending()).expect("serialize");
        assert_eq!(json, r#"[{"button":2,"deadline":1750}]"#);
    }
}
