//! Timer module - the clock primitive the state machine schedules against
//!
//! The engine never sleeps. It asks a [`Scheduler`] for repeating timers and later
//! receives their fires as [`TimerHandle`]s. Every handle is unique, so a fire from a
//! timer that has since been replaced can be recognised and dropped.
//!
//! [`ManualScheduler`] is a deterministic virtual clock used by tests and headless
//! play. A tokio-backed scheduler lives in the runtime crate.

use std::time::Duration;

use crate::types::TimerKind;

/// Identifies one armed repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub kind: TimerKind,
    pub id: u64,
}

/// Schedule-repeating / cancel clock primitive.
pub trait Scheduler {
    /// Arm a timer that fires every `every`, first fire one interval from now.
    fn schedule_repeating(&mut self, kind: TimerKind, every: Duration) -> TimerHandle;

    /// Disarm a timer. Cancelling an unknown or already-cancelled handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// The live handle for each timer kind (at most one each).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSlots {
    gravity: Option<(TimerHandle, Duration)>,
    repeat: Option<(TimerHandle, Duration)>,
}

impl TimerSlots {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<(TimerHandle, Duration)> {
        match kind {
            TimerKind::Gravity => &mut self.gravity,
            TimerKind::HorizontalRepeat => &mut self.repeat,
        }
    }

    /// Replace the timer of `kind`: cancel the old one, then schedule the new one.
    pub fn arm<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        kind: TimerKind,
        every: Duration,
    ) -> TimerHandle {
        self.disarm(scheduler, kind);
        let handle = scheduler.schedule_repeating(kind, every);
        tracing::trace!(?kind, id = handle.id, ?every, "timer armed");
        *self.slot(kind) = Some((handle, every));
        handle
    }

    /// Cancel the timer of `kind` if one is live.
    pub fn disarm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, kind: TimerKind) {
        if let Some((handle, _)) = self.slot(kind).take() {
            tracing::trace!(?kind, id = handle.id, "timer cancelled");
            scheduler.cancel(handle);
        }
    }

    pub fn disarm_all<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.disarm(scheduler, TimerKind::Gravity);
        self.disarm(scheduler, TimerKind::HorizontalRepeat);
    }

    /// Whether `handle` is the current live timer of its kind.
    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.get(handle.kind).map(|(h, _)| h) == Some(handle)
    }

    pub fn get(&self, kind: TimerKind) -> Option<(TimerHandle, Duration)> {
        match kind {
            TimerKind::Gravity => self.gravity,
            TimerKind::HorizontalRepeat => self.repeat,
        }
    }

    /// Interval of the live timer of `kind`.
    pub fn interval(&self, kind: TimerKind) -> Option<Duration> {
        self.get(kind).map(|(_, every)| every)
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    handle: TimerHandle,
    every: Duration,
    due: Duration,
}

/// Deterministic virtual clock
///
/// Time only moves when the owner calls [`pop_due`](Self::pop_due) /
/// [`settle`](Self::settle). Fires are produced one at a time in chronological
/// order (ties broken by arm order) so the consumer can re-arm timers between fires.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    armed: Vec<Armed>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    pub fn live_count(&self) -> usize {
        self.armed.len()
    }

    /// Number of armed timers of one kind.
    pub fn live_count_of(&self, kind: TimerKind) -> usize {
        self.armed.iter().filter(|a| a.handle.kind == kind).count()
    }

    /// Pop the earliest fire due at or before `until`, advancing the clock to it.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let next = self
            .armed
            .iter_mut()
            .filter(|a| a.due <= until)
            .min_by_key(|a| (a.due, a.handle.id))?;

        self.now = next.due;
        next.due += next.every;
        Some(next.handle)
    }

    /// Move the clock to `until` once no fires remain before it.
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, kind: TimerKind, every: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            kind,
            id: self.next_id,
        };
        // A zero interval would fire forever at one instant.
        let every = every.max(Duration::from_millis(1));
        self.armed.push(Armed {
            handle,
            every,
            due: self.now + every,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.armed.retain(|a| a.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn test_manual_fires_in_order() {
        let mut sched = ManualScheduler::new();
        let slow = sched.schedule_repeating(TimerKind::Gravity, MS(100));
        let fast = sched.schedule_repeating(TimerKind::HorizontalRepeat, MS(40));

        let mut fires = Vec::new();
        while let Some(h) = sched.pop_due(MS(200)) {
            fires.push((h, sched.now()));
        }

        assert_eq!(
            fires,
            vec![
                (fast, MS(40)),
                (fast, MS(80)),
                (slow, MS(100)),
                (fast, MS(120)),
                (fast, MS(160)),
                (slow, MS(200)),
                (fast, MS(200)),
            ]
        );
    }

    #[test]
    fn test_cancel_stops_fires() {
        let mut sched = ManualScheduler::new();
        let h = sched.schedule_repeating(TimerKind::Gravity, MS(10));
        sched.cancel(h);
        assert_eq!(sched.pop_due(MS(1000)), None);
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_slots_replace_never_stack() {
        let mut sched = ManualScheduler::new();
        let mut slots = TimerSlots::default();

        let first = slots.arm(&mut sched, TimerKind::Gravity, MS(800));
        let second = slots.arm(&mut sched, TimerKind::Gravity, MS(80));

        assert_ne!(first, second);
        assert!(!slots.is_live(first));
        assert!(slots.is_live(second));
        assert_eq!(sched.live_count_of(TimerKind::Gravity), 1);
        assert_eq!(slots.interval(TimerKind::Gravity), Some(MS(80)));

        slots.disarm_all(&mut sched);
        assert_eq!(sched.live_count(), 0);
        assert!(!slots.is_live(second));
    }

    #[test]
    fn test_settle_moves_clock_forward_only() {
        let mut sched = ManualScheduler::new();
        sched.settle(MS(50));
        sched.settle(MS(20));
        assert_eq!(sched.now(), MS(50));
    }
}
