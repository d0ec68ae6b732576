//! Cancel-and-reschedule debouncer.
//!
//! A [`Debouncer`] owns a single pending-deadline slot. Every event cancels
//! whatever is pending and schedules a new deadline at `now + delay`
//! (latest wins, no queuing). The pending work fires once the host ticks at
//! or after the deadline.
//!
//! # Usage
//!
//! ```
//! use core::time::Duration;
//! use pagefx_runtime::debounce::{DebounceAction, Debouncer};
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(150));
//! debouncer.handle_event_at(Duration::from_millis(0));
//! debouncer.handle_event_at(Duration::from_millis(100));
//!
//! assert_eq!(debouncer.tick_at(Duration::from_millis(200)), DebounceAction::None);
//! assert!(matches!(
//!     debouncer.tick_at(Duration::from_millis(250)),
//!     DebounceAction::Fire { coalesced: 2, .. }
//! ));
//! ```
//!
//! # Invariants
//!
//! - **Latest-wins**: the deadline always derives from the most recent event.
//! - **Single fire**: a burst of events yields exactly one fire.
//! - **Deterministic**: time is supplied by the host; identical event
//!   sequences yield identical decisions.

#![forbid(unsafe_code)]

use core::time::Duration;

/// Action returned by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceAction {
    /// Nothing to do.
    None,
    /// A deadline was (re)scheduled.
    Scheduled {
        /// Monotonic time at which the pending work becomes due.
        deadline: Duration,
        /// Whether a previously pending deadline was cancelled.
        replaced: bool,
    },
    /// The pending work is due now.
    Fire {
        /// Number of events folded into this fire.
        coalesced: u32,
        /// Time from the first event of the burst to the fire.
        waited: Duration,
    },
}

/// Lifetime counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebounceStats {
    /// Events received.
    pub events: u64,
    /// Deadlines that fired.
    pub fires: u64,
    /// Pending deadlines cancelled by a newer event.
    pub replaced: u64,
}

/// Single-slot cancel-and-reschedule timer driven by host time.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
    window_start: Option<Duration>,
    events_in_window: u32,
    stats: DebounceStats,
}

impl Debouncer {
    /// Create a debouncer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            window_start: None,
            events_in_window: 0,
            stats: DebounceStats {
                events: 0,
                fires: 0,
                replaced: 0,
            },
        }
    }

    /// Configured delay.
    #[inline]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an event at `now`, replacing any pending deadline.
    pub fn handle_event_at(&mut self, now: Duration) -> DebounceAction {
        self.stats.events += 1;
        let replaced = self.deadline.is_some();
        if replaced {
            self.stats.replaced += 1;
        }
        if self.window_start.is_none() {
            self.window_start = Some(now);
        }
        self.events_in_window = self.events_in_window.saturating_add(1);

        let deadline = now.saturating_add(self.delay);
        self.deadline = Some(deadline);
        DebounceAction::Scheduled { deadline, replaced }
    }

    /// Fire the pending work if its deadline has passed.
    pub fn tick_at(&mut self, now: Duration) -> DebounceAction {
        let Some(deadline) = self.deadline else {
            return DebounceAction::None;
        };
        if now < deadline {
            return DebounceAction::None;
        }

        let waited = self
            .window_start
            .map_or(Duration::ZERO, |start| now.saturating_sub(start));
        let coalesced = self.events_in_window;
        self.deadline = None;
        self.window_start = None;
        self.events_in_window = 0;
        self.stats.fires += 1;
        DebounceAction::Fire { coalesced, waited }
    }

    /// Time remaining until the pending work is due (`ZERO` if overdue).
    pub fn time_until_fire(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    /// Pending deadline, if any.
    #[inline]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether work is pending.
    #[inline]
    pub const fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop pending work without firing. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        let had = self.deadline.take().is_some();
        self.window_start = None;
        self.events_in_window = 0;
        had
    }

    /// Lifetime counters.
    #[inline]
    pub const fn stats(&self) -> DebounceStats {
        self.stats
    }
}
