#![forbid(unsafe_code)]

//! `pagefx-web` runs the PageFX behaviors under host control.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes page events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The browser frontend (`pagefx-wasm`) and the replay harness both drive
//! pages through [`step_page::StepPage`], so a recorded event sequence
//! replays exactly as it ran.

pub mod step_page;

use core::time::Duration;
use std::collections::VecDeque;

use pagefx_core::event::PageEvent;
use pagefx_runtime::{PageEffect, PageError};

pub use step_page::{StepPage, StepResult};

/// Web host error type.
#[derive(Debug, Clone, PartialEq)]
pub enum WebHostError {
    /// The page could not be constructed.
    Page(PageError),
}

impl core::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Page(err) => write!(f, "page setup failed: {err}"),
        }
    }
}

impl std::error::Error for WebHostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Page(err) => Some(err),
        }
    }
}

impl From<PageError> for WebHostError {
    fn from(err: PageError) -> Self {
        Self::Page(err)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
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

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    ///
    /// Time never runs backwards; an earlier value is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Host-driven page event queue.
#[derive(Debug, Clone)]
pub struct HostEventQueue<N> {
    queue: VecDeque<PageEvent<N>>,
}

impl<N> Default for HostEventQueue<N> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<N> HostEventQueue<N> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    pub fn push(&mut self, event: PageEvent<N>) {
        self.queue.push_back(event);
    }

    /// Pop the oldest event.
    pub fn pop(&mut self) -> Option<PageEvent<N>> {
        self.queue.pop_front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Captured outputs for host consumption.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageOutputs {
    /// Diagnostic lines for the host console (e.g. a missing FAQ list).
    pub logs: Vec<String>,
    /// Effects produced since the last take, in order.
    pub effects: Vec<PageEffect>,
}

impl PageOutputs {
    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.effects.is_empty()
    }
}
