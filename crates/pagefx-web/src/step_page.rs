#![forbid(unsafe_code)]

//! Step-based page runner.
//!
//! [`StepPage`] owns a [`PageDom`] and a [`Page`] and advances them without
//! threads, timers, or blocking. The host controls the loop:
//!
//! 1. Push events via [`StepPage::push_event`].
//! 2. Advance time via [`StepPage::advance_time`] or [`StepPage::set_time`].
//! 3. Call [`StepPage::step`] to dispatch queued events and fire a due
//!    debounced equalizer pass.
//! 4. Read effects and diagnostic lines via [`StepPage::take_outputs`].
//!
//! A host with real timers schedules its next step at
//! [`StepPage::next_deadline`] instead of polling.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use pagefx_core::event::PageEvent;
//! use pagefx_core::memory_dom::{ElementSpec, MemoryDom};
//! use pagefx_runtime::PageConfig;
//! use pagefx_web::StepPage;
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.root();
//! dom.insert(root, ElementSpec::new("header").class("header"));
//!
//! let mut page = StepPage::with_seed(dom, PageConfig::default(), 7).unwrap();
//! page.push_event(PageEvent::Resize);
//! page.step();
//! assert_eq!(page.next_deadline(), Some(Duration::from_millis(150)));
//!
//! page.advance_time(Duration::from_millis(150));
//! assert_eq!(page.step().equalize_passes, 1);
//! ```

use core::time::Duration;

use pagefx_core::dom::PageDom;
use pagefx_core::event::PageEvent;
use pagefx_runtime::{Page, PageConfig, PageEffect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::{DeterministicClock, HostEventQueue, PageOutputs, WebHostError};

/// Result of a single [`StepPage::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of events dispatched during this step.
    pub events_processed: u32,
    /// Debounced equalizer passes that fired during this step.
    pub equalize_passes: u32,
    /// Current step index (monotonically increasing).
    pub step_idx: u64,
}

/// Host-driven, non-blocking page runner.
pub struct StepPage<D: PageDom, R> {
    dom: D,
    page: Page<D::Node, R>,
    clock: DeterministicClock,
    events: HostEventQueue<D::Node>,
    outputs: PageOutputs,
    step_idx: u64,
}

impl<D: PageDom> StepPage<D, StdRng> {
    /// Create a runner whose FAQ sampling is seeded with `seed`.
    pub fn with_seed(dom: D, config: PageConfig, seed: u64) -> Result<Self, WebHostError> {
        Self::new(dom, config, StdRng::seed_from_u64(seed))
    }
}

impl<D: PageDom, R: Rng> StepPage<D, R> {
    /// Create a runner. The header is looked up in `dom` immediately.
    pub fn new(dom: D, config: PageConfig, rng: R) -> Result<Self, WebHostError> {
        let page = Page::new(&dom, config, rng)?;
        Ok(Self {
            dom,
            page,
            clock: DeterministicClock::new(),
            events: HostEventQueue::new(),
            outputs: PageOutputs::default(),
            step_idx: 0,
        })
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: PageEvent<D::Node>) {
        self.events.push(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Dispatch all queued events at the current time, then run the
    /// debounced equalizer pass if it is due.
    ///
    /// A pass whose deadline has already passed runs before the queued
    /// events, so a late resize starts a new burst instead of replacing it.
    pub fn step(&mut self) -> StepResult {
        let now = self.clock.now();
        let mut events_processed: u32 = 0;
        let mut equalize_passes = self.fire_due(now);

        while let Some(event) = self.events.pop() {
            events_processed += 1;
            let effects = self.page.handle_event(&mut self.dom, event, now);
            self.outputs.effects.extend(effects);
        }

        equalize_passes += self.fire_due(now);

        self.outputs.logs.extend(self.page.take_diagnostics());
        self.step_idx += 1;
        trace!(
            step = self.step_idx,
            events_processed, equalize_passes, "page step"
        );

        StepResult {
            events_processed,
            equalize_passes,
            step_idx: self.step_idx,
        }
    }

    fn fire_due(&mut self, now: Duration) -> u32 {
        match self.page.tick(&mut self.dom, now) {
            Some(report) => {
                self.outputs.effects.push(PageEffect::Equalized(report));
                1
            }
            None => 0,
        }
    }

    /// When the next debounced pass is due, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.page.next_deadline()
    }

    /// Take the captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> PageOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Read the captured outputs without consuming them.
    #[must_use]
    pub fn outputs(&self) -> &PageOutputs {
        &self.outputs
    }

    /// Re-render the FAQ sample, recording the effect.
    pub fn resample_faq(&mut self) -> bool {
        match self.page.resample_faq(&mut self.dom) {
            Some(summary) => {
                self.outputs.effects.push(PageEffect::FaqRendered(summary));
                true
            }
            None => false,
        }
    }

    /// Access the DOM.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutably access the DOM (e.g. to move the scroll position).
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Access the page behaviors.
    pub fn page(&self) -> &Page<D::Node, R> {
        &self.page
    }

    /// Number of events waiting for the next step.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Current step index.
    #[must_use]
    pub fn step_idx(&self) -> u64 {
        self.step_idx
    }
}
