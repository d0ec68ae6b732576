#![forbid(unsafe_code)]

//! Page dispatcher.
//!
//! [`Page`] owns one instance of each behavior and routes [`PageEvent`]s to
//! them. It never reads a clock: the host passes the current monotonic time
//! with every event and tick, which keeps the debounced equalizer
//! deterministic.
//!
//! Failures stay local to the behavior that hit them. A missing FAQ list is
//! logged, recorded as a diagnostic line, and surfaced as
//! [`PageEffect::FaqUnavailable`]; the header and equalizer keep working.

use core::fmt::Debug;
use core::time::Duration;

use pagefx_core::dom::PageDom;
use pagefx_core::event::PageEvent;
use rand::Rng;
use tracing::{error, trace};

use crate::PageError;
use crate::config::{FaqConfig, PageConfig};
use crate::debounce::DebounceAction;
use crate::equalizer::{EqualizeReport, RowEqualizer};
use crate::faq::{FaqAccordion, RenderSummary, ToggleOutcome};
use crate::header::{HeaderToggle, HeaderUpdate};

/// Observable effect of handling an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEffect {
    /// The header flag was recomputed.
    Header(HeaderUpdate),
    /// The FAQ sample was rendered.
    FaqRendered(RenderSummary),
    /// The FAQ list is missing; the accordion stays inactive.
    FaqUnavailable,
    /// An FAQ item was expanded or collapsed.
    FaqToggled(ToggleOutcome),
    /// An equalizer pass ran.
    Equalized(EqualizeReport),
    /// A debounced equalizer pass was (re)scheduled.
    ResizeScheduled {
        /// When the pass becomes due.
        deadline: Duration,
        /// Whether an earlier pending pass was cancelled.
        replaced: bool,
    },
}

/// The three page behaviors and their event routing.
#[derive(Debug)]
pub struct Page<N, R> {
    header: HeaderToggle<N>,
    equalizer: RowEqualizer,
    faq_config: FaqConfig,
    faq: Option<FaqAccordion<N>>,
    ready: bool,
    rng: R,
    diagnostics: Vec<String>,
}

impl<N, R> Page<N, R>
where
    N: Clone + PartialEq + Debug,
    R: Rng,
{
    /// Validate `config`, look up the header, and build the behaviors.
    ///
    /// `rng` drives FAQ sampling.
    pub fn new<D>(dom: &D, config: PageConfig, rng: R) -> Result<Self, PageError>
    where
        D: PageDom<Node = N>,
    {
        config.validate()?;
        let PageConfig {
            header,
            equalizer,
            faq,
        } = config;
        Ok(Self {
            header: HeaderToggle::attach(dom, header),
            equalizer: RowEqualizer::new(equalizer),
            faq_config: faq,
            faq: None,
            ready: false,
            rng,
            diagnostics: Vec::new(),
        })
    }

    /// Route one event.
    pub fn handle_event<D>(
        &mut self,
        dom: &mut D,
        event: PageEvent<N>,
        now: Duration,
    ) -> Vec<PageEffect>
    where
        D: PageDom<Node = N>,
    {
        trace!(event = event.as_str(), now_ms = now.as_millis() as u64, "page event");
        let mut effects = Vec::new();
        match event {
            PageEvent::Ready => {
                effects.push(PageEffect::Header(self.header.apply(dom)));
                if !self.ready {
                    self.ready = true;
                    effects.push(self.init_faq(dom));
                }
            }
            PageEvent::Load => {
                effects.push(PageEffect::Equalized(self.equalizer.equalize(dom)));
            }
            PageEvent::Scroll => {
                effects.push(PageEffect::Header(self.header.apply(dom)));
            }
            PageEvent::Resize => {
                if let DebounceAction::Scheduled { deadline, replaced } =
                    self.equalizer.on_resize_at(now)
                {
                    effects.push(PageEffect::ResizeScheduled { deadline, replaced });
                }
            }
            PageEvent::Click { target } => {
                if let Some(faq) = self.faq.as_mut()
                    && let Some(outcome) = faq.handle_click(dom, &target)
                {
                    effects.push(PageEffect::FaqToggled(outcome));
                }
            }
        }
        effects
    }

    /// Run the debounced equalizer pass if it is due at `now`.
    pub fn tick<D>(&mut self, dom: &mut D, now: Duration) -> Option<EqualizeReport>
    where
        D: PageDom<Node = N>,
    {
        self.equalizer.tick_at(dom, now)
    }

    /// When the next debounced pass is due, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.equalizer.pending_deadline()
    }

    /// Re-render the FAQ sample from the captured sources.
    ///
    /// Returns `None` if the accordion never attached.
    pub fn resample_faq<D>(&mut self, dom: &mut D) -> Option<RenderSummary>
    where
        D: PageDom<Node = N>,
    {
        let faq = self.faq.as_mut()?;
        Some(faq.resample(dom, &mut self.rng))
    }

    fn init_faq<D>(&mut self, dom: &mut D) -> PageEffect
    where
        D: PageDom<Node = N>,
    {
        match FaqAccordion::attach(dom, self.faq_config.clone()) {
            Ok(mut faq) => {
                let summary = faq.render(dom, &mut self.rng);
                self.faq = Some(faq);
                PageEffect::FaqRendered(summary)
            }
            Err(err) => {
                error!(%err, "FAQ accordion disabled");
                self.diagnostics.push(err.to_string());
                PageEffect::FaqUnavailable
            }
        }
    }

    /// Drain diagnostic lines recorded since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Whether `Ready` has been handled.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Header toggle.
    #[must_use]
    pub fn header(&self) -> &HeaderToggle<N> {
        &self.header
    }

    /// Row equalizer.
    #[must_use]
    pub fn equalizer(&self) -> &RowEqualizer {
        &self.equalizer
    }

    /// FAQ accordion, once attached.
    #[must_use]
    pub fn faq(&self) -> Option<&FaqAccordion<N>> {
        self.faq.as_ref()
    }
}
