#![forbid(unsafe_code)]

//! FAQ accordion sampler.
//!
//! On attach, the source items inside the FAQ list are captured once. A
//! render pass shuffles a copy of them (uniformly, Fisher–Yates), keeps the
//! first [`FaqConfig::sample_size`], clears the list, and appends deep clones
//! in shuffled order. Source items are never mutated.
//!
//! Each clone that has a question, an answer, and a content element inside
//! the answer becomes interactive: the answer starts collapsed
//! (`max-height: 0`, hidden overflow, a `max-height` transition), a toggle
//! indicator is appended to the question, and clicks on the question flip
//! between collapsed and expanded. Clones missing any of those parts are
//! rendered as-is.

use core::fmt::Debug;

use pagefx_core::dom::PageDom;
use pagefx_core::geometry::format_px;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, debug_span, info};

use crate::PageError;
use crate::config::FaqConfig;

/// Shuffle a copy of `items` and keep at most `count` of them.
///
/// Every ordering of every `count`-subset is equally likely. When `items`
/// has fewer than `count` elements, all of them are returned (shuffled).
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// Handles to the interactive parts of a rendered item.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqParts<N> {
    /// Clickable question.
    pub question: N,
    /// Collapsible answer.
    pub answer: N,
    /// Content inside the answer, measured on expand.
    pub content: N,
    /// Toggle indicator appended to the question.
    pub icon: N,
}

/// One rendered (cloned) item.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqEntry<N> {
    /// The source item this entry was cloned from.
    pub source: N,
    /// The clone attached to the list.
    pub item: N,
    /// Interactive parts; `None` for items rendered statically.
    pub parts: Option<FaqParts<N>>,
    /// Whether the answer is expanded.
    pub expanded: bool,
}

impl<N> FaqEntry<N> {
    /// Whether the entry reacts to clicks.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.parts.is_some()
    }
}

/// Result of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    /// Items captured from the original markup.
    pub sources: usize,
    /// Items rendered.
    pub rendered: usize,
    /// Rendered items wired for expand/collapse.
    pub interactive: usize,
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    /// The answer opened to the content's height.
    Expanded {
        /// Index of the entry in render order.
        index: usize,
        /// `max-height` written, in pixels.
        max_height: f64,
    },
    /// The answer closed.
    Collapsed {
        /// Index of the entry in render order.
        index: usize,
    },
}

/// Randomly sampled expand/collapse FAQ list.
#[derive(Debug, Clone)]
pub struct FaqAccordion<N> {
    config: FaqConfig,
    list: N,
    sources: Vec<N>,
    entries: Vec<FaqEntry<N>>,
}

impl<N: Clone + PartialEq + Debug> FaqAccordion<N> {
    /// Find the list element and capture its source items.
    ///
    /// Fails with [`PageError::MissingFaqList`] when the list is absent.
    pub fn attach<D>(dom: &D, config: FaqConfig) -> Result<Self, PageError>
    where
        D: PageDom<Node = N>,
    {
        let list = dom
            .query_selector(&config.list_selector)
            .ok_or_else(|| PageError::MissingFaqList {
                selector: config.list_selector.clone(),
            })?;
        let sources = dom.query_within(&list, &config.item_selector);
        debug!(sources = sources.len(), "captured FAQ source items");
        Ok(Self {
            config,
            list,
            sources,
            entries: Vec::new(),
        })
    }

    /// The list element.
    #[must_use]
    pub fn list(&self) -> &N {
        &self.list
    }

    /// Source items captured at attach time.
    #[must_use]
    pub fn sources(&self) -> &[N] {
        &self.sources
    }

    /// Rendered entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[FaqEntry<N>] {
        &self.entries
    }

    /// Clear the list and render a fresh random sample of the sources.
    pub fn render<D, R>(&mut self, dom: &mut D, rng: &mut R) -> RenderSummary
    where
        D: PageDom<Node = N>,
        R: Rng + ?Sized,
    {
        let _span = debug_span!("faq.render", sample_size = self.config.sample_size).entered();

        dom.clear_children(&self.list);
        self.entries.clear();

        let chosen = sample(&self.sources, self.config.sample_size, rng);
        let mut summary = RenderSummary {
            sources: self.sources.len(),
            ..RenderSummary::default()
        };

        for source in chosen {
            let Some(item) = dom.clone_deep(&source) else {
                continue;
            };
            dom.append_child(&self.list, &item);
            let parts = self.wire(dom, &item);
            if parts.is_some() {
                summary.interactive += 1;
            }
            summary.rendered += 1;
            self.entries.push(FaqEntry {
                source,
                item,
                parts,
                expanded: false,
            });
        }

        info!(
            sources = summary.sources,
            rendered = summary.rendered,
            interactive = summary.interactive,
            "FAQ sample rendered"
        );
        summary
    }

    /// Re-render from the captured sources. Alias of [`Self::render`] kept
    /// for hosts that want an explicit reshuffle.
    pub fn resample<D, R>(&mut self, dom: &mut D, rng: &mut R) -> RenderSummary
    where
        D: PageDom<Node = N>,
        R: Rng + ?Sized,
    {
        self.render(dom, rng)
    }

    fn wire<D>(&self, dom: &mut D, item: &N) -> Option<FaqParts<N>>
    where
        D: PageDom<Node = N>,
    {
        let question = dom.query_first_within(item, &self.config.question_selector)?;
        let answer = dom.query_first_within(item, &self.config.answer_selector)?;
        let content = dom.query_first_within(&answer, &self.config.content_selector)?;
        let icon = dom.create_element(&self.config.icon_tag)?;

        dom.set_style(&answer, "max-height", "0");
        dom.set_style(&answer, "overflow", "hidden");
        dom.set_style(&answer, "transition", &self.config.transition);
        dom.remove_class(item, &self.config.active_class);

        dom.add_class(&icon, &self.config.icon_class);
        dom.set_text(&icon, &self.config.collapsed_icon);
        dom.append_child(&question, &icon);

        Some(FaqParts {
            question,
            answer,
            content,
            icon,
        })
    }

    /// Route a click. Returns `None` unless `target` is (inside) the question
    /// of an interactive entry.
    pub fn handle_click<D>(&mut self, dom: &mut D, target: &N) -> Option<ToggleOutcome>
    where
        D: PageDom<Node = N>,
    {
        let index = self.entries.iter().position(|entry| {
            entry
                .parts
                .as_ref()
                .is_some_and(|parts| dom.contains(&parts.question, target))
        })?;
        self.toggle(dom, index)
    }

    /// Flip the entry at `index` between collapsed and expanded.
    pub fn toggle<D>(&mut self, dom: &mut D, index: usize) -> Option<ToggleOutcome>
    where
        D: PageDom<Node = N>,
    {
        let entry = self.entries.get_mut(index)?;
        let parts = entry.parts.as_ref()?;

        // The item class is authoritative: page scripts may have touched it.
        let expanded = dom.has_class(&entry.item, &self.config.active_class);
        let outcome = if expanded {
            dom.set_style(&parts.answer, "max-height", "0");
            dom.remove_class(&entry.item, &self.config.active_class);
            dom.set_text(&parts.icon, &self.config.collapsed_icon);
            ToggleOutcome::Collapsed { index }
        } else {
            let max_height = dom.offset_height(&parts.content);
            dom.set_style(&parts.answer, "max-height", &format_px(max_height));
            dom.add_class(&entry.item, &self.config.active_class);
            dom.set_text(&parts.icon, &self.config.expanded_icon);
            ToggleOutcome::Expanded { index, max_height }
        };
        entry.expanded = !expanded;
        debug!(index, expanded = entry.expanded, "FAQ item toggled");
        Some(outcome)
    }
}
