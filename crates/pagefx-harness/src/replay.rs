#![forbid(unsafe_code)]

//! Fixture replay and JSONL reporting.

use core::time::Duration;

use pagefx_core::dom::PageDom;
use pagefx_core::event::PageEvent;
use pagefx_core::memory_dom::{MemoryDom, NodeId};
use pagefx_runtime::{HeaderUpdate, PageConfig, PageEffect, ToggleOutcome};
use pagefx_web::StepPage;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::HarnessError;
use crate::fixture::{Fixture, FixtureEvent};

/// Seed used when neither the fixture nor the caller pins one.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// One replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index (1-based).
    pub step: u64,
    /// Host time of the step.
    pub at_ms: u64,
    /// Event name (`flush` for the trailing timer step).
    pub event: String,
    /// Events dispatched.
    pub events_processed: u32,
    /// Debounced equalizer passes fired.
    pub equalize_passes: u32,
    /// Effects, one JSON object each.
    pub effects: Vec<Value>,
    /// Diagnostic lines.
    pub logs: Vec<String>,
}

/// Rendered FAQ item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqItemState {
    /// Question text (without the toggle indicator).
    pub question: String,
    /// Whether the item reacts to clicks.
    pub interactive: bool,
    /// Whether the answer is expanded.
    pub expanded: bool,
    /// Inline `max-height` of the answer.
    pub max_height: Option<String>,
}

/// Page state after the script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageState {
    /// Header flag, if a header exists.
    pub header_active: Option<bool>,
    /// Inline heights of content blocks, per container.
    pub block_heights: Vec<Vec<Option<String>>>,
    /// Rendered FAQ items in display order; `None` if the FAQ never attached.
    pub faq: Option<Vec<FaqItemState>>,
    /// Equalizer passes run.
    pub equalize_passes: u64,
}

/// Replay outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    /// Seed used for FAQ sampling.
    pub seed: u64,
    /// Per-step records.
    pub steps: Vec<StepRecord>,
    /// Final page state.
    pub state: PageState,
}

#[derive(Serialize)]
struct Line<'a, T> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(flatten)]
    body: &'a T,
}

impl ReplayReport {
    /// Serialize as JSONL: step lines, then a `page_state` line.
    pub fn to_jsonl(&self) -> Result<String, HarnessError> {
        let mut out = String::new();
        for step in &self.steps {
            let line = Line {
                kind: "step",
                seed: None,
                body: step,
            };
            out.push_str(&serde_json::to_string(&line)?);
            out.push('\n');
        }
        let line = Line {
            kind: "page_state",
            seed: Some(self.seed),
            body: &self.state,
        };
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');
        Ok(out)
    }
}

/// Describe an effect as a JSON object.
#[must_use]
pub fn effect_json(effect: &PageEffect) -> Value {
    match *effect {
        PageEffect::Header(update) => json!({
            "kind": "header",
            "active": update.active(),
            "changed": matches!(update, HeaderUpdate::Changed { .. }),
        }),
        PageEffect::FaqRendered(summary) => json!({
            "kind": "faq_rendered",
            "sources": summary.sources,
            "rendered": summary.rendered,
            "interactive": summary.interactive,
        }),
        PageEffect::FaqUnavailable => json!({ "kind": "faq_unavailable" }),
        PageEffect::FaqToggled(ToggleOutcome::Expanded { index, max_height }) => json!({
            "kind": "faq_expanded",
            "index": index,
            "max_height": max_height,
        }),
        PageEffect::FaqToggled(ToggleOutcome::Collapsed { index }) => json!({
            "kind": "faq_collapsed",
            "index": index,
        }),
        PageEffect::Equalized(report) => json!({
            "kind": "equalized",
            "containers": report.containers,
            "skipped": report.skipped,
            "blocks": report.blocks,
            "rows": report.rows,
        }),
        PageEffect::ResizeScheduled { deadline, replaced } => json!({
            "kind": "resize_scheduled",
            "deadline_ms": deadline.as_millis() as u64,
            "replaced": replaced,
        }),
    }
}

fn resolve_click(dom: &MemoryDom, selector: &str, index: usize) -> Result<NodeId, HarnessError> {
    let matches = dom
        .try_query_selector_all(selector)
        .map_err(|source| HarnessError::Selector {
            selector: selector.to_string(),
            source,
        })?;
    matches
        .get(index)
        .copied()
        .ok_or_else(|| HarnessError::ClickTarget {
            selector: selector.to_string(),
            index,
        })
}

fn record(
    runner: &mut StepPage<MemoryDom, StdRng>,
    at_ms: u64,
    event: &str,
) -> StepRecord {
    let result = runner.step();
    let outputs = runner.take_outputs();
    StepRecord {
        step: result.step_idx,
        at_ms,
        event: event.to_string(),
        events_processed: result.events_processed,
        equalize_passes: result.equalize_passes,
        effects: outputs.effects.iter().map(effect_json).collect(),
        logs: outputs.logs,
    }
}

/// Replay `fixture`. `seed` overrides the fixture's seed.
///
/// Events are applied in `at_ms` order (stable for ties). If a debounced
/// pass is still pending after the last event, a trailing `flush` step runs
/// at its deadline.
pub fn replay(fixture: &Fixture, seed: Option<u64>) -> Result<ReplayReport, HarnessError> {
    let seed = seed.or(fixture.seed).unwrap_or(DEFAULT_SEED);
    let config = fixture.config.clone();
    let mut runner = StepPage::with_seed(fixture.build_dom(), config.clone(), seed)?;
    info!(seed, events = fixture.events.len(), "replaying fixture");

    let mut script = fixture.events.clone();
    script.sort_by_key(|timed| timed.at_ms);

    let mut steps = Vec::with_capacity(script.len() + 1);
    for timed in &script {
        runner.set_time(Duration::from_millis(timed.at_ms));
        match &timed.event {
            FixtureEvent::Ready => runner.push_event(PageEvent::Ready),
            FixtureEvent::Load => runner.push_event(PageEvent::Load),
            FixtureEvent::Resize => runner.push_event(PageEvent::Resize),
            FixtureEvent::Scroll { offset } => {
                if let Some(offset) = offset {
                    runner.dom_mut().set_scroll_offset(*offset);
                }
                runner.push_event(PageEvent::Scroll);
            }
            FixtureEvent::Click { selector, index } => {
                let target = resolve_click(runner.dom(), selector, *index)?;
                runner.push_event(PageEvent::Click { target });
            }
            FixtureEvent::Tick => {}
        }
        let step = record(&mut runner, timed.at_ms, timed.event.name());
        debug!(step = step.step, event = %step.event, effects = step.effects.len(), "step replayed");
        steps.push(step);
    }

    if let Some(deadline) = runner.next_deadline() {
        runner.set_time(deadline);
        steps.push(record(&mut runner, deadline.as_millis() as u64, "flush"));
    }

    let state = page_state(&runner, &config);
    Ok(ReplayReport { seed, steps, state })
}

fn page_state(runner: &StepPage<MemoryDom, StdRng>, config: &PageConfig) -> PageState {
    let dom = runner.dom();
    let page = runner.page();

    let header_active = page
        .header()
        .header()
        .map(|header| dom.has_class(header, &config.header.active_class));

    let block_heights = dom
        .query_selector_all(&config.equalizer.container_selector)
        .iter()
        .map(|container| {
            dom.query_within(container, &config.equalizer.content_selector)
                .iter()
                .map(|block| dom.style(block, "height"))
                .collect()
        })
        .collect();

    let faq = page.faq().map(|faq| {
        faq.entries()
            .iter()
            .map(|entry| {
                let question = dom
                    .query_first_within(&entry.source, &config.faq.question_selector)
                    .map_or_else(|| dom.text(&entry.source), |q| dom.text(&q));
                FaqItemState {
                    question,
                    interactive: entry.is_interactive(),
                    expanded: entry.expanded,
                    max_height: entry
                        .parts
                        .as_ref()
                        .and_then(|parts| dom.style(&parts.answer, "max-height")),
                }
            })
            .collect()
    });

    PageState {
        header_active,
        block_heights,
        faq,
        equalize_passes: page.equalizer().passes(),
    }
}
