#![forbid(unsafe_code)]

//! Fixture schema.
//!
//! ```json
//! {
//!   "config": { "faq": { "sample_size": 3 } },
//!   "seed": 7,
//!   "scroll": 0,
//!   "nodes": [
//!     { "tag": "header", "classes": "header" },
//!     { "tag": "div", "classes": "row", "children": [
//!       { "tag": "div", "classes": "card-content", "top": 0, "height": 10 }
//!     ] }
//!   ],
//!   "events": [
//!     { "at_ms": 0, "event": { "type": "ready" } },
//!     { "at_ms": 20, "event": { "type": "scroll", "offset": 120 } },
//!     { "at_ms": 40, "event": { "type": "click", "selector": ".faq-question", "index": 0 } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use pagefx_core::memory_dom::{ElementSpec, MemoryDom, NodeId};
use pagefx_runtime::PageConfig;
use serde::{Deserialize, Serialize};

use crate::HarnessError;

const DEMO_FIXTURE: &str = include_str!("../fixtures/demo.json");

/// One element and its subtree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    /// Tag name.
    pub tag: String,
    /// Element id.
    pub id: Option<String>,
    /// Whitespace-separated class list.
    pub classes: String,
    /// The element's own text.
    pub text: String,
    /// Document-relative top edge (px).
    pub top: f64,
    /// Natural border-box height (px).
    pub height: f64,
    /// Child elements in document order.
    pub children: Vec<NodeSpec>,
}

/// A scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixtureEvent {
    /// `DOMContentLoaded`.
    Ready,
    /// Window `load`.
    Load,
    /// Viewport scroll, optionally moving the offset first.
    Scroll {
        /// New scroll offset (px).
        #[serde(default)]
        offset: Option<f64>,
    },
    /// Viewport resize.
    Resize,
    /// Click on the `index`th element matching `selector`.
    Click {
        /// Selector for the click target.
        selector: String,
        /// Index among the matches.
        #[serde(default)]
        index: usize,
    },
    /// No event; only advances time so a pending debounced pass can fire.
    Tick,
}

impl FixtureEvent {
    /// Stable name for reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Load => "load",
            Self::Scroll { .. } => "scroll",
            Self::Resize => "resize",
            Self::Click { .. } => "click",
            Self::Tick => "tick",
        }
    }
}

/// An event and the host time it arrives at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Host time in milliseconds.
    pub at_ms: u64,
    /// The event.
    pub event: FixtureEvent,
}

/// A complete replay scenario.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// Behavior configuration.
    pub config: PageConfig,
    /// FAQ shuffle seed.
    pub seed: Option<u64>,
    /// Initial scroll offset (px).
    pub scroll: f64,
    /// Top-level elements under `body`.
    pub nodes: Vec<NodeSpec>,
    /// Event script.
    pub events: Vec<TimedEvent>,
}

impl Fixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The bundled demo page.
    pub fn demo() -> Result<Self, HarnessError> {
        Self::from_json(DEMO_FIXTURE)
    }

    /// Apply `PAGEFX_*` configuration overrides on top of the fixture's
    /// config. Invalid values are ignored.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config = self.config.apply_env_with(get_env);
        self
    }

    /// Build the in-memory document described by [`Self::nodes`].
    #[must_use]
    pub fn build_dom(&self) -> MemoryDom {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        for node in &self.nodes {
            insert(&mut dom, root, node);
        }
        dom.set_scroll_offset(self.scroll);
        dom
    }
}

fn insert(dom: &mut MemoryDom, parent: NodeId, spec: &NodeSpec) {
    let mut element = ElementSpec::new(spec.tag.as_str())
        .class(&spec.classes)
        .text(spec.text.as_str())
        .top(spec.top)
        .height(spec.height);
    if let Some(id) = &spec.id {
        element = element.id(id.as_str());
    }
    let node = dom.insert(parent, element);
    for child in &spec.children {
        insert(dom, node, child);
    }
}
