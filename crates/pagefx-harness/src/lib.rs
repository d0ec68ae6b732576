#![forbid(unsafe_code)]

//! Replay harness for PageFX.
//!
//! A fixture describes a page (element tree with host-supplied layout), the
//! behavior configuration, a seed, and a timed event script. [`replay`]
//! builds a `MemoryDom`, drives a `StepPage` through the script, and returns
//! a report that serializes to JSONL: one line per step, then a final
//! `page_state` line.
//!
//! # Running
//!
//! ```sh
//! cargo run -p pagefx-harness -- --fixture=crates/pagefx-harness/fixtures/demo.json
//! ```

pub mod cli;
pub mod fixture;
pub mod logging;
pub mod replay;

use std::fmt;
use std::io;
use std::path::PathBuf;

use pagefx_core::selector::SelectorError;
use pagefx_web::WebHostError;

pub use fixture::{Fixture, FixtureEvent, NodeSpec, TimedEvent};
pub use replay::{PageState, ReplayReport, StepRecord, replay};

/// Harness failure.
#[derive(Debug)]
pub enum HarnessError {
    /// The fixture file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The fixture is not valid JSON for the fixture schema.
    Fixture(serde_json::Error),
    /// The page could not be constructed from the fixture.
    Page(WebHostError),
    /// A click names a selector the in-memory DOM cannot evaluate.
    Selector {
        /// Offending selector.
        selector: String,
        /// Parse failure.
        source: SelectorError,
    },
    /// A click names an element that does not exist.
    ClickTarget {
        /// Selector used.
        selector: String,
        /// Index among the matches.
        index: usize,
    },
    /// The log subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Fixture(err) => write!(f, "invalid fixture: {err}"),
            Self::Page(err) => write!(f, "{err}"),
            Self::Selector { selector, source } => {
                write!(f, "bad click selector {selector:?}: {source}")
            }
            Self::ClickTarget { selector, index } => {
                write!(f, "no element #{index} matches click selector {selector:?}")
            }
            Self::Logging(msg) => write!(f, "cannot install log subscriber: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Fixture(err) => Some(err),
            Self::Page(err) => Some(err),
            Self::Selector { source, .. } => Some(source),
            Self::ClickTarget { .. } | Self::Logging(_) => None,
        }
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Fixture(err)
    }
}

impl From<WebHostError> for HarnessError {
    fn from(err: WebHostError) -> Self {
        Self::Page(err)
    }
}
