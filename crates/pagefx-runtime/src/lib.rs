#![forbid(unsafe_code)]

//! Page behaviors: header scroll toggle, row height equalizer, FAQ accordion.
//!
//! The three behaviors share nothing. Each owns its own state and is driven
//! by the [`page::Page`] dispatcher, which routes host events to them:
//!
//! | Event | Behavior |
//! |-------|----------|
//! | `Ready` | header toggle, FAQ sampling (once) |
//! | `Load` | equalizer pass |
//! | `Scroll` | header toggle |
//! | `Resize` | arm the equalizer's debounce timer |
//! | `Click` | FAQ expand/collapse |
//!
//! Hosts also call [`page::Page::tick`] so a debounced equalizer pass can run
//! once its deadline passes.

pub mod config;
pub mod debounce;
pub mod equalizer;
pub mod faq;
pub mod header;
pub mod page;

use std::fmt;

pub use config::{ConfigError, EqualizerConfig, FaqConfig, HeaderConfig, PageConfig};
pub use debounce::{DebounceAction, Debouncer};
pub use equalizer::{EqualizeReport, RowEqualizer, RowGrouping};
pub use faq::{FaqAccordion, RenderSummary, ToggleOutcome};
pub use header::{HeaderToggle, HeaderUpdate};
pub use page::{Page, PageEffect};

/// Page behavior error.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// The FAQ list element is not on the page.
    MissingFaqList {
        /// Selector that matched nothing.
        selector: String,
    },
    /// The configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFaqList { selector } => write!(
                f,
                "FAQ list not found. Make sure an element matching \"{selector}\" exists."
            ),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::MissingFaqList { .. } => None,
        }
    }
}

impl From<ConfigError> for PageError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
