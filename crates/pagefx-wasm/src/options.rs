#![forbid(unsafe_code)]

//! Frontend options.
//!
//! The JS constructor takes an optional plain object. Keys are camelCase and
//! values may be strings or numbers; everything is read through a string
//! lookup so parsing stays testable off the browser.
//!
//! | Key | Field |
//! |-----|-------|
//! | `scrollThreshold` | header scroll threshold (px) |
//! | `resizeDebounceMs` | resize debounce delay |
//! | `headerSelector` | header element selector |
//! | `containerSelector` | row container selector |
//! | `contentSelector` | content block selector |
//! | `rowGrouping` | `adjacent` / `sort-cluster` |
//! | `faqListSelector` | FAQ list selector |
//! | `faqSampleSize` | number of FAQ items shown |
//! | `seed` | FAQ shuffle seed (random when absent) |

use std::fmt;

use pagefx_runtime::{ConfigError, PageConfig, RowGrouping};

/// Rejected option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionError {
    /// A value could not be parsed for its key.
    Invalid {
        /// Option key.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// The resulting configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { key, value } => write!(f, "invalid value for option {key}: {value:?}"),
            Self::Config(err) => write!(f, "invalid options: {err}"),
        }
    }
}

impl std::error::Error for OptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

/// Parsed frontend options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebOptions {
    /// Behavior configuration.
    pub config: PageConfig,
    /// FAQ shuffle seed, if pinned.
    pub seed: Option<u64>,
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, OptionError> {
    raw.trim().parse().map_err(|_| OptionError::Invalid {
        key,
        value: raw.to_string(),
    })
}

impl WebOptions {
    /// Read options through `get`, which returns the stringified value of a
    /// key or `None` when it is absent.
    pub fn from_lookup<F>(get: F) -> Result<Self, OptionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PageConfig::default();

        if let Some(raw) = get("scrollThreshold") {
            config.header.scroll_threshold = parse("scrollThreshold", &raw)?;
        }
        if let Some(raw) = get("resizeDebounceMs") {
            config.equalizer.debounce_ms = parse("resizeDebounceMs", &raw)?;
        }
        if let Some(raw) = get("headerSelector") {
            config.header.selector = raw;
        }
        if let Some(raw) = get("containerSelector") {
            config.equalizer.container_selector = raw;
        }
        if let Some(raw) = get("contentSelector") {
            config.equalizer.content_selector = raw;
        }
        if let Some(raw) = get("rowGrouping") {
            config.equalizer.grouping =
                RowGrouping::parse(&raw).ok_or(OptionError::Invalid {
                    key: "rowGrouping",
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = get("faqListSelector") {
            config.faq.list_selector = raw;
        }
        if let Some(raw) = get("faqSampleSize") {
            config.faq.sample_size = parse("faqSampleSize", &raw)?;
        }
        let seed = get("seed").map(|raw| parse("seed", &raw)).transpose()?;

        config.validate().map_err(OptionError::Config)?;
        Ok(Self { config, seed })
    }
}
