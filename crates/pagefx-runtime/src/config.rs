#![forbid(unsafe_code)]

//! Page behavior configuration.
//!
//! Every selector, class name, and tuning constant the behaviors use lives
//! here with its documented default. Hosts can start from
//! [`PageConfig::default`], adjust with the `with_*` builders, and apply
//! environment overrides with [`PageConfig::from_env_with`].
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PAGEFX_SCROLL_THRESHOLD` | [`HeaderConfig::scroll_threshold`] |
//! | `PAGEFX_RESIZE_DEBOUNCE_MS` | [`EqualizerConfig::debounce_ms`] |
//! | `PAGEFX_CONTAINER_SELECTOR` | [`EqualizerConfig::container_selector`] |
//! | `PAGEFX_CONTENT_SELECTOR` | [`EqualizerConfig::content_selector`] |
//! | `PAGEFX_ROW_GROUPING` | [`EqualizerConfig::grouping`] (`adjacent` / `sort-cluster`) |
//! | `PAGEFX_FAQ_SAMPLE_SIZE` | [`FaqConfig::sample_size`] |
//!
//! Unparseable values are ignored and the previous value is kept.

use core::time::Duration;
use std::fmt;

use crate::equalizer::RowGrouping;

/// Default scroll offset (px) above which the header is active.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 40.0;
/// Default resize debounce delay.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 150;
/// Default number of FAQ items shown.
pub const DEFAULT_FAQ_SAMPLE_SIZE: usize = 15;

/// Overrides [`HeaderConfig::scroll_threshold`].
pub const ENV_SCROLL_THRESHOLD: &str = "PAGEFX_SCROLL_THRESHOLD";
/// Overrides [`EqualizerConfig::debounce_ms`].
pub const ENV_RESIZE_DEBOUNCE_MS: &str = "PAGEFX_RESIZE_DEBOUNCE_MS";
/// Overrides [`EqualizerConfig::container_selector`].
pub const ENV_CONTAINER_SELECTOR: &str = "PAGEFX_CONTAINER_SELECTOR";
/// Overrides [`EqualizerConfig::content_selector`].
pub const ENV_CONTENT_SELECTOR: &str = "PAGEFX_CONTENT_SELECTOR";
/// Overrides [`EqualizerConfig::grouping`].
pub const ENV_ROW_GROUPING: &str = "PAGEFX_ROW_GROUPING";
/// Overrides [`FaqConfig::sample_size`].
pub const ENV_FAQ_SAMPLE_SIZE: &str = "PAGEFX_FAQ_SAMPLE_SIZE";

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A selector field is empty.
    EmptySelector(&'static str),
    /// A class-name field is empty or contains whitespace.
    InvalidClass(&'static str),
    /// The scroll threshold is negative or not finite.
    InvalidThreshold(f64),
    /// The FAQ sample size is zero.
    ZeroSampleSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelector(field) => write!(f, "selector `{field}` is empty"),
            Self::InvalidClass(field) => {
                write!(f, "class name `{field}` must be a single non-empty token")
            }
            Self::InvalidThreshold(value) => {
                write!(f, "scroll threshold must be finite and >= 0, got {value}")
            }
            Self::ZeroSampleSize => write!(f, "FAQ sample size must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Header activity toggle settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HeaderConfig {
    /// Selector for the header element (looked up once).
    pub selector: String,
    /// Class toggled on the header while scrolled past the threshold.
    pub active_class: String,
    /// Offset (px) the scroll position must strictly exceed.
    pub scroll_threshold: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: ".header".into(),
            active_class: "is-active".into(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

/// Row height equalizer settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EqualizerConfig {
    /// Selector for row containers.
    pub container_selector: String,
    /// Selector for content blocks inside a container.
    pub content_selector: String,
    /// Resize debounce delay in milliseconds.
    pub debounce_ms: u64,
    /// How blocks are partitioned into visual rows.
    pub grouping: RowGrouping,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            container_selector: ".row".into(),
            content_selector: ".card-content".into(),
            debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            grouping: RowGrouping::Adjacent,
        }
    }
}

impl EqualizerConfig {
    /// Resize debounce delay.
    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// FAQ accordion sampler settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FaqConfig {
    /// Selector for the list element holding the source items.
    pub list_selector: String,
    /// Selector for source items inside the list.
    pub item_selector: String,
    /// Selector for the clickable question inside an item.
    pub question_selector: String,
    /// Selector for the collapsible answer inside an item.
    pub answer_selector: String,
    /// Selector for the content element inside the answer (measured on expand).
    pub content_selector: String,
    /// Class marking an expanded item.
    pub active_class: String,
    /// Tag of the toggle indicator appended to each question.
    pub icon_tag: String,
    /// Class of the toggle indicator.
    pub icon_class: String,
    /// Indicator text while collapsed.
    pub collapsed_icon: String,
    /// Indicator text while expanded.
    pub expanded_icon: String,
    /// CSS transition installed on each answer.
    pub transition: String,
    /// Maximum number of items rendered.
    pub sample_size: usize,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            list_selector: ".faq-list".into(),
            item_selector: "li".into(),
            question_selector: ".faq-question".into(),
            answer_selector: ".faq-answer".into(),
            content_selector: "p".into(),
            active_class: "active".into(),
            icon_tag: "span".into(),
            icon_class: "faq-toggle-icon".into(),
            collapsed_icon: "+".into(),
            expanded_icon: "-".into(),
            transition: "max-height 0.3s ease-out".into(),
            sample_size: DEFAULT_FAQ_SAMPLE_SIZE,
        }
    }
}

/// Configuration for all page behaviors.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PageConfig {
    /// Header scroll toggle.
    pub header: HeaderConfig,
    /// Row height equalizer.
    pub equalizer: EqualizerConfig,
    /// FAQ accordion sampler.
    pub faq: FaqConfig,
}

impl PageConfig {
    /// Set the header scroll threshold.
    #[must_use]
    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.header.scroll_threshold = threshold;
        self
    }

    /// Set the row container and content-block selectors.
    #[must_use]
    pub fn with_selectors(
        mut self,
        container: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.equalizer.container_selector = container.into();
        self.equalizer.content_selector = content.into();
        self
    }

    /// Set the resize debounce delay in milliseconds.
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.equalizer.debounce_ms = ms;
        self
    }

    /// Set the row grouping strategy.
    #[must_use]
    pub fn with_grouping(mut self, grouping: RowGrouping) -> Self {
        self.equalizer.grouping = grouping;
        self
    }

    /// Set the FAQ sample size.
    #[must_use]
    pub fn with_sample_size(mut self, count: usize) -> Self {
        self.faq.sample_size = count;
        self
    }

    /// Defaults with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().apply_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().apply_env_with(get_env)
    }

    /// Apply environment overrides on top of `self`.
    #[must_use]
    pub fn apply_env_with<F>(mut self, get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get_env(ENV_SCROLL_THRESHOLD)
            && let Ok(threshold) = value.trim().parse::<f64>()
            && threshold.is_finite()
            && threshold >= 0.0
        {
            self.header.scroll_threshold = threshold;
        }
        if let Some(value) = get_env(ENV_RESIZE_DEBOUNCE_MS)
            && let Ok(ms) = value.trim().parse::<u64>()
        {
            self.equalizer.debounce_ms = ms;
        }
        if let Some(value) = get_env(ENV_CONTAINER_SELECTOR)
            && !value.trim().is_empty()
        {
            self.equalizer.container_selector = value.trim().to_string();
        }
        if let Some(value) = get_env(ENV_CONTENT_SELECTOR)
            && !value.trim().is_empty()
        {
            self.equalizer.content_selector = value.trim().to_string();
        }
        if let Some(value) = get_env(ENV_ROW_GROUPING)
            && let Some(grouping) = RowGrouping::parse(&value)
        {
            self.equalizer.grouping = grouping;
        }
        if let Some(value) = get_env(ENV_FAQ_SAMPLE_SIZE)
            && let Ok(count) = value.trim().parse::<usize>()
            && count > 0
        {
            self.faq.sample_size = count;
        }
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let selectors = [
            ("header.selector", &self.header.selector),
            ("equalizer.container_selector", &self.equalizer.container_selector),
            ("equalizer.content_selector", &self.equalizer.content_selector),
            ("faq.list_selector", &self.faq.list_selector),
            ("faq.item_selector", &self.faq.item_selector),
            ("faq.question_selector", &self.faq.question_selector),
            ("faq.answer_selector", &self.faq.answer_selector),
            ("faq.content_selector", &self.faq.content_selector),
        ];
        for (field, value) in selectors {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySelector(field));
            }
        }

        let classes = [
            ("header.active_class", &self.header.active_class),
            ("faq.active_class", &self.faq.active_class),
            ("faq.icon_class", &self.faq.icon_class),
        ];
        for (field, value) in classes {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidClass(field));
            }
        }

        let threshold = self.header.scroll_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.faq.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = PageConfig::default();
        assert_eq!(config.header.scroll_threshold, 40.0);
        assert_eq!(config.header.active_class, "is-active");
        assert_eq!(config.equalizer.container_selector, ".row");
        assert_eq!(config.equalizer.content_selector, ".card-content");
        assert_eq!(config.equalizer.debounce_delay(), Duration::from_millis(150));
        assert_eq!(config.equalizer.grouping, RowGrouping::Adjacent);
        assert_eq!(config.faq.sample_size, 15);
        assert_eq!(config.faq.transition, "max-height 0.3s ease-out");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let config = PageConfig::from_env_with(env(&[
            (ENV_SCROLL_THRESHOLD, "64"),
            (ENV_RESIZE_DEBOUNCE_MS, " 200 "),
            (ENV_CONTAINER_SELECTOR, ".grid"),
            (ENV_CONTENT_SELECTOR, ".tile"),
            (ENV_ROW_GROUPING, "sort-cluster"),
            (ENV_FAQ_SAMPLE_SIZE, "5"),
        ]));
        assert_eq!(config.header.scroll_threshold, 64.0);
        assert_eq!(config.equalizer.debounce_ms, 200);
        assert_eq!(config.equalizer.container_selector, ".grid");
        assert_eq!(config.equalizer.content_selector, ".tile");
        assert_eq!(config.equalizer.grouping, RowGrouping::SortCluster);
        assert_eq!(config.faq.sample_size, 5);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let config = PageConfig::from_env_with(env(&[
            (ENV_SCROLL_THRESHOLD, "-3"),
            (ENV_RESIZE_DEBOUNCE_MS, "soon"),
            (ENV_CONTAINER_SELECTOR, "  "),
            (ENV_ROW_GROUPING, "diagonal"),
            (ENV_FAQ_SAMPLE_SIZE, "0"),
        ]));
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn builders_set_fields() {
        let config = PageConfig::default()
            .with_scroll_threshold(10.0)
            .with_selectors(".grid", ".tile")
            .with_debounce_ms(0)
            .with_grouping(RowGrouping::SortCluster)
            .with_sample_size(3);
        assert_eq!(config.header.scroll_threshold, 10.0);
        assert_eq!(config.equalizer.container_selector, ".grid");
        assert_eq!(config.equalizer.debounce_delay(), Duration::ZERO);
        assert_eq!(config.faq.sample_size, 3);
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let config = PageConfig::default().with_selectors("", ".x");
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptySelector("equalizer.container_selector"))
        );

        let mut config = PageConfig::default();
        config.header.active_class = "is active".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidClass("header.active_class"))
        );

        let config = PageConfig::default().with_scroll_threshold(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));

        let config = PageConfig::default().with_sample_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleSize));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let config: PageConfig =
            serde_json::from_str(r#"{"faq":{"sample_size":4},"equalizer":{"grouping":"sort-cluster"}}"#)
                .unwrap();
        assert_eq!(config.faq.sample_size, 4);
        assert_eq!(config.faq.list_selector, ".faq-list");
        assert_eq!(config.equalizer.grouping, RowGrouping::SortCluster);
        assert_eq!(config.header, HeaderConfig::default());
    }
}
