#![forbid(unsafe_code)]

//! Header activity toggle.
//!
//! Keeps one boolean presentation flag (a class on the header element) in
//! sync with the vertical scroll offset. The header handle is looked up once
//! when the toggle is attached; a page without a header gets a toggle that
//! does nothing.

use pagefx_core::dom::PageDom;
use tracing::debug;

use crate::config::HeaderConfig;

/// Whether the header should be active at `offset`.
///
/// Strictly greater-than: an offset equal to the threshold is inactive.
#[inline]
#[must_use]
pub fn is_active(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Result of applying the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderUpdate {
    /// No header element on the page.
    Absent,
    /// The flag already had the computed value.
    Unchanged {
        /// Current flag value.
        active: bool,
    },
    /// The flag flipped.
    Changed {
        /// New flag value.
        active: bool,
    },
}

impl HeaderUpdate {
    /// Flag value after the update, if a header exists.
    #[must_use]
    pub const fn active(self) -> Option<bool> {
        match self {
            Self::Absent => None,
            Self::Unchanged { active } | Self::Changed { active } => Some(active),
        }
    }
}

/// Scroll-driven header flag.
#[derive(Debug, Clone)]
pub struct HeaderToggle<N> {
    header: Option<N>,
    config: HeaderConfig,
    transitions: u64,
}

impl<N: Clone + PartialEq + core::fmt::Debug> HeaderToggle<N> {
    /// Create a toggle for an already-resolved header handle.
    #[must_use]
    pub fn new(header: Option<N>, config: HeaderConfig) -> Self {
        Self {
            header,
            config,
            transitions: 0,
        }
    }

    /// Look the header up in `dom` and create a toggle for it.
    pub fn attach<D>(dom: &D, config: HeaderConfig) -> Self
    where
        D: PageDom<Node = N>,
    {
        let header = dom.query_selector(&config.selector);
        if header.is_none() {
            debug!(selector = %config.selector, "no header element; scroll toggle disabled");
        }
        Self::new(header, config)
    }

    /// The header handle, if one was found.
    #[must_use]
    pub fn header(&self) -> Option<&N> {
        self.header.as_ref()
    }

    /// Number of times the flag has flipped.
    #[must_use]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Recompute the flag from the current scroll offset.
    pub fn apply<D>(&mut self, dom: &mut D) -> HeaderUpdate
    where
        D: PageDom<Node = N>,
    {
        let Some(header) = self.header.as_ref() else {
            return HeaderUpdate::Absent;
        };
        let offset = dom.scroll_offset();
        let active = is_active(offset, self.config.scroll_threshold);
        let was_active = dom.has_class(header, &self.config.active_class);

        if active {
            dom.add_class(header, &self.config.active_class);
        } else {
            dom.remove_class(header, &self.config.active_class);
        }

        if active == was_active {
            HeaderUpdate::Unchanged { active }
        } else {
            self.transitions += 1;
            debug!(offset, active, "header flag changed");
            HeaderUpdate::Changed { active }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagefx_core::memory_dom::{ElementSpec, MemoryDom, NodeId};

    fn page_with_header() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let header = dom.insert(root, ElementSpec::new("header").class("header"));
        (dom, header)
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!is_active(0.0, 40.0));
        assert!(!is_active(40.0, 40.0));
        assert!(is_active(40.5, 40.0));
        assert!(is_active(41.0, 40.0));
    }

    #[test]
    fn toggles_class_across_threshold() {
        let (mut dom, header) = page_with_header();
        let mut toggle = HeaderToggle::attach(&dom, HeaderConfig::default());
        assert_eq!(toggle.header(), Some(&header));

        dom.set_scroll_offset(41.0);
        assert_eq!(toggle.apply(&mut dom), HeaderUpdate::Changed { active: true });
        assert!(dom.has_class(&header, "is-active"));

        dom.set_scroll_offset(40.0);
        assert_eq!(toggle.apply(&mut dom), HeaderUpdate::Changed { active: false });
        assert!(!dom.has_class(&header, "is-active"));
        assert_eq!(toggle.transitions(), 2);
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let (mut dom, header) = page_with_header();
        let mut toggle = HeaderToggle::attach(&dom, HeaderConfig::default());
        dom.set_scroll_offset(300.0);
        toggle.apply(&mut dom);
        assert_eq!(toggle.apply(&mut dom), HeaderUpdate::Unchanged { active: true });
        assert_eq!(dom.classes(header), &["header".to_string(), "is-active".to_string()]);
    }

    #[test]
    fn initial_state_clears_stale_flag() {
        let (mut dom, header) = page_with_header();
        dom.add_class(&header, "is-active");
        let mut toggle = HeaderToggle::attach(&dom, HeaderConfig::default());
        assert_eq!(toggle.apply(&mut dom), HeaderUpdate::Changed { active: false });
    }

    #[test]
    fn missing_header_is_a_no_op() {
        let mut dom = MemoryDom::new();
        let mut toggle = HeaderToggle::attach(&dom, HeaderConfig::default());
        dom.set_scroll_offset(500.0);
        assert_eq!(toggle.apply(&mut dom), HeaderUpdate::Absent);
        assert_eq!(HeaderUpdate::Absent.active(), None);
    }

    #[test]
    fn custom_threshold_and_class() {
        let (mut dom, header) = page_with_header();
        let config = HeaderConfig {
            active_class: "scrolled".into(),
            scroll_threshold: 5.0,
            ..HeaderConfig::default()
        };
        let mut toggle = HeaderToggle::attach(&dom, config);
        dom.set_scroll_offset(6.0);
        toggle.apply(&mut dom);
        assert!(dom.has_class(&header, "scrolled"));
        assert!(!dom.has_class(&header, "is-active"));
    }
}
