#![forbid(unsafe_code)]

//! Simple compound selectors for the in-memory DOM.
//!
//! Supported grammar: an optional tag name (or `*`) followed by any number of
//! `.class` and at most one `#id` component, e.g. `li`, `.faq-list`,
//! `div.row.wide`, `ul#faq`. Combinators, attribute selectors, pseudo-classes
//! and selector lists are rejected with [`SelectorError::Unsupported`].

use std::fmt;

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector was empty or whitespace.
    Empty,
    /// A `.` or `#` was not followed by a name.
    MissingName {
        /// Byte offset of the dangling `.` or `#`.
        at: usize,
    },
    /// The selector uses syntax outside the supported subset.
    Unsupported(String),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::MissingName { at } => write!(f, "missing name after '.' or '#' at byte {at}"),
            Self::Unsupported(selector) => write!(f, "unsupported selector: {selector}"),
        }
    }
}

impl std::error::Error for SelectorError {}

/// A parsed simple compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }
        if source
            .chars()
            .any(|c| !is_name_char(c) && !matches!(c, '.' | '#' | '*'))
        {
            return Err(SelectorError::Unsupported(source.to_string()));
        }

        let mut selector = Self::default();
        let bytes = source.as_bytes();
        let mut pos = 0;

        if bytes[0] == b'*' {
            pos = 1;
        } else if is_name_char(bytes[0] as char) {
            let end = source[pos..]
                .find(|c: char| !is_name_char(c))
                .map_or(source.len(), |off| pos + off);
            selector.tag = Some(source[pos..end].to_ascii_lowercase());
            pos = end;
        }

        while pos < source.len() {
            let marker = bytes[pos];
            let start = pos + 1;
            let end = source[start..]
                .find(|c: char| !is_name_char(c))
                .map_or(source.len(), |off| start + off);
            if end == start {
                if marker == b'.' || marker == b'#' {
                    return Err(SelectorError::MissingName { at: pos });
                }
                return Err(SelectorError::Unsupported(source.to_string()));
            }
            let name = source[start..end].to_string();
            match marker {
                b'.' => selector.classes.push(name),
                b'#' if selector.id.is_none() => selector.id = Some(name),
                _ => return Err(SelectorError::Unsupported(source.to_string())),
            }
            pos = end;
        }

        Ok(selector)
    }

    /// Required tag name (lowercase), if any.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Required id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Required classes.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check an element's tag, id, and class list against this selector.
    #[must_use]
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.tag
            && !want.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes.iter().all(|want| classes.iter().any(|have| have == want))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parses_class_selector() {
        let sel = Selector::parse(".card-content").unwrap();
        assert_eq!(sel.tag(), None);
        assert_eq!(sel.classes(), &["card-content".to_string()]);
    }

    #[test]
    fn parses_compound_selector() {
        let sel = Selector::parse("LI.item.open#q1").unwrap();
        assert_eq!(sel.tag(), Some("li"));
        assert_eq!(sel.id(), Some("q1"));
        assert_eq!(sel.classes().len(), 2);
        assert!(sel.matches("li", Some("q1"), &classes(&["open", "item", "x"])));
        assert!(!sel.matches("li", Some("q2"), &classes(&["open", "item"])));
        assert!(!sel.matches("li", Some("q1"), &classes(&["open"])));
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let sel = Selector::parse("p").unwrap();
        assert!(sel.matches("P", None, &[]));
        assert!(!sel.matches("span", None, &[]));
    }

    #[test]
    fn universal_matches_everything() {
        let sel = Selector::parse("*").unwrap();
        assert!(sel.matches("div", None, &[]));
        let sel = Selector::parse("*.row").unwrap();
        assert!(sel.matches("section", None, &classes(&["row"])));
    }

    #[test]
    fn rejects_empty_and_unsupported() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse(".row ."), Err(SelectorError::Unsupported(".row .".into())));
        assert_eq!(Selector::parse("div."), Err(SelectorError::MissingName { at: 3 }));
        assert!(matches!(Selector::parse(".a > .b"), Err(SelectorError::Unsupported(_))));
        assert!(matches!(Selector::parse("#a#b"), Err(SelectorError::Unsupported(_))));
        assert!(matches!(Selector::parse("a, b"), Err(SelectorError::Unsupported(_))));
    }
}
