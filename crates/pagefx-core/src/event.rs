#![forbid(unsafe_code)]

//! Canonical page events.
//!
//! The host (a browser frontend or a replay harness) translates its native
//! lifecycle and viewport notifications into [`PageEvent`] values and hands
//! them to the page dispatcher. Events carry no timestamps; the dispatcher is
//! given the current monotonic time alongside each event.

/// A page lifecycle or viewport event.
///
/// `N` is the host's element handle type (see [`crate::dom::PageDom::Node`]).
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    /// The document has been parsed (`DOMContentLoaded`).
    Ready,
    /// The page and its subresources finished loading (`load`).
    Load,
    /// The viewport scrolled. The offset is read from the DOM when handled.
    Scroll,
    /// The viewport was resized.
    Resize,
    /// An element was clicked. `target` is the innermost clicked element.
    Click {
        /// Innermost element under the pointer.
        target: N,
    },
}

impl<N> PageEvent<N> {
    /// Stable event name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Load => "load",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Click { .. } => "click",
        }
    }

    /// Map the element handle, keeping the event kind.
    pub fn map_target<M>(self, f: impl FnOnce(N) -> M) -> PageEvent<M> {
        match self {
            Self::Ready => PageEvent::Ready,
            Self::Load => PageEvent::Load,
            Self::Scroll => PageEvent::Scroll,
            Self::Resize => PageEvent::Resize,
            Self::Click { target } => PageEvent::Click { target: f(target) },
        }
    }
}
