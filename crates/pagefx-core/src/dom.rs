#![forbid(unsafe_code)]

//! Host DOM abstraction.
//!
//! [`PageDom`] is the only surface behaviors use to read and write the page.
//! Implementations must be infallible from the caller's point of view: a
//! selector the host cannot evaluate matches nothing, and writes to detached
//! or unsuitable elements are dropped. Behaviors rely on this to degrade to
//! no-ops instead of failing.

use core::fmt::Debug;

use crate::geometry::Rect;

/// Read/write access to a page's elements, inline styles, and layout.
pub trait PageDom {
    /// Element handle. Cheap to clone; equality is element identity.
    type Node: Clone + PartialEq + Debug;

    /// First element in the document matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// All elements in the document matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Descendants of `root` (excluding `root`) matching `selector`, in
    /// document order.
    fn query_within(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `root` matching `selector`.
    fn query_first_within(&self, root: &Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_within(root, selector).into_iter().next()
    }

    /// Direct element children of `node`.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Whether `node` carries `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add `class` to `node` (no-op if present).
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove `class` from `node` (no-op if absent).
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Inline style value for `property`, if set.
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// Set an inline style property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Remove an inline style property, restoring stylesheet-driven flow.
    fn remove_style(&mut self, node: &Self::Node, property: &str);

    /// Text content of `node` and its descendants.
    fn text(&self, node: &Self::Node) -> String;

    /// Replace the content of `node` with `text`.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    /// Deep-clone `node`. The clone is detached.
    fn clone_deep(&mut self, node: &Self::Node) -> Option<Self::Node>;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Detach every child of `node`.
    fn clear_children(&mut self, node: &Self::Node);

    /// Current vertical scroll offset of the viewport.
    fn scroll_offset(&self) -> f64;

    /// Viewport-relative border box of `node`.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Rendered border-box height of `node` (including padding and border).
    fn offset_height(&self, node: &Self::Node) -> f64;
}
