#![forbid(unsafe_code)]

//! [`PageDom`] over the live browser document.
//!
//! Every call is infallible: JS exceptions (bad selectors, writes to
//! non-HTML elements) degrade to empty results or dropped writes.

use pagefx_core::dom::PageDom;
use pagefx_core::geometry::Rect;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

/// Browser document handle.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    /// Wrap `document`; `window` supplies the scroll offset.
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }
}

fn elements(list: Result<NodeList, wasm_bindgen::JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn html(node: &Element) -> Option<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
}

impl PageDom for BrowserDom {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector))
    }

    fn query_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        elements(root.query_selector_all(selector))
    }

    fn query_first_within(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        html(node)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(el) = html(node) {
            let _ = el.style().set_property(property, value);
        }
    }

    fn remove_style(&mut self, node: &Element, property: &str) {
        if let Some(el) = html(node) {
            let _ = el.style().remove_property(property);
        }
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn clone_deep(&mut self, node: &Element) -> Option<Element> {
        node.clone_node_with_deep(true)
            .ok()?
            .dyn_into::<Element>()
            .ok()
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn clear_children(&mut self, node: &Element) {
        node.set_inner_html("");
    }

    fn scroll_offset(&self) -> f64 {
        // `pageYOffset || documentElement.scrollTop`
        match self.window.page_y_offset() {
            Ok(offset) if offset != 0.0 => offset,
            _ => self
                .document
                .document_element()
                .map_or(0.0, |root| f64::from(root.scroll_top())),
        }
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn offset_height(&self, node: &Element) -> f64 {
        html(node).map_or(0.0, |el| f64::from(el.offset_height()))
    }
}
