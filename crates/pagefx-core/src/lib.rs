#![forbid(unsafe_code)]

//! Core: host DOM abstraction, geometry, page events, and selector matching.
//!
//! Behaviors in `pagefx-runtime` never talk to a browser directly. They are
//! written against [`dom::PageDom`], which the browser frontend implements over
//! `web-sys` and [`memory_dom::MemoryDom`] implements over an in-memory arena
//! with host-supplied layout.

pub mod dom;
pub mod event;
pub mod geometry;
pub mod memory_dom;
pub mod selector;

pub use dom::PageDom;
pub use event::PageEvent;
pub use geometry::Rect;
