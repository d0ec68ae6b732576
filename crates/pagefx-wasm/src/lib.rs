#![forbid(unsafe_code)]

//! WASM frontend for PageFX.
//!
//! Binds the page behaviors to the live document: `BrowserDom` implements
//! `PageDom` over `web-sys`, and `PageFxWeb` (exported via `wasm-bindgen`)
//! installs the ready, load, scroll, resize, and click listeners and the
//! resize debounce timer. Events are forwarded to a `pagefx_web::StepPage`
//! stamped with `performance.now()`.
//!
//! Option parsing lives in [`options`] and builds on every target.

pub mod options;

#[cfg(target_arch = "wasm32")]
mod browser_dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use browser_dom::BrowserDom;
#[cfg(target_arch = "wasm32")]
pub use wasm::PageFxWeb;

pub use options::{OptionError, WebOptions};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PageFxWeb {
    options: WebOptions,
}

#[cfg(not(target_arch = "wasm32"))]
impl PageFxWeb {
    /// Parse options exactly as the browser constructor does.
    pub fn new<F>(get: F) -> Result<Self, OptionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            options: WebOptions::from_lookup(get)?,
        })
    }

    /// Parsed options.
    pub fn options(&self) -> &WebOptions {
        &self.options
    }
}
