#![forbid(unsafe_code)]

//! `wasm-bindgen` export of the page behaviors.
//!
//! [`PageFxWeb`] owns a [`StepPage`] over [`BrowserDom`]. DOM listeners and
//! the debounce timer hold weak handles to it, so dropping the JS object
//! releases everything.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Reflect;
use pagefx_core::event::PageEvent;
use pagefx_web::StepPage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, Window};

use crate::browser_dom::BrowserDom;
use crate::options::WebOptions;

/// Stringified option value, or `None` when absent.
fn option_value(options: &JsValue, key: &str) -> Option<String> {
    if !options.is_object() {
        return None;
    }
    let value = Reflect::get(options, &JsValue::from_str(key)).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
        .or_else(|| value.as_bool().map(|b| b.to_string()))
}

fn ready_state(window: &Window) -> String {
    window
        .document()
        .and_then(|doc| Reflect::get(doc.as_ref(), &JsValue::from_str("readyState")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

struct Inner {
    runner: StepPage<BrowserDom, StdRng>,
    window: Window,
    timer: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl Inner {
    fn now(&self) -> Duration {
        let ms = self
            .window
            .performance()
            .map_or(0.0, |perf| perf.now())
            .max(0.0);
        Duration::from_secs_f64(ms / 1000.0)
    }

    /// Dispatch `event` (if any) at the current time, flush diagnostics, and
    /// (re)arm the debounce timer.
    fn run(&mut self, event: Option<PageEvent<Element>>) {
        let now = self.now();
        self.runner.set_time(now);
        if let Some(event) = event {
            self.runner.push_event(event);
        }
        self.runner.step();

        for line in self.runner.take_outputs().logs {
            web_sys::console::error_1(&JsValue::from_str(&line));
        }
        self.schedule(now);
    }

    fn schedule(&mut self, now: Duration) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = self.runner.next_deadline() else {
            return;
        };
        let Some(tick) = self.tick.as_ref() else {
            return;
        };
        let delay = deadline.saturating_sub(now).as_millis().min(i32::MAX as u128) as i32;
        self.timer = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                delay,
            )
            .ok();
    }
}

fn dispatch(shared: &Weak<RefCell<Inner>>, event: Option<PageEvent<Element>>) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    // Re-entrant dispatch (an event fired from inside a handler) is dropped.
    let Ok(mut inner) = shared.try_borrow_mut() else {
        return;
    };
    inner.run(event);
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Page behaviors bound to the live document.
///
/// ```js
/// const fx = new PageFxWeb({ faqSampleSize: 10 });
/// fx.start();
/// ```
#[wasm_bindgen]
pub struct PageFxWeb {
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<Listener>,
    started: bool,
}

#[wasm_bindgen]
impl PageFxWeb {
    /// Build the behaviors. `options` is an optional plain object; invalid
    /// values throw.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<PageFxWeb, JsValue> {
        let options = options.unwrap_or(JsValue::UNDEFINED);
        let parsed = WebOptions::from_lookup(|key| option_value(&options, key))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let seed = parsed
            .seed
            .unwrap_or_else(|| (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);

        let runner = StepPage::new(
            BrowserDom::new(window.clone(), document),
            parsed.config,
            StdRng::seed_from_u64(seed),
        )
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let inner = Rc::new(RefCell::new(Inner {
            runner,
            window,
            timer: None,
            tick: None,
        }));
        let weak = Rc::downgrade(&inner);
        let tick = Closure::<dyn FnMut()>::new(move || {
            if let Some(shared) = weak.upgrade()
                && let Ok(mut inner) = shared.try_borrow_mut()
            {
                inner.timer = None;
                inner.run(None);
            }
        });
        inner.borrow_mut().tick = Some(tick);

        Ok(Self {
            inner,
            listeners: Vec::new(),
            started: false,
        })
    }

    /// Install listeners. Lifecycle events that already happened are
    /// dispatched immediately. Calling twice is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let window = self.inner.borrow().window.clone();
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let state = ready_state(&window);

        self.listen(window.as_ref(), "scroll", |_| Some(PageEvent::Scroll))?;
        self.listen(window.as_ref(), "resize", |_| Some(PageEvent::Resize))?;
        self.listen(document.as_ref(), "click", |event| {
            event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .map(|target| PageEvent::Click { target })
        })?;

        let weak = Rc::downgrade(&self.inner);
        if state == "loading" {
            self.listen(document.as_ref(), "DOMContentLoaded", |_| {
                Some(PageEvent::Ready)
            })?;
        } else {
            dispatch(&weak, Some(PageEvent::Ready));
        }
        if state == "complete" {
            dispatch(&weak, Some(PageEvent::Load));
        } else {
            self.listen(window.as_ref(), "load", |_| Some(PageEvent::Load))?;
        }
        debug!(ready_state = %state, "listeners installed");
        Ok(())
    }

    /// Re-render the FAQ sample. Returns `false` if the FAQ never attached.
    pub fn resample(&mut self) -> bool {
        self.inner
            .try_borrow_mut()
            .map(|mut inner| inner.runner.resample_faq())
            .unwrap_or(false)
    }

    /// Run an equalizer pass now, as after page load.
    pub fn equalize(&mut self) {
        dispatch(&Rc::downgrade(&self.inner), Some(PageEvent::Load));
    }

    /// Remove listeners and cancel the pending timer.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Ok(mut inner) = self.inner.try_borrow_mut()
            && let Some(handle) = inner.timer.take()
        {
            inner.window.clear_timeout_with_handle(handle);
        }
        self.started = false;
    }
}

impl PageFxWeb {
    fn listen<F>(&mut self, target: &EventTarget, kind: &'static str, map: F) -> Result<(), JsValue>
    where
        F: Fn(Event) -> Option<PageEvent<Element>> + 'static,
    {
        let weak = Rc::downgrade(&self.inner);
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(page_event) = map(event) {
                dispatch(&weak, Some(page_event));
            }
        });
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }
}

impl Drop for PageFxWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}
