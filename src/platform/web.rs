//! Browser implementations

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, Window};

use super::{FrameCallback, FrameScheduler, Viewport};
use crate::error::{Result, WarpError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| WarpError::MissingElement("window".into()))
}

/// `performance.now()`, falling back to `Date.now()`
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Current window size and pixel density
pub fn measure_viewport(window: &Window) -> Viewport {
    let read = |v: std::result::Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(
        read(window.inner_width()),
        read(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

/// (scroll offset, document height, viewport height) in CSS pixels
pub fn scroll_metrics(window: &Window) -> (f32, f32, f32) {
    let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
    let viewport_h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let doc_h = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f32)
        .unwrap_or(viewport_h);
    (scroll_y, doc_h, viewport_h)
}

/// requestAnimationFrame through one long-lived JS function
///
/// Queued callbacks live on the Rust side, so cancelling or dropping the
/// scheduler frees them without waiting on the browser.
pub struct AnimationFrames {
    window: Window,
    queue: Rc<RefCell<Vec<(i32, FrameCallback)>>>,
    dispatch: Closure<dyn FnMut(f64)>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        let queue: Rc<RefCell<Vec<(i32, FrameCallback)>>> = Rc::new(RefCell::new(Vec::new()));
        let due = queue.clone();
        let dispatch = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            // Release the borrow before running; callbacks re-request frames
            let ready = std::mem::take(&mut *due.borrow_mut());
            for (_, callback) in ready {
                callback(time);
            }
        });
        Self {
            window,
            queue,
            dispatch,
        }
    }
}

impl FrameScheduler for AnimationFrames {
    type Handle = i32;

    fn request_frame(&self, callback: FrameCallback) -> Option<i32> {
        match self
            .window
            .request_animation_frame(self.dispatch.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.queue.borrow_mut().push((handle, callback));
                Some(handle)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

impl Drop for AnimationFrames {
    fn drop(&mut self) {
        for (handle, _) in self.queue.borrow_mut().drain(..) {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}

/// An event subscription, removed when dropped
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| WarpError::Browser(format!("addEventListener({}): {:?}", event, e)))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
