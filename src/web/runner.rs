//! Browser scheduling: animation frame chains, timeout chains and event
//! listeners that clean up after themselves when dropped.

use super::canvas::CanvasSurface;
use crate::{Animation, Engine, FrameStatus, Result};
use glam::UVec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, Window};

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Current `innerWidth` x `innerHeight`.
pub fn viewport(window: &Window) -> UVec2 {
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    UVec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<i32> {
    Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
}

fn set_timeout(window: &Window, callback: &Closure<dyn FnMut()>, delay: Duration) -> Result<i32> {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    Ok(window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), ms)?)
}

/// Run `f` once after `delay`. The callback is owned by the browser.
pub fn after(window: &Window, delay: Duration, f: impl FnOnce() + 'static) -> Result<()> {
    let ms = delay.as_millis().min(i32::MAX as u128) as i32;
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)?;
    Ok(())
}

/// A self-rescheduling `requestAnimationFrame` chain.
///
/// `tick` runs once per frame; returning `false` ends the chain.
pub struct FrameLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Callback,
}

impl FrameLoop {
    pub fn start(window: &Window, mut tick: impl FnMut() -> bool + 'static) -> Result<Self> {
        let pending = Rc::new(Cell::new(None));
        let callback: Callback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let id = pending.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move || {
            id.set(None);
            if !tick() {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                match request_frame(&win, cb) {
                    Ok(handle) => id.set(Some(handle)),
                    Err(e) => log::error!("animation frame request failed: {e}"),
                }
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            pending.set(Some(request_frame(window, cb)?));
        }
        Ok(Self {
            window: window.clone(),
            pending,
            callback,
        })
    }

    /// Cancel the pending frame, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        // The closure holds a handle to itself; release it.
        self.callback.borrow_mut().take();
    }
}

/// A self-rescheduling `setTimeout` chain.
///
/// `tick` returns the delay before its next run, or `None` to stop.
pub struct TimeoutChain {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Callback,
}

impl TimeoutChain {
    pub fn start(window: &Window, mut tick: impl FnMut() -> Option<Duration> + 'static) -> Result<Self> {
        let pending = Rc::new(Cell::new(None));
        let callback: Callback = Rc::new(RefCell::new(None));

        let next = callback.clone();
        let id = pending.clone();
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move || {
            id.set(None);
            let Some(delay) = tick() else {
                return;
            };
            if let Some(cb) = next.borrow().as_ref() {
                match set_timeout(&win, cb, delay) {
                    Ok(handle) => id.set(Some(handle)),
                    Err(e) => log::error!("timeout request failed: {e}"),
                }
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            pending.set(Some(set_timeout(window, cb, Duration::ZERO)?));
        }
        Ok(Self {
            window: window.clone(),
            pending,
            callback,
        })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

impl Drop for TimeoutChain {
    fn drop(&mut self) {
        self.cancel();
        self.callback.borrow_mut().take();
    }
}

/// An event listener, removed on drop.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(target: &EventTarget, event: &'static str, f: impl FnMut(Event) + 'static) -> Result<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// A backdrop engine running on animation frames, resized with the window.
pub struct EngineHandle {
    frames: FrameLoop,
    _resize: Listener,
    teardown: Box<dyn Fn()>,
}

impl EngineHandle {
    /// Tear the engine down and cancel its pending frame. Idempotent.
    pub fn stop(&self) {
        (self.teardown)();
        self.frames.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drive `engine` until it is torn down.
pub fn run<A: Animation + 'static>(window: &Window, engine: Engine<A, CanvasSurface>) -> Result<EngineHandle> {
    let engine = Rc::new(RefCell::new(engine));

    let resize = {
        let engine = engine.clone();
        let win = window.clone();
        Listener::new(window, "resize", move |_| engine.borrow_mut().resize(viewport(&win)))?
    };

    let frames = {
        let engine = engine.clone();
        FrameLoop::start(window, move || engine.borrow_mut().frame() == FrameStatus::Continue)?
    };

    Ok(EngineHandle {
        frames,
        _resize: resize,
        teardown: Box::new(move || engine.borrow().teardown()),
    })
}
