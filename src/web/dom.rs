//! DOM drivers for the page effects.

use super::runner::{after, FrameLoop, Listener, TimeoutChain};
use crate::config::BackdropConfig;
use crate::links::Download;
use crate::menu::MenuStyle;
use crate::scroll::{self, NavStyle, RevealAction};
use crate::trail::{MouseTrail, Orbit};
use crate::typing::Typewriter;
use crate::{Error, Result};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Window,
};

fn set_style(el: &HtmlElement, property: &str, value: &str) -> Result<()> {
    el.style().set_property(property, value)?;
    Ok(())
}

fn html(el: Element) -> Result<HtmlElement> {
    el.dyn_into::<HtmlElement>()
        .map_err(|_| Error::Js("not an HTML element".into()))
}

fn create_div(document: &Document, class: &str) -> Result<HtmlElement> {
    let el = html(document.create_element("div")?)?;
    el.set_class_name(class);
    Ok(el)
}

fn append_to_body(document: &Document, el: &HtmlElement) -> Result<()> {
    document
        .body()
        .ok_or_else(|| Error::Js("no body".into()))?
        .append_child(el)?;
    Ok(())
}

fn now_seconds(window: &Window) -> f64 {
    window.performance().map(|p| p.now() / 1000.0).unwrap_or(0.0)
}

/// Page effects that outlive [`Effects::install`].
pub struct Effects {
    _frames: FrameLoop,
    _listeners: Vec<Listener>,
    _typers: Vec<TimeoutChain>,
    _reveal: Option<Reveal>,
}

impl Effects {
    pub fn install(window: &Window, document: &Document, config: &BackdropConfig) -> Result<Self> {
        let mut listeners = Vec::new();

        let (frames, pointer) = pointer_effects(window, document, config)?;
        listeners.push(pointer);
        listeners.push(scroll_effects(window, document)?);

        let mut typers = Vec::new();
        if let Some(el) = document.get_element_by_id("typingText") {
            typers.push(typewriter(window, html(el)?, Typewriter::new(config.code_typing.clone()), None)?);
        }
        if let Some(hero) = document.query_selector(".hero-content")? {
            let el = create_div(document, "ai-quote")?;
            hero.append_child(&el)?;
            typers.push(typewriter(window, el, Typewriter::new(config.quotes.clone()), None)?);
        }
        if let Some(el) = document.get_element_by_id("liveCode") {
            let cursor = match document.query_selector(".cursor")? {
                Some(c) => Some(html(c)?),
                None => None,
            };
            typers.push(typewriter(window, html(el)?, Typewriter::new(config.live_code.clone()), cursor)?);
        }

        Ok(Self {
            _frames: frames,
            _listeners: listeners,
            _typers: typers,
            _reveal: Reveal::install(window, document)?,
        })
    }
}

/// Mouse trail and orbit, stepped on one frame loop.
fn pointer_effects(window: &Window, document: &Document, config: &BackdropConfig) -> Result<(FrameLoop, Listener)> {
    let trail = Rc::new(RefCell::new(MouseTrail::new(config.trail.clone())));
    let orbit = Rc::new(RefCell::new(Orbit::new(
        config.orbit.clone(),
        super::runner::viewport(window).as_vec2(),
    )));

    let mut trail_els = Vec::with_capacity(config.trail.length);
    for _ in 0..config.trail.length {
        let el = create_div(document, "mouse-trail")?;
        set_style(&el, "position", "fixed")?;
        set_style(&el, "pointer-events", "none")?;
        set_style(&el, "z-index", "9999")?;
        append_to_body(document, &el)?;
        trail_els.push(el);
    }
    let mut orbit_els = Vec::with_capacity(config.orbit.count);
    for _ in 0..config.orbit.count {
        let el = create_div(document, "quantum-particle")?;
        append_to_body(document, &el)?;
        orbit_els.push(el);
    }

    let pointer = {
        let trail = trail.clone();
        let orbit = orbit.clone();
        Listener::new(document, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let p = Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32);
                trail.borrow_mut().set_pointer(p);
                orbit.borrow_mut().set_center(p);
            }
        })?
    };

    let win = window.clone();
    let frames = FrameLoop::start(window, move || {
        let mut trail = trail.borrow_mut();
        trail.step();
        for (el, s) in trail_els.iter().zip(trail.styles()) {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", s.left));
            let _ = style.set_property("top", &format!("{}px", s.top));
            let _ = style.set_property("width", &format!("{}px", s.size));
            let _ = style.set_property("height", &format!("{}px", s.size));
            let _ = style.set_property("opacity", &s.opacity.to_string());
        }

        let orbit = orbit.borrow();
        for (el, p) in orbit_els.iter().zip(orbit.positions(now_seconds(&win))) {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", p.x));
            let _ = style.set_property("top", &format!("{}px", p.y));
        }
        true
    })?;

    Ok((frames, pointer))
}

/// Scroll progress bar and navigation background.
fn scroll_effects(window: &Window, document: &Document) -> Result<Listener> {
    let win = window.clone();
    let doc = document.clone();
    Listener::new(window, "scroll", move |_| {
        let scroll_y = win.scroll_y().unwrap_or(0.0);

        if let Some(bar) = doc.get_element_by_id("scroll-progress").and_then(|e| html(e).ok()) {
            let height = doc.body().map(|b| b.scroll_height() as f64).unwrap_or(0.0);
            let viewport = super::runner::viewport(&win).y as f64;
            let pct = scroll::progress(scroll_y, height, viewport);
            let _ = set_style(&bar, "width", &format!("{pct}%"));
        }

        if let Some(nav) = doc.get_element_by_id("navbar").and_then(|e| html(e).ok()) {
            let style = NavStyle::for_scroll(scroll_y);
            let _ = set_style(&nav, "background", &style.background.to_css());
            let _ = set_style(&nav, "backdrop-filter", style.backdrop_filter);
        }
    })
}

/// Drive `el` from `machine`, optionally blinking `cursor`.
fn typewriter(
    window: &Window,
    el: HtmlElement,
    mut machine: Typewriter,
    cursor: Option<HtmlElement>,
) -> Result<TimeoutChain> {
    TimeoutChain::start(window, move || {
        let tick = machine.tick();
        el.set_text_content(Some(&tick.text));
        if let Some(cursor) = &cursor {
            let _ = set_style(cursor, "opacity", &machine.cursor_opacity().to_string());
        }
        Some(tick.delay)
    })
}

/// Reveal-on-scroll observer; disconnected on drop.
struct Reveal {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Reveal {
    fn install(window: &Window, document: &Document) -> Result<Option<Self>> {
        let targets = document.query_selector_all(scroll::REVEAL_SELECTOR)?;
        if targets.length() == 0 {
            return Ok(None);
        }

        let win = window.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let Ok(target) = html(entry.target()) else {
                        continue;
                    };
                    let is_bar = target.class_list().contains(scroll::SKILL_BAR_CLASS);
                    let width = target.get_attribute("data-width");
                    for action in scroll::reveal(entry.is_intersecting(), is_bar, width.as_deref()) {
                        match action {
                            RevealAction::Play => {
                                let _ = set_style(&target, "animation-play-state", "running");
                            }
                            RevealAction::FillBar { width, after: delay } => {
                                let bar = target.clone();
                                let filled = after(&win, delay, move || {
                                    let _ = set_style(&bar, "width", &width);
                                });
                                if let Err(e) = filled {
                                    log::warn!("skill bar timer failed: {e}");
                                }
                            }
                        }
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(scroll::REVEAL_OPTIONS.threshold));
        options.set_root_margin(scroll::REVEAL_OPTIONS.root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        for i in 0..targets.length() {
            let Some(el) = targets.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            set_style(&el, "animation-play-state", "paused")?;
            observer.observe(&el);
        }

        Ok(Some(Self {
            observer,
            _callback: callback,
        }))
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Apply a mobile menu state to `#mobileMenu` and its button.
pub fn apply_menu_style(document: &Document, style: &MenuStyle) -> Result<()> {
    let Some(menu) = document.get_element_by_id("mobileMenu") else {
        return Ok(());
    };
    let Some(button) = document.query_selector(".mobile-menu-btn")? else {
        return Ok(());
    };
    menu.class_list().toggle(crate::menu::ACTIVE_CLASS)?;
    button.class_list().toggle(crate::menu::ACTIVE_CLASS)?;

    let bars = button.query_selector_all("span")?;
    for (i, bar_style) in style.bars.iter().enumerate() {
        let Some(bar) = bars.get(i as u32).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        if let Some(transform) = bar_style.transform {
            set_style(&bar, "transform", transform)?;
        }
        if let Some(opacity) = bar_style.opacity {
            set_style(&bar, "opacity", opacity)?;
        }
        if let Some(transition) = bar_style.transition {
            set_style(&bar, "transition", transition)?;
        }
    }

    let menu = html(menu)?;
    set_style(&menu, "max-height", style.max_height)?;
    set_style(&menu, "opacity", style.opacity)?;
    Ok(())
}

/// Click a temporary download anchor.
pub fn download(document: &Document, file: &Download) -> Result<()> {
    let link = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| Error::Js("not an anchor".into()))?;
    link.set_href(file.href);
    link.set_download(file.file_name);
    append_to_body(document, &link)?;
    link.click();
    link.remove();
    Ok(())
}
