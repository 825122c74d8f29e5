//! Browser bindings.
//!
//! Compiled only for `wasm32` with the `web` feature. [`start`] runs when the
//! module loads: it mounts the three canvas backdrops and wires up the page
//! effects. Everything it creates lives in a thread-local page state until
//! [`stop`] drops it, which cancels pending frames and timers and removes
//! every listener.

mod canvas;
mod contact;
mod dom;
mod runner;

pub use canvas::{CanvasSurface, DocumentHost};
pub use runner::{EngineHandle, FrameLoop, Listener, TimeoutChain};

use crate::config::BackdropConfig;
use crate::depth::DepthAnimation;
use crate::graph::GraphAnimation;
use crate::menu::MobileMenu;
use crate::rain::RainAnimation;
use crate::{EngineBuilder, Error, Result};
use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

/// Canvas ids on the page.
pub const GRAPH_CANVAS: &str = "neuralCanvas";
pub const RAIN_CANVAS: &str = "matrixCanvas";
pub const DEPTH_CANVAS: &str = "particleCanvas";

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Everything running on the page, held for its `Drop` impls.
struct Page {
    _engines: Vec<EngineHandle>,
    _effects: dom::Effects,
    _contact: Option<contact::ContactFormHandler>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    static MENU: Cell<MobileMenu> = const { Cell::new(MobileMenu::new()) };
}

pub(crate) fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| Error::Js("no window".into()))
}

pub(crate) fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| Error::Js("no document".into()))
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger.
    let _ = console_log::init_with_level(log::Level::Info);

    let window = window()?;
    let document = document()?;
    let config = BackdropConfig::default();

    let page = Page {
        _engines: mount_backdrops(&window, &document, &config)?,
        _effects: dom::Effects::install(&window, &document, &config)?,
        _contact: contact::ContactFormHandler::install(&window, &document)?,
    };
    PAGE.with(|cell| *cell.borrow_mut() = Some(page));
    log::info!("backdrop started");
    Ok(())
}

/// Tear down every engine and effect started by [`start`].
#[wasm_bindgen]
pub fn stop() {
    if let Some(page) = PAGE.with(|cell| cell.borrow_mut().take()) {
        drop(page);
        log::info!("backdrop stopped");
    }
}

/// Start the backdrops whose canvases exist.
///
/// Nothing starts unless the graph canvas is present.
fn mount_backdrops(window: &Window, document: &Document, config: &BackdropConfig) -> Result<Vec<EngineHandle>> {
    let mut engines = Vec::new();
    if document.get_element_by_id(GRAPH_CANVAS).is_none() {
        log::debug!("no '{GRAPH_CANVAS}' on this page, backdrops disabled");
        return Ok(engines);
    }

    let host = DocumentHost::new(document.clone());
    let viewport = runner::viewport(window);

    if let Some(engine) =
        EngineBuilder::new(GraphAnimation::new(config.graph.clone())).attach(&host, GRAPH_CANVAS, viewport)
    {
        engines.push(runner::run(window, engine)?);
    }
    if let Some(engine) =
        EngineBuilder::new(RainAnimation::new(config.rain.clone())).attach(&host, RAIN_CANVAS, viewport)
    {
        engines.push(runner::run(window, engine)?);
    }
    if let Some(engine) =
        EngineBuilder::new(DepthAnimation::new(config.depth.clone())).attach(&host, DEPTH_CANVAS, viewport)
    {
        engines.push(runner::run(window, engine)?);
    }
    Ok(engines)
}

/// Open or close the mobile menu.
#[wasm_bindgen(js_name = toggleMobileMenu)]
pub fn toggle_mobile_menu() -> std::result::Result<(), JsValue> {
    let style = MENU.with(|menu| {
        let mut state = menu.get();
        let style = state.toggle();
        menu.set(state);
        style
    });
    dom::apply_menu_style(&document()?, &style)?;
    Ok(())
}

/// Open a WhatsApp chat in a new tab.
#[wasm_bindgen(js_name = openWhatsApp)]
pub fn open_whatsapp(message: Option<String>) -> std::result::Result<(), JsValue> {
    let message = message.as_deref().unwrap_or(crate::links::DEFAULT_WHATSAPP_MESSAGE);
    let url = crate::links::whatsapp_url(crate::links::WHATSAPP_PHONE, message)?;
    window()?.open_with_url_and_target(url.as_str(), "_blank")?;
    Ok(())
}

/// Download the resume through a temporary anchor.
#[wasm_bindgen(js_name = downloadResume)]
pub fn download_resume() -> std::result::Result<(), JsValue> {
    dom::download(&document()?, &crate::links::RESUME)?;
    log::info!("resume download initiated");
    Ok(())
}
