//! Contact form wiring: validation on blur and submit, `fetch` posting.

use super::runner::{after, Listener};
use crate::contact::{ContactForm, Field, FieldError, FieldKind, SubmitOutcome, NOTICE_DURATION};
use crate::{Error, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, Request,
    RequestInit, Response, Window,
};

const ERROR_COLOR: &str = "#ef4444";
const VALID_BORDER: &str = "var(--accent-cyan)";
const RESET_BORDER: &str = "var(--border-glow)";
const SENDING_HTML: &str = "<span>Sending...</span>";
const IDLE_HTML: &str = "<span>Send Message</span><div class='btn-shine'></div>";

/// Listeners on `.contact-form`, removed on drop.
pub struct ContactFormHandler {
    _listeners: Vec<Listener>,
}

impl ContactFormHandler {
    /// `None` when the page has no contact form.
    pub fn install(window: &Window, document: &Document) -> Result<Option<Self>> {
        let Some(form) = document.query_selector(".contact-form")? else {
            return Ok(None);
        };
        let form = form
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| Error::Js(".contact-form is not a form".into()))?;

        let mut listeners = Vec::new();
        for control in controls(&form)? {
            let el = control.clone();
            listeners.push(Listener::new(&control, "blur", move |_| {
                if let Some(field) = read_field(&el) {
                    show_validation(&el, field.validate());
                }
            })?);
        }

        let win = window.clone();
        let target = form.clone();
        listeners.push(Listener::new(&form, "submit", move |event| {
            event.prevent_default();
            if validate_form(&target) {
                let window = win.clone();
                let form = target.clone();
                wasm_bindgen_futures::spawn_local(async move { submit(&window, &form).await });
            }
        })?);

        Ok(Some(Self { _listeners: listeners }))
    }
}

fn controls(form: &HtmlFormElement) -> Result<Vec<HtmlElement>> {
    let nodes = form.query_selector_all("input, textarea")?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn read_field(el: &HtmlElement) -> Option<Field> {
    let (field, required) = if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        let kind = FieldKind::from_input_type(&input.type_());
        (Field::new(input.name(), kind, input.value()), input.required())
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        (Field::new(area.name(), FieldKind::Other, area.value()), area.required())
    } else {
        return None;
    };
    Some(if required { field } else { field.optional() })
}

fn read_form(form: &HtmlFormElement) -> (ContactForm, Vec<HtmlElement>) {
    let controls = controls(form).unwrap_or_default();
    let mut fields = Vec::with_capacity(controls.len());
    let mut elements = Vec::with_capacity(controls.len());
    for el in controls {
        if let Some(field) = read_field(&el) {
            fields.push(field);
            elements.push(el);
        }
    }
    (ContactForm::new(fields), elements)
}

fn clear_error(el: &HtmlElement) {
    if let Some(existing) = el
        .parent_element()
        .and_then(|p| p.query_selector(".field-error").ok().flatten())
    {
        existing.remove();
    }
}

fn show_validation(el: &HtmlElement, result: std::result::Result<(), FieldError>) {
    clear_error(el);
    let style = el.style();
    let Err(error) = result else {
        let _ = style.set_property("border-color", VALID_BORDER);
        return;
    };
    let _ = style.set_property("border-color", ERROR_COLOR);

    let (Some(document), Some(parent)) = (el.owner_document(), el.parent_element()) else {
        return;
    };
    if let Ok(div) = document.create_element("div") {
        div.set_class_name("field-error");
        div.set_text_content(Some(&error.to_string()));
        let _ = parent.append_child(&div);
    }
}

/// Show feedback on every required field; true when all pass.
fn validate_form(form: &HtmlFormElement) -> bool {
    let (contact, elements) = read_form(form);
    for (field, el) in contact.fields().iter().zip(&elements) {
        if field.required {
            show_validation(el, field.validate());
        }
    }
    contact.is_valid()
}

async fn post(window: &Window, url: &str, body: &str) -> Result<u16> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Accept", "application/json")?;
    request
        .headers()
        .set("Content-Type", "application/x-www-form-urlencoded")?;

    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response = response
        .dyn_into::<Response>()
        .map_err(|_| Error::Js("fetch did not return a Response".into()))?;
    Ok(response.status())
}

async fn submit(window: &Window, form: &HtmlFormElement) {
    let button = form
        .query_selector(".submit-btn")
        .ok()
        .flatten()
        .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok());
    if let Some(button) = &button {
        button.set_inner_html(SENDING_HTML);
        button.set_disabled(true);
    }

    let (contact, elements) = read_form(form);
    let status = match post(window, &form.action(), &contact.encode()).await {
        Ok(status) => Some(status),
        Err(e) => {
            log::error!("form submission error: {e}");
            None
        }
    };

    let outcome = SubmitOutcome::from_status(status);
    match outcome.message() {
        None => {
            form.reset();
            for el in &elements {
                clear_error(el);
                let _ = el.style().set_property("border-color", RESET_BORDER);
            }
            show_success(window, form);
        }
        Some(message) => show_error(window, form, message),
    }

    if let Some(button) = &button {
        button.set_inner_html(IDLE_HTML);
        button.set_disabled(false);
    }
}

fn show_success(window: &Window, form: &HtmlFormElement) {
    let Some(notice) = form
        .owner_document()
        .and_then(|d| d.get_element_by_id("formSuccess"))
    else {
        return;
    };
    let _ = form.style().set_property("display", "none");
    let _ = notice.class_list().add_1("show");

    let form = form.clone();
    let restored = after(window, NOTICE_DURATION, move || {
        let _ = notice.class_list().remove_1("show");
        let _ = form.style().set_property("display", "block");
    });
    if let Err(e) = restored {
        log::warn!("success notice timer failed: {e}");
    }
}

fn show_error(window: &Window, form: &HtmlFormElement, message: &str) {
    let Some(div) = form.owner_document().and_then(|d| d.create_element("div").ok()) else {
        return;
    };
    div.set_class_name("form-error");
    div.set_text_content(Some(message));
    if form.append_child(&div).is_err() {
        return;
    }
    if let Err(e) = after(window, NOTICE_DURATION, move || div.remove()) {
        log::warn!("error notice timer failed: {e}");
    }
}
