#![forbid(unsafe_code)]

//! Browser implementations of the controller's host interfaces.
//!
//! Only compiled on `wasm32` targets.

use docpage_core::{ButtonFace, ClipboardHost, PageDom, PageError, PermissionState, Result};
use js_sys::{Object, Reflect};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Clipboard, Document, HtmlElement, Navigator, PermissionStatus, Permissions};

use crate::console_log::ConsoleMethod;

/// Best-effort text of a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// [`PageDom`] over the live document.
pub struct BrowserDom {
    document: Document,
}

impl BrowserDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the global window.
    pub fn from_window() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| PageError::host("no window document"))?;
        Ok(Self::new(document))
    }

    fn element(&self, id: &str) -> Result<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| PageError::missing(id))
    }
}

impl PageDom for BrowserDom {
    fn set_root_class(&mut self, class: &str) -> Result<()> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| PageError::missing("documentElement"))?;
        root.set_class_name(class);
        Ok(())
    }

    fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<()> {
        self.element(id)?.set_hidden(hidden);
        Ok(())
    }

    fn set_title(&mut self, id: &str, title: &str) -> Result<()> {
        self.element(id)?.set_title(title);
        Ok(())
    }

    fn set_href(&mut self, id: &str, href: &str) -> Result<()> {
        self.element(id)?
            .set_attribute("href", href)
            .map_err(|err| PageError::host(js_error_message(&err)))
    }

    fn set_button_face(&mut self, id: &str, face: ButtonFace<'_>) -> Result<()> {
        let button = self.element(id)?;
        button.set_text_content(Some(face.label));
        let style = button.style();
        style
            .set_property("border-color", face.border_color)
            .and_then(|()| style.set_property("color", face.text_color))
            .map_err(|err| PageError::host(js_error_message(&err)))
    }
}

/// [`ClipboardHost`] over `navigator.clipboard` and `navigator.permissions`.
#[derive(Clone)]
pub struct BrowserClipboard {
    navigator: Navigator,
}

impl BrowserClipboard {
    #[must_use]
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::host("no window"))?;
        Ok(Self::new(window.navigator()))
    }

    // Both members are looked up reflectively: older browsers and insecure
    // contexts leave them undefined.
    fn clipboard(&self) -> Option<Clipboard> {
        Reflect::get(&self.navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .and_then(|value| value.dyn_into::<Clipboard>().ok())
    }

    fn permissions(&self) -> Option<Permissions> {
        Reflect::get(&self.navigator, &JsValue::from_str("permissions"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .and_then(|value| value.dyn_into::<Permissions>().ok())
    }
}

impl ClipboardHost for BrowserClipboard {
    fn is_available(&self) -> bool {
        self.clipboard().is_some()
    }

    async fn query_permission(&self, name: &str) -> Option<PermissionState> {
        let permissions = self.permissions()?;
        let descriptor = Object::new();
        Reflect::set(&descriptor, &JsValue::from_str("name"), &JsValue::from_str(name)).ok()?;
        let promise = match permissions.query(&descriptor) {
            Ok(promise) => promise,
            Err(err) => {
                warn!(permission = name, error = %js_error_message(&err), "permission query threw");
                return None;
            }
        };
        let status = match JsFuture::from(promise).await {
            Ok(status) => status,
            Err(err) => {
                warn!(permission = name, error = %js_error_message(&err), "permission query rejected");
                return None;
            }
        };
        let status: PermissionStatus = status.dyn_into().ok()?;
        let state = Reflect::get(&status, &JsValue::from_str("state"))
            .ok()
            .and_then(|state| state.as_string())?;
        Some(PermissionState::from_state_name(&state))
    }

    fn write_text(&mut self, text: &str) {
        let Some(clipboard) = self.clipboard() else {
            warn!("clipboard vanished before write");
            return;
        };
        let promise = clipboard.write_text(text);
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(error = %js_error_message(&err), "clipboard write failed");
            }
        });
    }
}

/// Console sink for [`crate::console_log::install`].
pub fn browser_console(method: ConsoleMethod, line: &str) {
    let line = JsValue::from_str(line);
    match method {
        ConsoleMethod::Error => web_sys::console::error_1(&line),
        ConsoleMethod::Warn => web_sys::console::warn_1(&line),
        ConsoleMethod::Info => web_sys::console::info_1(&line),
        ConsoleMethod::Log => web_sys::console::log_1(&line),
        ConsoleMethod::Debug => web_sys::console::debug_1(&line),
    }
}
