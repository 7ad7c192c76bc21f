#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the documentation page.
//!
//! This module wraps [`docpage_core::PageController`] with JS-friendly types
//! and drives button resets with browser timeouts. Only compiled on `wasm32`
//! targets.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use docpage_core::{ClipboardAccess, CopyOutcome, PageConfig, PageError, probe_clipboard};
use js_sys::{Promise, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_time::Instant;

use crate::browser::{BrowserClipboard, BrowserDom, browser_console};
use crate::host_time::{duration_from_ms, duration_to_ms, timeout_millis};

type Page = docpage_core::PageController<BrowserDom, BrowserClipboard>;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!("panic at {}:{}: {info}", loc.file(), loc.line()),
                None => format!("panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

fn install_logging(config: &PageConfig) {
    match config.max_log_level() {
        Ok(level) => {
            crate::console_log::install(level, browser_console);
        }
        Err(err) => console_error(&format!("log level ignored: {err}")),
    }
}

fn to_js(err: PageError) -> JsValue {
    if err.is_markup_fault() {
        warn!(error = %err, "page markup does not match the configured element ids");
    }
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// The documentation page controller, bound to `window.document`.
///
/// Event handlers in the page call into this object; clipboard permission is
/// awaited before every decision that depends on it.
#[wasm_bindgen]
pub struct PageController {
    inner: Rc<RefCell<Page>>,
    origin: Instant,
}

#[wasm_bindgen]
impl PageController {
    /// Controller with the embedded page configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PageController, JsValue> {
        install_panic_hook();
        let config = PageConfig::embedded().map_err(to_js)?;
        Self::build(config)
    }

    /// Controller with a JSON configuration. Only `snippets` and
    /// `encoded_email` are required.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<PageController, JsValue> {
        install_panic_hook();
        let config = PageConfig::from_json_str(json).map_err(to_js)?;
        Self::build(config)
    }

    fn build(config: PageConfig) -> Result<PageController, JsValue> {
        install_logging(&config);
        let dom = BrowserDom::from_window().map_err(to_js)?;
        let clipboard = BrowserClipboard::from_window().map_err(to_js)?;
        let page = Page::new(config, dom, clipboard).map_err(to_js)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(page)),
            origin: Instant::now(),
        })
    }

    /// Probe clipboard permission, then reveal the page controls.
    pub fn init(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let access = resolve_access(&inner).await;
            inner.borrow_mut().init(access).map_err(to_js)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Toggle the theme; returns the new theme name.
    #[wasm_bindgen(js_name = changeTheme)]
    pub fn change_theme(&self) -> Result<String, JsValue> {
        let theme = self.inner.borrow_mut().toggle_theme().map_err(to_js)?;
        Ok(theme.name().to_owned())
    }

    /// Copy snippet `index` (1-based). Resolves to whether the text was
    /// handed to the clipboard.
    #[wasm_bindgen(js_name = copyToClipboard)]
    pub fn copy_to_clipboard(&self, index: u32) -> Promise {
        let inner = Rc::clone(&self.inner);
        let origin = self.origin;
        future_to_promise(async move {
            let index = usize::try_from(index).unwrap_or(usize::MAX);
            // Out-of-range indices fail before any permission prompt.
            inner.borrow().snippet(index).map_err(to_js)?;
            let access = resolve_access(&inner).await;
            let outcome = {
                let mut page = inner.borrow_mut();
                sync_clock(&mut page, origin);
                page.copy_snippet(index, access).map_err(to_js)?
            };
            match outcome {
                CopyOutcome::Copied { reset_at } => {
                    arm_reset_timer(&inner, origin, reset_at);
                    Ok(JsValue::TRUE)
                }
                CopyOutcome::Skipped(_) => Ok(JsValue::FALSE),
            }
        })
    }

    /// Resolves to whether clipboard writes are currently allowed.
    #[wasm_bindgen(js_name = clipboardPermitted)]
    pub fn clipboard_permitted(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let access = resolve_access(&inner).await;
            Ok(JsValue::from_bool(access.allows_write()))
        })
    }

    /// Advance the controller clock by `dt_ms` milliseconds; returns how many
    /// buttons were reset.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&self, dt_ms: f64) -> Result<u32, JsValue> {
        let Some(dt) = duration_from_ms(dt_ms) else {
            return Ok(0);
        };
        let fired = self.inner.borrow_mut().advance_time(dt).map_err(to_js)?;
        Ok(u32::try_from(fired).unwrap_or(u32::MAX))
    }

    /// Set the controller clock to `ms` milliseconds; returns how many
    /// buttons were reset.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&self, ms: f64) -> Result<u32, JsValue> {
        let Some(now) = duration_from_ms(ms) else {
            return Ok(0);
        };
        let fired = self.inner.borrow_mut().set_time(now).map_err(to_js)?;
        Ok(u32::try_from(fired).unwrap_or(u32::MAX))
    }

    /// Earliest pending reset deadline in milliseconds, if any.
    #[wasm_bindgen(js_name = nextResetDeadline)]
    pub fn next_reset_deadline(&self) -> Option<f64> {
        self.inner.borrow().next_reset_deadline().map(duration_to_ms)
    }

    /// Current theme name.
    pub fn theme(&self) -> String {
        self.inner.borrow().theme().name().to_owned()
    }

    /// Controller state as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.inner.borrow().snapshot_json().map_err(to_js)
    }
}

/// Await the permission probe without holding a borrow across it.
async fn resolve_access(inner: &Rc<RefCell<Page>>) -> ClipboardAccess {
    let (clipboard, permission_name) = {
        let page = inner.borrow();
        (page.clipboard().clone(), page.config().permission_name.clone())
    };
    probe_clipboard(&clipboard, &permission_name).await
}

/// Bring the controller clock up to real elapsed time. Host-driven time that
/// ran ahead is kept.
fn sync_clock(page: &mut Page, origin: Instant) {
    let elapsed = origin.elapsed();
    if elapsed <= page.now() {
        return;
    }
    if let Err(err) = page.set_time(elapsed) {
        warn!(error = %err, "button reset failed");
    }
}

/// Schedule a browser timeout that fires the reset due at `deadline`.
fn arm_reset_timer(inner: &Rc<RefCell<Page>>, origin: Instant, deadline: Duration) {
    let Some(window) = web_sys::window() else {
        warn!("no window; button reset left to the host clock");
        return;
    };
    let delay = deadline.saturating_sub(origin.elapsed());
    let weak = Rc::downgrade(inner);
    let callback = Closure::once_into_js(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let next = match inner.try_borrow_mut() {
            Ok(mut page) => {
                sync_clock(&mut page, origin);
                page.next_reset_deadline()
            }
            Err(_) => Some(deadline),
        };
        // Later deadlines have their own timers.
        if let Some(next) = next.filter(|next| *next <= deadline) {
            debug!(deadline_ms = duration_to_ms(next), "re-arming reset timer");
            arm_reset_timer(&inner, origin, next);
        }
    });
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        timeout_millis(delay),
    ) {
        warn!(error = %crate::browser::js_error_message(&err), "setTimeout failed");
    }
}
