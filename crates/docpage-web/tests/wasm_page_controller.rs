#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use core::time::Duration;

use docpage_core::{ClipboardAccess, MemoryClipboard, PageConfig, PageError, Theme};
use docpage_web::BrowserDom;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("browser document")
}

/// Replace any previous markup with the elements the page expects.
fn mount_page(config: &PageConfig) {
    let document = document();
    let body = document.body().expect("body");
    let mut ids = vec![
        ("button", config.elements.theme_button.clone()),
        ("img", config.elements.moon_icon.clone()),
        ("img", config.elements.sun_icon.clone()),
        ("a", config.elements.contact.clone()),
    ];
    for index in 1..=config.snippet_count() {
        ids.push(("button", config.elements.copy_button(index)));
    }
    for (tag, id) in ids {
        if let Some(existing) = document.get_element_by_id(&id) {
            existing.remove();
        }
        let element = document.create_element(tag).expect("create element");
        element.set_id(&id);
        body.append_child(&element).expect("append");
    }
}

/// Resolve after `ms` milliseconds of browser time.
async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("timer");
}

fn label(id: &str) -> Option<String> {
    element(id).text_content()
}

fn element(id: &str) -> HtmlElement {
    use wasm_bindgen::JsCast;
    document()
        .get_element_by_id(id)
        .expect("mounted element")
        .dyn_into::<HtmlElement>()
        .expect("html element")
}

fn page() -> docpage_core::PageController<BrowserDom, MemoryClipboard> {
    let config = PageConfig::embedded().expect("embedded config");
    mount_page(&config);
    let dom = BrowserDom::from_window().expect("dom");
    docpage_core::PageController::new(config, dom, MemoryClipboard::granted()).expect("controller")
}

#[wasm_bindgen_test]
fn init_switches_the_document_to_dark() {
    let mut page = page();
    page.init(ClipboardAccess::Granted).expect("init");

    let root = document().document_element().expect("root");
    assert_eq!(root.class_name(), "dark");
    assert_eq!(element("change-theme-button").title(), "Enable light mode");
    assert!(element("moon-picture").hidden());
    assert!(!element("sun-picture").hidden());
    assert_eq!(
        element("contact").get_attribute("href").as_deref(),
        Some("mailto:kakrzysiek13@gmail.com")
    );

    assert_eq!(page.toggle_theme().expect("toggle"), Theme::Light);
    assert_eq!(root.class_name(), "light");
}

#[wasm_bindgen_test]
fn copy_button_shows_copied_until_the_reset() {
    let mut page = page();
    page.init(ClipboardAccess::Granted).expect("init");
    page.copy_snippet(1, ClipboardAccess::Granted).expect("copy");

    let button = element("copy-button-1");
    assert_eq!(button.text_content().as_deref(), Some("copied"));
    assert_eq!(
        button.style().get_property_value("color").expect("color"),
        "rgb(27, 197, 30)"
    );

    page.advance_time(Duration::from_millis(1500)).expect("advance");
    assert_eq!(button.text_content().as_deref(), Some("copy"));
}

#[wasm_bindgen_test]
fn missing_markup_is_reported_by_id() {
    let mut page = page();
    element("sun-picture").remove();
    let err = page.init(ClipboardAccess::Granted).expect_err("sun icon removed");
    assert!(matches!(err, PageError::MissingElement { ref id } if id == "sun-picture"));
}

#[wasm_bindgen_test]
fn exported_controller_toggles_the_theme() {
    mount_page(&PageConfig::embedded().expect("embedded config"));
    let controller = docpage_web::PageController::new().expect("controller");
    assert_eq!(controller.theme(), "light");
    assert_eq!(controller.change_theme().expect("toggle"), "dark");
    assert_eq!(controller.theme(), "dark");
}

async fn loaded_controller() -> docpage_web::PageController {
    mount_page(&PageConfig::embedded().expect("embedded config"));
    let controller = docpage_web::PageController::new().expect("controller");
    JsFuture::from(controller.init()).await.expect("init");
    controller
}

#[wasm_bindgen_test]
async fn browser_clipboard_allows_writes_with_the_default_permission_name() {
    let controller = loaded_controller().await;
    let permitted = JsFuture::from(controller.clipboard_permitted())
        .await
        .expect("permission probe");
    assert_eq!(permitted, JsValue::TRUE);
    assert!(!element("copy-button-1").hidden());
}

#[wasm_bindgen_test]
async fn copied_face_reverts_on_the_browser_timer() {
    let controller = loaded_controller().await;
    let copied = JsFuture::from(controller.copy_to_clipboard(2))
        .await
        .expect("copy");
    assert_eq!(copied, JsValue::TRUE);
    assert_eq!(label("copy-button-2").as_deref(), Some("copied"));

    sleep(1800).await;
    assert_eq!(label("copy-button-2").as_deref(), Some("copy"));
    assert_eq!(controller.next_reset_deadline(), None);
}

#[wasm_bindgen_test]
async fn second_click_extends_the_copied_face() {
    let controller = loaded_controller().await;
    JsFuture::from(controller.copy_to_clipboard(4))
        .await
        .expect("first copy");
    sleep(1000).await;
    JsFuture::from(controller.copy_to_clipboard(4))
        .await
        .expect("second copy");

    // The first deadline has passed; the second click's reset is pending.
    sleep(700).await;
    assert_eq!(label("copy-button-4").as_deref(), Some("copied"));

    sleep(1200).await;
    assert_eq!(label("copy-button-4").as_deref(), Some("copy"));
    assert_eq!(controller.next_reset_deadline(), None);
}

#[wasm_bindgen_test]
async fn out_of_range_copy_rejects() {
    let controller = loaded_controller().await;
    let err = JsFuture::from(controller.copy_to_clipboard(6))
        .await
        .expect_err("index 6 does not exist");
    assert!(
        err.as_string()
            .is_some_and(|message| message.contains("out of range")),
        "{err:?}"
    );
}
