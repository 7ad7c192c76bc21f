#![forbid(unsafe_code)]

//! Browser bindings for the bigint documentation page.
//!
//! [`PageController`] (wasm only) runs [`docpage_core::PageController`]
//! against `window.document` and the async clipboard API. The page scripts
//! create one controller on load, await `init()`, and route the theme button
//! and the copy buttons to `changeTheme()` and `copyToClipboard(n)`.
//!
//! The time conversions and the console log writer are target-independent so
//! they are tested natively.

pub mod console_log;
pub mod host_time;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserClipboard, BrowserDom, browser_console};
#[cfg(target_arch = "wasm32")]
pub use wasm::PageController;
