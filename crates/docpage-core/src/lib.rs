#![forbid(unsafe_code)]

//! `docpage-core` is the platform-independent controller behind the bigint
//! documentation page.
//!
//! It toggles the light/dark theme, wires the obfuscated contact link, and
//! copies example snippets to the clipboard with a transient "copied" face on
//! the clicked button.
//!
//! Design goals:
//! - **Host-driven I/O**: the page is reached through [`PageDom`] and the
//!   clipboard through [`ClipboardHost`]; no JS types here.
//! - **Resolved permissions**: clipboard decisions take a [`ClipboardAccess`]
//!   that only exists once the asynchronous permission query finished.
//! - **Deterministic time**: the host sets or advances the controller clock;
//!   button resets fire from there.
//!
//! ```
//! use docpage_core::{ClipboardAccess, MemoryClipboard, MemoryDom, PageConfig, PageController};
//! use std::time::Duration;
//!
//! let config = PageConfig::embedded()?;
//! let dom = MemoryDom::for_config(&config);
//! let mut page = PageController::new(config, dom, MemoryClipboard::granted())?;
//!
//! page.init(ClipboardAccess::Granted)?;
//! page.copy_snippet(3, ClipboardAccess::Granted)?;
//! let copied = page.clipboard().contents().unwrap_or_default();
//! assert!(copied.contains("bigint_print(stdout, HEX, var3)"));
//!
//! page.advance_time(Duration::from_millis(1500))?;
//! # Ok::<(), docpage_core::PageError>(())
//! ```

pub mod clipboard;
pub mod clock;
pub mod config;
pub mod contact;
pub mod controller;
pub mod dom;
pub mod error;
pub mod memory;
pub mod theme;

pub use clipboard::{ClipboardAccess, ClipboardHost, PermissionState, probe_clipboard};
pub use clock::{DeterministicClock, PendingReset, ResetSchedule};
pub use config::{CopyButtonStyle, ElementIds, PageConfig, ResetPolicy};
pub use contact::ContactLink;
pub use controller::{ButtonPhase, ButtonSnapshot, CopyOutcome, PageController, PageSnapshot};
pub use dom::{ButtonFace, PageDom};
pub use error::{PageError, Result};
pub use memory::{MemoryClipboard, MemoryDom, MemoryElement};
pub use theme::{Theme, ThemeState};
