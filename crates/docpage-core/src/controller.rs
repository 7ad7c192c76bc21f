#![forbid(unsafe_code)]

//! The page controller.
//!
//! [`PageController`] owns the theme state, the copy-button states and the
//! reset schedule, and writes to the page through a [`PageDom`]. Clipboard
//! decisions take an already resolved [`ClipboardAccess`]; obtain one with
//! [`PageController::probe_access`] or [`crate::clipboard::probe_clipboard`].
//!
//! Time is host-driven: call [`PageController::set_time`] or
//! [`PageController::advance_time`] to let pending resets fire.

use core::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::clipboard::{ClipboardAccess, ClipboardHost, probe_clipboard};
use crate::clock::{DeterministicClock, PendingReset, ResetSchedule};
use crate::config::{PageConfig, ResetPolicy};
use crate::contact::ContactLink;
use crate::dom::PageDom;
use crate::error::{PageError, Result};
use crate::theme::{Theme, ThemeState};

/// Visual phase of a copy button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPhase {
    #[default]
    Default,
    Copied,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CopyButton {
    revealed: bool,
    phase: ButtonPhase,
}

/// Result of a copy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text handed to the clipboard; the button reverts at `reset_at`.
    Copied { reset_at: Duration },
    /// Clipboard access did not allow writing; nothing changed.
    Skipped(ClipboardAccess),
}

impl CopyOutcome {
    #[must_use]
    pub const fn copied(self) -> bool {
        matches!(self, Self::Copied { .. })
    }
}

/// Serializable view of the controller for host diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub theme: Theme,
    pub initialized: bool,
    pub now_ms: u64,
    pub reset_policy: ResetPolicy,
    pub buttons: Vec<ButtonSnapshot>,
    pub pending_resets: Vec<PendingReset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonSnapshot {
    pub index: usize,
    pub revealed: bool,
    pub phase: ButtonPhase,
}

/// Controller for the documentation page.
pub struct PageController<D, C> {
    config: PageConfig,
    contact: ContactLink,
    dom: D,
    clipboard: C,
    theme: ThemeState,
    buttons: Vec<CopyButton>,
    clock: DeterministicClock,
    resets: ResetSchedule,
    initialized: bool,
}

impl<D: PageDom, C: ClipboardHost> PageController<D, C> {
    /// Build a controller. Validates `config` and decodes the contact
    /// address once; nothing is written to the page yet.
    pub fn new(config: PageConfig, dom: D, clipboard: C) -> Result<Self> {
        config.validate()?;
        let contact = ContactLink::decode(&config.encoded_email, config.contact_title.clone())?;
        let buttons = vec![CopyButton::default(); config.snippet_count()];
        let resets = ResetSchedule::new(config.reset_policy);
        Ok(Self {
            config,
            contact,
            dom,
            clipboard,
            theme: ThemeState::new(),
            buttons,
            clock: DeterministicClock::new(),
            resets,
            initialized: false,
        })
    }

    /// Resolve clipboard access against this page's permission name.
    pub async fn probe_access(&self) -> ClipboardAccess {
        probe_clipboard(&self.clipboard, &self.config.permission_name).await
    }

    /// Whether the clipboard may be written to right now.
    pub async fn clipboard_permitted(&self) -> bool {
        self.probe_access().await.allows_write()
    }

    /// Reveal the controls. Shows the theme button, wires the contact link,
    /// switches to the dark theme and, when `access` allows writes, shows
    /// every copy button. Once this succeeded a second call does nothing; a
    /// call retried after a failure never leaves the light theme on.
    pub fn init(&mut self, access: ClipboardAccess) -> Result<()> {
        if self.initialized {
            debug!("page already initialized");
            return Ok(());
        }
        let ids = &self.config.elements;
        self.dom.set_hidden(&ids.theme_button, false)?;
        self.wire_contact()?;
        if self.theme.is_light() {
            self.toggle_theme()?;
        }
        if access.allows_write() {
            self.reveal_copy_buttons()?;
        } else {
            debug!(?access, "copy buttons stay hidden");
        }
        self.initialized = true;
        debug!(theme = self.theme.current().name(), "page initialized");
        Ok(())
    }

    /// Set the contact element's `mailto:` target and tooltip.
    pub fn wire_contact(&mut self) -> Result<()> {
        let id = &self.config.elements.contact;
        self.dom.set_title(id, self.contact.title())?;
        self.dom.set_href(id, &self.contact.href())?;
        trace!(id = id.as_str(), "contact link wired");
        Ok(())
    }

    /// Switch to the other theme and return it.
    ///
    /// The page is written first; the theme flag only flips once every
    /// write succeeded.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.current().opposite();
        let ids = &self.config.elements;
        self.dom.set_root_class(next.root_class())?;
        self.dom.set_title(&ids.theme_button, next.toggle_title())?;
        self.dom.set_hidden(&ids.moon_icon, next.moon_hidden())?;
        self.dom.set_hidden(&ids.sun_icon, next.sun_hidden())?;
        let theme = self.theme.toggle();
        debug!(theme = theme.name(), "theme toggled");
        Ok(theme)
    }

    /// Copy snippet `index` (1-based) when `access` allows it.
    ///
    /// On success the button shows its copied face and a reset is scheduled
    /// `reset_delay` from now. Without write access nothing is touched.
    pub fn copy_snippet(&mut self, index: usize, access: ClipboardAccess) -> Result<CopyOutcome> {
        let text = self.config.snippet(index)?;
        if !access.allows_write() {
            debug!(index, ?access, "copy skipped");
            return Ok(CopyOutcome::Skipped(access));
        }
        self.clipboard.write_text(text);

        let id = self.config.elements.copy_button(index);
        self.dom
            .set_button_face(&id, self.config.copy_button.copied_face())?;
        self.buttons[index - 1].phase = ButtonPhase::Copied;

        let reset_at = self.clock.now().saturating_add(self.config.reset_delay());
        self.resets.schedule(index, reset_at);
        debug!(
            index,
            reset_at_ms = u64::try_from(reset_at.as_millis()).unwrap_or(u64::MAX),
            policy = ?self.resets.policy(),
            "snippet copied"
        );
        Ok(CopyOutcome::Copied { reset_at })
    }

    /// Set the clock to `now` and fire due resets. Returns how many fired.
    pub fn set_time(&mut self, now: Duration) -> Result<usize> {
        self.clock.set(now);
        self.fire_due_resets()
    }

    /// Advance the clock by `dt` and fire due resets. Returns how many fired.
    pub fn advance_time(&mut self, dt: Duration) -> Result<usize> {
        self.clock.advance(dt);
        self.fire_due_resets()
    }

    #[must_use]
    pub fn next_reset_deadline(&self) -> Option<Duration> {
        self.resets.next_deadline()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme.current()
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Phase of button `index` (1-based), `None` when out of range.
    #[must_use]
    pub fn button_phase(&self, index: usize) -> Option<ButtonPhase> {
        self.button(index).map(|button| button.phase)
    }

    #[must_use]
    pub fn button_revealed(&self, index: usize) -> Option<bool> {
        self.button(index).map(|button| button.revealed)
    }

    pub fn snippet(&self, index: usize) -> Result<&str> {
        self.config.snippet(index)
    }

    #[must_use]
    pub const fn contact(&self) -> &ContactLink {
        &self.contact
    }

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub const fn dom(&self) -> &D {
        &self.dom
    }

    #[must_use]
    pub const fn clipboard(&self) -> &C {
        &self.clipboard
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            theme: self.theme.current(),
            initialized: self.initialized,
            now_ms: u64::try_from(self.clock.now().as_millis()).unwrap_or(u64::MAX),
            reset_policy: self.resets.policy(),
            buttons: self
                .buttons
                .iter()
                .enumerate()
                .map(|(slot, button)| ButtonSnapshot {
                    index: slot + 1,
                    revealed: button.revealed,
                    phase: button.phase,
                })
                .collect(),
            pending_resets: self.resets.pending().to_vec(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    fn button(&self, index: usize) -> Option<&CopyButton> {
        index.checked_sub(1).and_then(|slot| self.buttons.get(slot))
    }

    fn reveal_copy_buttons(&mut self) -> Result<()> {
        for index in 1..=self.buttons.len() {
            let id = self.config.elements.copy_button(index);
            self.dom.set_hidden(&id, false)?;
            self.buttons[index - 1].revealed = true;
        }
        debug!(count = self.buttons.len(), "copy buttons revealed");
        Ok(())
    }

    /// Revert every button whose reset is due. A failing write does not stop
    /// the remaining resets; the first error is returned afterwards.
    fn fire_due_resets(&mut self) -> Result<usize> {
        let due = self.resets.take_due(self.clock.now());
        let mut first_error: Option<PageError> = None;
        for reset in &due {
            let id = self.config.elements.copy_button(reset.button);
            match self
                .dom
                .set_button_face(&id, self.config.copy_button.default_face())
            {
                Ok(()) => {
                    self.buttons[reset.button - 1].phase = ButtonPhase::Default;
                    trace!(index = reset.button, "copy button reset");
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(due.len()),
        }
    }
}
