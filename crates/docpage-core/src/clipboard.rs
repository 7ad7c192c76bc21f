#![forbid(unsafe_code)]

//! Clipboard access model.
//!
//! Whether the page may write to the clipboard is only known after an
//! asynchronous permission query. [`probe_clipboard`] performs that query and
//! yields a [`ClipboardAccess`]; the controller operations that depend on
//! clipboard access take that resolved value as an argument, so nothing can
//! branch on a query that has not finished yet.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

/// Answer of the host permission subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
}

impl PermissionState {
    /// Map a permission state name. Unknown names count as denied.
    #[must_use]
    pub fn from_state_name(name: &str) -> Self {
        match name {
            "granted" => Self::Granted,
            "prompt" => Self::Prompt,
            _ => Self::Denied,
        }
    }
}

/// Resolved clipboard access for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardAccess {
    /// The environment has no clipboard capability at all.
    Unavailable,
    Denied,
    Prompt,
    Granted,
}

impl ClipboardAccess {
    /// Writes are attempted for `granted` and `prompt`.
    #[must_use]
    pub const fn allows_write(self) -> bool {
        matches!(self, Self::Granted | Self::Prompt)
    }
}

impl From<PermissionState> for ClipboardAccess {
    fn from(state: PermissionState) -> Self {
        match state {
            PermissionState::Granted => Self::Granted,
            PermissionState::Prompt => Self::Prompt,
            PermissionState::Denied => Self::Denied,
        }
    }
}

/// Host clipboard and permission subsystem.
pub trait ClipboardHost {
    /// Whether a write-capable clipboard exists in this environment.
    fn is_available(&self) -> bool;

    /// Query the permission named `name`. `None` when the query itself
    /// failed (unsupported name, no permission subsystem).
    fn query_permission(&self, name: &str) -> impl Future<Output = Option<PermissionState>>;

    /// Start writing `text`. Completion and failure are the host's concern.
    fn write_text(&mut self, text: &str);
}

/// Resolve clipboard access: unavailable without a clipboard, otherwise the
/// state reported for `permission_name`.
///
/// A query that fails outright (browsers reject names they do not know)
/// resolves to [`ClipboardAccess::Prompt`], so the write is still attempted.
/// Only an explicit `denied` state blocks it.
pub async fn probe_clipboard<C: ClipboardHost>(
    clipboard: &C,
    permission_name: &str,
) -> ClipboardAccess {
    if !clipboard.is_available() {
        debug!("clipboard capability absent");
        return ClipboardAccess::Unavailable;
    }
    match clipboard.query_permission(permission_name).await {
        Some(state) => {
            let access = ClipboardAccess::from(state);
            debug!(permission = permission_name, ?access, "clipboard permission resolved");
            access
        }
        None => {
            warn!(permission = permission_name, "clipboard permission query failed");
            ClipboardAccess::Prompt
        }
    }
}
