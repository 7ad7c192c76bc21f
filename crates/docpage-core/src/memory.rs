#![forbid(unsafe_code)]

//! In-memory hosts.
//!
//! [`MemoryDom`] and [`MemoryClipboard`] record every write the controller
//! makes, which lets the controller run headless (tests, pre-rendering
//! checks) with the same code path the browser uses.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::{Future, ready};

use crate::clipboard::{ClipboardHost, PermissionState};
use crate::config::PageConfig;
use crate::dom::{ButtonFace, PageDom};
use crate::error::{PageError, Result};

/// Recorded state of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub hidden: bool,
    pub title: Option<String>,
    pub href: Option<String>,
    /// Text content; set through button faces.
    pub label: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
}

/// A page whose elements live in a map keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDom {
    root_class: Option<String>,
    elements: BTreeMap<String, MemoryElement>,
    writes: usize,
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup the page ships with: interactive controls hidden, both
    /// icons present, one copy button per snippet.
    #[must_use]
    pub fn for_config(config: &PageConfig) -> Self {
        let ids = &config.elements;
        let mut dom = Self::new()
            .with_element(&ids.theme_button, true)
            .with_element(&ids.moon_icon, false)
            .with_element(&ids.sun_icon, false)
            .with_element(&ids.contact, false);
        for index in 1..=config.snippet_count() {
            dom = dom.with_element(&ids.copy_button(index), true);
        }
        dom
    }

    #[must_use]
    pub fn with_element(mut self, id: &str, hidden: bool) -> Self {
        self.elements.insert(
            id.to_owned(),
            MemoryElement {
                hidden,
                ..MemoryElement::default()
            },
        );
        self
    }

    /// Drop an element, to model markup that lacks part of the contract.
    pub fn remove_element(&mut self, id: &str) -> Option<MemoryElement> {
        self.elements.remove(id)
    }

    #[must_use]
    pub fn root_class(&self) -> Option<&str> {
        self.root_class.as_deref()
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.get(id)
    }

    #[must_use]
    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.element(id).map(|element| element.hidden)
    }

    /// Number of successful writes so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut MemoryElement> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| PageError::missing(id))?;
        self.writes += 1;
        Ok(element)
    }
}

impl PageDom for MemoryDom {
    fn set_root_class(&mut self, class: &str) -> Result<()> {
        self.root_class = Some(class.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<()> {
        self.element_mut(id)?.hidden = hidden;
        Ok(())
    }

    fn set_title(&mut self, id: &str, title: &str) -> Result<()> {
        self.element_mut(id)?.title = Some(title.to_owned());
        Ok(())
    }

    fn set_href(&mut self, id: &str, href: &str) -> Result<()> {
        self.element_mut(id)?.href = Some(href.to_owned());
        Ok(())
    }

    fn set_button_face(&mut self, id: &str, face: ButtonFace<'_>) -> Result<()> {
        let element = self.element_mut(id)?;
        element.label = Some(face.label.to_owned());
        element.border_color = Some(face.border_color.to_owned());
        element.text_color = Some(face.text_color.to_owned());
        Ok(())
    }
}

/// A clipboard with a fixed permission answer.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    available: bool,
    permission: Option<PermissionState>,
    contents: Option<String>,
    writes: Vec<String>,
    queries: Cell<usize>,
    last_query: RefCell<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn granted() -> Self {
        Self::with_permission(PermissionState::Granted)
    }

    #[must_use]
    pub fn with_permission(state: PermissionState) -> Self {
        Self {
            available: true,
            permission: Some(state),
            ..Self::default()
        }
    }

    /// No clipboard capability at all.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A clipboard whose permission query always fails.
    #[must_use]
    pub fn failing_query() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    /// Clipboard contents, `None` if nothing was ever written.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Every write, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    #[must_use]
    pub fn last_query(&self) -> Option<String> {
        self.last_query.borrow().clone()
    }
}

impl ClipboardHost for MemoryClipboard {
    fn is_available(&self) -> bool {
        self.available
    }

    fn query_permission(&self, name: &str) -> impl Future<Output = Option<PermissionState>> {
        self.queries.set(self.queries.get() + 1);
        *self.last_query.borrow_mut() = Some(name.to_owned());
        ready(self.permission)
    }

    fn write_text(&mut self, text: &str) {
        self.contents = Some(text.to_owned());
        self.writes.push(text.to_owned());
    }
}
