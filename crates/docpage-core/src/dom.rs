#![forbid(unsafe_code)]

//! The slice of the page markup the controller writes to.
//!
//! The controller never creates elements. It addresses existing ones by id
//! and every write fails with [`PageError::MissingElement`] when the id is
//! not present.
//!
//! [`PageError::MissingElement`]: crate::error::PageError::MissingElement

use crate::error::Result;

/// Visible state of a copy button: its label and inline colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonFace<'a> {
    pub label: &'a str,
    pub border_color: &'a str,
    pub text_color: &'a str,
}

/// DOM writes performed by the controller.
pub trait PageDom {
    /// Replace the class of the document root element.
    fn set_root_class(&mut self, class: &str) -> Result<()>;

    fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<()>;

    /// Set the tooltip (`title`) of an element.
    fn set_title(&mut self, id: &str, title: &str) -> Result<()>;

    fn set_href(&mut self, id: &str, href: &str) -> Result<()>;

    /// Apply label and inline colors to a copy button.
    fn set_button_face(&mut self, id: &str, face: ButtonFace<'_>) -> Result<()>;
}
