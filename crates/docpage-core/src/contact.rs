#![forbid(unsafe_code)]

//! Contact link decoding.
//!
//! The address is stored base64-encoded so naive scrapers reading the page
//! source do not see it. This is obfuscation, not protection.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{PageError, Result};

/// A decoded contact address ready to be wired onto the contact element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    email: String,
    title: String,
}

impl ContactLink {
    /// Decode `encoded` and check that the result looks like an address.
    pub fn decode(encoded: &str, title: impl Into<String>) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let email = String::from_utf8(bytes)?;
        if !is_plausible_email(&email) {
            return Err(PageError::InvalidEmail { value: email });
        }
        Ok(Self {
            email,
            title: title.into(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn href(&self) -> String {
        format!("mailto:{}", self.email)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// `local@domain.tld`: one `@`, both sides non-empty, a dot inside the
/// domain, no whitespace or control characters.
#[must_use]
pub fn is_plausible_email(value: &str) -> bool {
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.starts_with('.')
}
