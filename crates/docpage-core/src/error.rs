#![forbid(unsafe_code)]

//! Error type shared by every controller operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PageError>;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("missing page element: #{id}")]
    MissingElement { id: String },

    #[error("snippet index {index} out of range 1..={count}")]
    InvalidSnippetIndex { index: usize, count: usize },

    #[error("contact email is not valid base64: {0}")]
    EmailDecode(#[from] base64::DecodeError),

    #[error("decoded contact email is not UTF-8: {0}")]
    EmailUtf8(#[from] std::string::FromUtf8Error),

    #[error("decoded contact is not an email address: {value:?}")]
    InvalidEmail { value: String },

    #[error("config JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("host error: {message}")]
    Host { message: String },
}

impl PageError {
    #[must_use]
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// Whether the failure comes from the page markup rather than from data.
    #[must_use]
    pub const fn is_markup_fault(&self) -> bool {
        matches!(self, Self::MissingElement { .. })
    }
}
