#![forbid(unsafe_code)]

//! Light/dark theme state.
//!
//! The page starts in [`Theme::Light`]; every toggle flips it. What the page
//! shows for each theme (root class, tooltip of the toggle button, which
//! icon is visible) is derived from the theme alone.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Class applied to the document root while this theme is shown.
    #[must_use]
    pub const fn root_class(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Tooltip of the toggle button, describing what the next click does.
    #[must_use]
    pub const fn toggle_title(self) -> &'static str {
        match self {
            Self::Light => "Enable dark mode",
            Self::Dark => "Enable light mode",
        }
    }

    /// The moon icon offers dark mode, so it hides once dark is active.
    #[must_use]
    pub const fn moon_hidden(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub const fn sun_hidden(self) -> bool {
        matches!(self, Self::Light)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.root_class()
    }
}

/// The page's theme flag. [`ThemeState::toggle`] is the only mutator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    current: Theme,
}

impl ThemeState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Theme::Light,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    #[must_use]
    pub const fn is_light(&self) -> bool {
        matches!(self.current, Theme::Light)
    }

    /// Flip the theme and return the new one.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.opposite();
        self.current
    }
}
