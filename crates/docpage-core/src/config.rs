#![forbid(unsafe_code)]

//! Static page configuration.
//!
//! Everything the controller needs to know about the page content lives
//! here: the snippet texts, the encoded contact address, the element ids of
//! the markup contract, and the copy-button styling. The configuration is
//! read once when a controller is built and never changes afterwards.
//!
//! A default configuration for the bigint documentation page is embedded in
//! the crate (`assets/page.json`); hosts may pass their own JSON instead.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::dom::ButtonFace;
use crate::error::{PageError, Result};

const EMBEDDED_CONFIG: &str = include_str!("../assets/page.json");

/// Permission name queried before any clipboard write.
pub const DEFAULT_PERMISSION_NAME: &str = "write-on-clipboard";
/// How long a copy button keeps its "copied" face.
pub const DEFAULT_RESET_DELAY_MS: u64 = 1500;

/// What happens when a button is clicked again while its reset is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolicy {
    /// The newest click replaces the pending reset of that button.
    #[default]
    Restart,
    /// Every click keeps its own reset; the earliest one reverts the button.
    Independent,
}

/// Element ids the controller expects to find in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementIds {
    pub theme_button: String,
    pub moon_icon: String,
    pub sun_icon: String,
    pub contact: String,
    /// Copy buttons are `<prefix><n>` for the 1-based snippet index `n`.
    pub copy_button_prefix: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            theme_button: "change-theme-button".to_owned(),
            moon_icon: "moon-picture".to_owned(),
            sun_icon: "sun-picture".to_owned(),
            contact: "contact".to_owned(),
            copy_button_prefix: "copy-button-".to_owned(),
        }
    }
}

impl ElementIds {
    #[must_use]
    pub fn copy_button(&self, index: usize) -> String {
        format!("{}{index}", self.copy_button_prefix)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("theme_button", &self.theme_button),
            ("moon_icon", &self.moon_icon),
            ("sun_icon", &self.sun_icon),
            ("contact", &self.contact),
            ("copy_button_prefix", &self.copy_button_prefix),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PageError::invalid_config(format!(
                    "elements.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Labels and colors of the two copy-button faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyButtonStyle {
    pub copy_label: String,
    pub copied_label: String,
    pub copied_color: String,
    pub default_border_color: String,
    pub default_text_color: String,
}

impl Default for CopyButtonStyle {
    fn default() -> Self {
        Self {
            copy_label: "copy".to_owned(),
            copied_label: "copied".to_owned(),
            copied_color: "#1bc51e".to_owned(),
            default_border_color: "var(--copy-button-border-color)".to_owned(),
            default_text_color: "var(--text-color)".to_owned(),
        }
    }
}

impl CopyButtonStyle {
    #[must_use]
    pub fn default_face(&self) -> ButtonFace<'_> {
        ButtonFace {
            label: &self.copy_label,
            border_color: &self.default_border_color,
            text_color: &self.default_text_color,
        }
    }

    #[must_use]
    pub fn copied_face(&self) -> ButtonFace<'_> {
        ButtonFace {
            label: &self.copied_label,
            border_color: &self.copied_color,
            text_color: &self.copied_color,
        }
    }
}

fn default_contact_title() -> String {
    "Contact me".to_owned()
}

fn default_reset_delay_ms() -> u64 {
    DEFAULT_RESET_DELAY_MS
}

fn default_permission_name() -> String {
    DEFAULT_PERMISSION_NAME.to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Page configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Snippet texts; button `n` copies `snippets[n - 1]`.
    pub snippets: Vec<String>,
    /// Base64 (standard alphabet, padded) contact address.
    pub encoded_email: String,
    #[serde(default = "default_contact_title")]
    pub contact_title: String,
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default)]
    pub copy_button: CopyButtonStyle,
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
    #[serde(default)]
    pub reset_policy: ResetPolicy,
    #[serde(default = "default_permission_name")]
    pub permission_name: String,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl PageConfig {
    /// The configuration shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CONFIG)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snippets.is_empty() {
            return Err(PageError::invalid_config("snippets must not be empty"));
        }
        if self.encoded_email.trim().is_empty() {
            return Err(PageError::invalid_config("encoded_email must not be empty"));
        }
        if self.permission_name.trim().is_empty() {
            return Err(PageError::invalid_config(
                "permission_name must not be empty",
            ));
        }
        self.elements.validate()?;
        self.max_log_level()?;
        Ok(())
    }

    #[must_use]
    pub fn snippet_count(&self) -> usize {
        self.snippets.len()
    }

    /// Snippet for a 1-based button index.
    pub fn snippet(&self, index: usize) -> Result<&str> {
        index
            .checked_sub(1)
            .and_then(|slot| self.snippets.get(slot))
            .map(String::as_str)
            .ok_or(PageError::InvalidSnippetIndex {
                index,
                count: self.snippets.len(),
            })
    }

    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn max_log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(self.log_level.trim()).map_err(|_| {
            PageError::invalid_config(format!("unknown log_level {:?}", self.log_level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn minimal_json() -> &'static str {
        r#"{"snippets":["one","two"],"encoded_email":"YUBiLmNvbQ=="}"#
    }

    #[test]
    fn embedded_config_matches_the_markup_contract() {
        let config = PageConfig::embedded().expect("embedded config should parse");
        assert_eq!(config.snippet_count(), 5);
        assert_eq!(config.elements.theme_button, "change-theme-button");
        assert_eq!(config.elements.copy_button(3), "copy-button-3");
        assert_eq!(config.reset_delay(), Duration::from_millis(1500));
        assert_eq!(config.permission_name, "write-on-clipboard");
        assert_eq!(config.reset_policy, ResetPolicy::Restart);
        assert_eq!(config.contact_title, "Contact me");
    }

    #[test]
    fn embedded_snippets_keep_their_literal_text() {
        let config = PageConfig::embedded().expect("embedded config should parse");
        let first = config.snippet(1).expect("first snippet");
        assert!(first.starts_with("#include \"bigint.h\"\n\tint main("));
        assert!(first.contains("\tbigint_info();\n"));
        let last = config.snippet(5).expect("last snippet");
        assert!(last.contains("bigint_convert_to_bigint((void*)&var_int, sizeof(var_int))"));
    }

    #[test]
    fn snippet_lookup_is_one_based() {
        let config = PageConfig::from_json_str(minimal_json()).expect("parse");
        assert_eq!(config.snippet(1).expect("first"), "one");
        assert_eq!(config.snippet(2).expect("second"), "two");
        assert!(matches!(
            config.snippet(0),
            Err(PageError::InvalidSnippetIndex { index: 0, count: 2 })
        ));
        assert!(matches!(
            config.snippet(3),
            Err(PageError::InvalidSnippetIndex { index: 3, count: 2 })
        ));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let config = PageConfig::from_json_str(minimal_json()).expect("parse");
        assert_eq!(config.elements, ElementIds::default());
        assert_eq!(config.copy_button, CopyButtonStyle::default());
        assert_eq!(config.reset_delay_ms, DEFAULT_RESET_DELAY_MS);
        assert_eq!(config.max_log_level().expect("level"), LevelFilter::INFO);
    }

    #[test]
    fn partial_element_overrides_keep_other_ids() {
        let json = r#"{
            "snippets": ["x"],
            "encoded_email": "YUBiLmNvbQ==",
            "elements": { "contact": "mail-link" },
            "reset_policy": "independent",
            "log_level": "debug"
        }"#;
        let config = PageConfig::from_json_str(json).expect("parse");
        assert_eq!(config.elements.contact, "mail-link");
        assert_eq!(config.elements.sun_icon, "sun-picture");
        assert_eq!(config.reset_policy, ResetPolicy::Independent);
        assert_eq!(config.max_log_level().expect("level"), LevelFilter::DEBUG);
    }

    #[test]
    fn empty_snippet_list_is_rejected() {
        let err = PageConfig::from_json_str(r#"{"snippets":[],"encoded_email":"YUBiLmNvbQ=="}"#)
            .expect_err("empty snippets should fail validation");
        assert_eq!(err.to_string(), "invalid config: snippets must not be empty");
    }

    #[test]
    fn blank_element_id_is_rejected() {
        let json = r#"{"snippets":["x"],"encoded_email":"YUBiLmNvbQ==","elements":{"moon_icon":" "}}"#;
        let err = PageConfig::from_json_str(json).expect_err("blank id should fail");
        assert_eq!(
            err.to_string(),
            "invalid config: elements.moon_icon must not be empty"
        );
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let json = r#"{"snippets":["x"],"encoded_email":"YUBiLmNvbQ==","log_level":"loud"}"#;
        assert!(matches!(
            PageConfig::from_json_str(json),
            Err(PageError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{"snippets":["x"],"encoded_email":"YUBiLmNvbQ==","theme":"dark"}"#;
        assert!(matches!(
            PageConfig::from_json_str(json),
            Err(PageError::ConfigJson(_))
        ));
    }

    #[test]
    fn config_survives_a_json_rewrite() {
        let config = PageConfig::embedded().expect("embedded");
        let json = config.to_json_string().expect("serialize");
        assert_eq!(PageConfig::from_json_str(&json).expect("reparse"), config);
    }

    #[test]
    fn button_faces_follow_the_style() {
        let style = CopyButtonStyle::default();
        let copied = style.copied_face();
        assert_eq!(copied.label, "copied");
        assert_eq!(copied.border_color, "#1bc51e");
        assert_eq!(copied.text_color, "#1bc51e");
        let default = style.default_face();
        assert_eq!(default.label, "copy");
        assert_eq!(default.border_color, "var(--copy-button-border-color)");
        assert_eq!(default.text_color, "var(--text-color)");
    }
}
