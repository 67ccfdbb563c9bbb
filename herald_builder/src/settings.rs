use serde::Deserialize;

use crate::error::ConfigError;
use crate::i18n::Locale;

const MINIMUM_HELP_WIDTH: usize = 40;

/// Bot-wide command settings.
///
/// ### Example
/// ```
/// # use herald_builder::*;
/// let settings = Settings::from_json(r#"{"prefix": "?"}"#).unwrap();
/// assert_eq!(settings.prefix, "?");
/// assert_eq!(settings.help_width, 80);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// The text starting every chat command.
    pub prefix: String,
    /// The locale used when an event carries none.
    pub default_locale: Locale,
    /// The width help text is wrapped to.
    pub help_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            default_locale: Locale::new("en"),
            help_width: 80,
        }
    }
}

impl Settings {
    /// Read settings from a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|error| ConfigError::new(format!("invalid settings: {error}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::new(format!(
                "prefix '{}' must be non-empty and contain no whitespace.",
                self.prefix
            )));
        }

        if self.help_width < MINIMUM_HELP_WIDTH {
            return Err(ConfigError::new(format!(
                "help width {} must be at least {MINIMUM_HELP_WIDTH}.",
                self.help_width
            )));
        }

        Ok(())
    }
}
