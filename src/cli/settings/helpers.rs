//! Helper functions for settings operations.

use crate::ui::theme::Theme;
use crate::utils::url::is_http_endpoint;

use super::error::SettingError;

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

/// Resolve a theme name to its canonical form.
pub fn validate_theme(input: &str) -> Result<String, SettingError> {
    Theme::from_name(input)
        .map(|theme| theme.name.to_string())
        .ok_or_else(|| SettingError::UnknownTheme {
            input: input.to_string(),
        })
}

pub fn validate_endpoint(input: &str) -> Result<String, SettingError> {
    if is_http_endpoint(input) {
        Ok(input.trim().to_string())
    } else {
        Err(SettingError::InvalidValue {
            key: "endpoint",
            input: input.to_string(),
            expected: "an http:// or https:// URL",
        })
    }
}
