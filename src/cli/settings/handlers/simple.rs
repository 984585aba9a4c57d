//! Simple setting handlers for single validated values.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset, validate_theme};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{Config, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a theme, specify dark or light:",
                example: "reasonstream set theme light",
            });
        }

        let theme = validate_theme(&args.join(" "))?;
        let message = success_set("theme", &theme);
        config.theme = Some(theme);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.theme = None;
        format!("{} (will use default: dark)", success_unset("theme"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.theme {
            Some(theme) => format!("  theme: {theme}"),
            None => "  theme: (unset, default: dark)".to_string(),
        }
    }
}

/// Handler for the `max-tokens` setting.
pub struct MaxTokensHandler;

impl SettingHandler for MaxTokensHandler {
    fn key(&self) -> &'static str {
        "max-tokens"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the reply token limit, specify a positive number:",
                example: "reasonstream set max-tokens 2000",
            });
        };

        let value = input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| SettingError::InvalidValue {
                key: "max-tokens",
                input: input.clone(),
                expected: "a positive whole number",
            })?;
        config.max_tokens = Some(value);
        Ok(success_set("max-tokens", &value.to_string()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.max_tokens = None;
        format!(
            "{} (will use default: {DEFAULT_MAX_TOKENS})",
            success_unset("max-tokens")
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.max_tokens {
            Some(value) => format!("  max-tokens: {value}"),
            None => format!("  max-tokens: (unset, default: {DEFAULT_MAX_TOKENS})"),
        }
    }
}

/// Handler for the `temperature` setting.
pub struct TemperatureHandler;

impl SettingHandler for TemperatureHandler {
    fn key(&self) -> &'static str {
        "temperature"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the sampling temperature, specify a number from 0 to 2:",
                example: "reasonstream set temperature 0.2",
            });
        };

        let value = input
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|value| (0.0..=2.0).contains(value))
            .ok_or_else(|| SettingError::InvalidValue {
                key: "temperature",
                input: input.clone(),
                expected: "a number from 0 to 2",
            })?;
        config.temperature = Some(value);
        Ok(success_set("temperature", &value.to_string()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.temperature = None;
        format!(
            "{} (will use default: {DEFAULT_TEMPERATURE})",
            success_unset("temperature")
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.temperature {
            Some(value) => format!("  temperature: {value}"),
            None => format!("  temperature: (unset, default: {DEFAULT_TEMPERATURE})"),
        }
    }
}
