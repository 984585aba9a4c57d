//! Free-text setting handlers.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset, validate_endpoint};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{mask_secret, Config, DEFAULT_API_ENDPOINT};
use crate::core::think::ReasoningMarkers;

/// Data-driven handler for free-text settings.
pub struct TextHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: Option<&'static str>,
    secret: bool,
    validate: Option<fn(&str) -> Result<String, SettingError>>,
    get: fn(&Config) -> Option<&str>,
    set_field: fn(&mut Config, Option<String>),
}

impl SettingHandler for TextHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = match self.validate {
            Some(validate) => validate(&input)?,
            None => input,
        };
        let display = if self.secret {
            mask_secret(&value)
        } else {
            value.clone()
        };
        (self.set_field)(config, Some(value));
        Ok(success_set(self.key, &display))
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        match self.default_display {
            Some(default) => format!("{} (will use default: {default})", success_unset(self.key)),
            None => success_unset(self.key),
        }
    }

    fn format(&self, config: &Config) -> String {
        match ((self.get)(config), self.default_display) {
            (Some(value), _) if self.secret => format!("  {}: {}", self.key, mask_secret(value)),
            (Some(value), _) => format!("  {}: {value}", self.key),
            (None, Some(default)) => format!("  {}: (unset, default: {default})", self.key),
            (None, None) => format!("  {}: (unset)", self.key),
        }
    }
}

pub fn endpoint_handler() -> TextHandler {
    TextHandler {
        key: "endpoint",
        hint: "To set the API endpoint, specify its base URL:",
        example: "reasonstream set endpoint http://localhost:11434/v1",
        default_display: Some(DEFAULT_API_ENDPOINT),
        secret: false,
        validate: Some(validate_endpoint),
        get: |c| c.api_endpoint.as_deref(),
        set_field: |c, v| c.api_endpoint = v,
    }
}

pub fn api_key_handler() -> TextHandler {
    TextHandler {
        key: "api-key",
        hint: "To set the API key, specify the key:",
        example: "reasonstream set api-key sk-...",
        default_display: None,
        secret: true,
        validate: None,
        get: |c| c.api_key.as_deref(),
        set_field: |c, v| c.api_key = v,
    }
}

pub fn model_handler() -> TextHandler {
    TextHandler {
        key: "model",
        hint: "To set the model, specify its id (see 'reasonstream models'):",
        example: "reasonstream set model gpt-4o-mini",
        default_display: None,
        secret: false,
        validate: None,
        get: |c| c.selected_model.as_deref(),
        set_field: |c, v| c.selected_model = v,
    }
}

pub fn reasoning_open_handler() -> TextHandler {
    TextHandler {
        key: "reasoning-open",
        hint: "To set the marker that opens reasoning, specify it:",
        example: "reasonstream set reasoning-open <reasoning>",
        default_display: Some(ReasoningMarkers::DEFAULT_OPEN),
        secret: false,
        validate: None,
        get: |c| c.reasoning_open_tag.as_deref(),
        set_field: |c, v| c.reasoning_open_tag = v,
    }
}

pub fn reasoning_close_handler() -> TextHandler {
    TextHandler {
        key: "reasoning-close",
        hint: "To set the marker that closes reasoning, specify it:",
        example: "reasonstream set reasoning-close </reasoning>",
        default_display: Some(ReasoningMarkers::DEFAULT_CLOSE),
        secret: false,
        validate: None,
        get: |c| c.reasoning_close_tag.as_deref(),
        set_field: |c, v| c.reasoning_close_tag = v,
    }
}
