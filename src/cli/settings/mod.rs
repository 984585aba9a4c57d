//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a handler that parses, applies and formats
//! its value:
//!
//! - Text settings (`endpoint`, `api-key`, `model`, reasoning markers)
//! - Boolean settings (`markdown`)
//! - Validated settings (`theme`, `max-tokens`, `temperature`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::{path_display, Config};

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply the value given by `args` to `config`.
    ///
    /// # Returns
    /// A success message to display, or an error.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the current value for display in `reasonstream set` output.
    fn format(&self, config: &Config) -> String;
}

pub fn apply_set(
    registry: &SettingRegistry,
    config: &mut Config,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.set(args, config)
}

pub fn apply_unset(
    registry: &SettingRegistry,
    config: &mut Config,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    Ok(handler.unset(config))
}

pub fn format_all(registry: &SettingRegistry, config: &Config) -> Vec<String> {
    registry
        .keys_display_order()
        .iter()
        .filter_map(|key| registry.get(key))
        .map(|handler| handler.format(config))
        .collect()
}

fn print_settings(registry: &SettingRegistry, config: &Config) {
    println!("Available configuration options:");
    println!();
    for line in format_all(registry, config) {
        println!("{line}");
    }
    if let Ok(path) = Config::get_config_path() {
        println!();
        println!("Config file: {}", path_display(path));
    }
}

fn save(config: &Config) -> Result<(), SettingError> {
    config
        .save()
        .map_err(|err| SettingError::ConfigError(err.to_string()))
}

/// `reasonstream set [key] [value...]`
pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), SettingError> {
    let registry = SettingRegistry::new();
    let mut config =
        Config::load().map_err(|err| SettingError::ConfigError(err.to_string()))?;

    let Some(key) = key else {
        print_settings(&registry, &config);
        return Ok(());
    };

    let message = apply_set(&registry, &mut config, &key, &value)?;
    save(&config)?;
    println!("{message}");
    Ok(())
}

/// `reasonstream unset <key>`
pub fn run_unset(key: &str) -> Result<(), SettingError> {
    let registry = SettingRegistry::new();
    let mut config =
        Config::load().map_err(|err| SettingError::ConfigError(err.to_string()))?;

    let message = apply_unset(&registry, &mut config, key)?;
    save(&config)?;
    println!("{message}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn set_and_unset_round_trip_through_config() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        let message = apply_set(&registry, &mut config, "model", &args(&["qwen3:8b"])).unwrap();
        assert_eq!(message, "✅ Set model to: qwen3:8b");
        assert_eq!(config.selected_model.as_deref(), Some("qwen3:8b"));

        let message = apply_unset(&registry, &mut config, "model").unwrap();
        assert_eq!(message, "✅ Unset model");
        assert_eq!(config.selected_model, None);
    }

    #[test]
    fn api_key_is_masked_in_messages_and_listing() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        let message =
            apply_set(&registry, &mut config, "api-key", &args(&["sk-abcdef"])).unwrap();
        assert!(!message.contains("sk-abcdef"));
        assert!(format_all(&registry, &config)
            .iter()
            .all(|line| !line.contains("sk-abcdef")));
    }

    #[test]
    fn endpoint_must_be_http() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        let err = apply_set(&registry, &mut config, "endpoint", &args(&["ftp://host"]))
            .unwrap_err();
        assert!(matches!(err, SettingError::InvalidValue { key: "endpoint", .. }));

        apply_set(
            &registry,
            &mut config,
            "endpoint",
            &args(&["http://localhost:11434/v1"]),
        )
        .unwrap();
        assert_eq!(config.api_endpoint(), "http://localhost:11434/v1");
    }

    #[test]
    fn numeric_settings_are_range_checked() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        assert!(apply_set(&registry, &mut config, "temperature", &args(&["3.5"])).is_err());
        assert!(apply_set(&registry, &mut config, "max-tokens", &args(&["0"])).is_err());
        assert!(apply_set(&registry, &mut config, "max-tokens", &args(&["lots"])).is_err());

        apply_set(&registry, &mut config, "temperature", &args(&["0.2"])).unwrap();
        apply_set(&registry, &mut config, "max-tokens", &args(&["2048"])).unwrap();
        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.max_tokens(), 2048);
    }

    #[test]
    fn booleans_and_themes_are_validated() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        apply_set(&registry, &mut config, "markdown", &args(&["off"])).unwrap();
        assert!(!config.markdown_enabled());
        assert!(matches!(
            apply_set(&registry, &mut config, "markdown", &args(&["maybe"])),
            Err(SettingError::InvalidBoolean(_))
        ));

        apply_set(&registry, &mut config, "theme", &args(&["LIGHT"])).unwrap();
        assert_eq!(config.theme.as_deref(), Some("light"));
        assert!(matches!(
            apply_set(&registry, &mut config, "theme", &args(&["neon"])),
            Err(SettingError::UnknownTheme { .. })
        ));
    }

    #[test]
    fn missing_value_and_unknown_key_are_reported() {
        let registry = SettingRegistry::new();
        let mut config = Config::default();

        assert!(matches!(
            apply_set(&registry, &mut config, "model", &[]),
            Err(SettingError::MissingArgs { .. })
        ));
        assert!(matches!(
            apply_set(&registry, &mut config, "colour", &args(&["x"])),
            Err(SettingError::UnknownKey(key)) if key == "colour"
        ));
    }

    #[test]
    fn listing_follows_display_order() {
        let registry = SettingRegistry::new();
        let lines = format_all(&registry, &Config::default());
        assert_eq!(lines.len(), registry.keys_display_order().len());
        assert!(lines[0].starts_with("  endpoint: (unset, default: https://api.openai.com/v1)"));
        assert!(lines.iter().any(|line| line == "  reasoning-open: (unset, default: <think>)"));
    }
}
